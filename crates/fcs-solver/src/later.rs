//! 往後搜尋產能
//!
//! 往前搜尋失敗或請求強制延後時執行。以負載開始事件為起點往後掃描，
//! 找到超載區之後第一個可容納完整負載的日期，把作業計劃移過去再重新驗證。
//! 這個階段的回覆數量一律為零，回覆日期表示下次可重試的日期。

use chrono::NaiveDateTime;
use fcs_core::{
    CapacityError, Direction, EventId, ResolveState, Result, Schedule, INFINITE_FUTURE,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::resolver::Resolution;

/// 往後掃描的結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ForwardScan {
    pub overload: bool,

    /// 超載區之後第一個可放入完整負載的日期
    pub candidate: Option<NaiveDateTime>,

    /// 最後一個檢查日期的最大產能與累計負載
    pub max: Decimal,
    pub onhand: Decimal,
}

/// 執行往後搜尋
pub(crate) fn search(
    ctx: &Resolution<'_>,
    schedule: &mut Schedule,
    state: &mut ResolveState,
    no_restore: bool,
) -> Result<()> {
    if !no_restore {
        schedule.set_plan_parameters(
            state.plan,
            ctx.original_quantity,
            None,
            Some(ctx.original_end),
        )?;
    }

    // 往後搜尋以負載開始事件為起點
    let anchor = schedule
        .resource(ctx.resource)?
        .timeline()
        .other(state.event)
        .ok_or_else(|| {
            CapacityError::InvalidRequest(format!("{} 沒有成對的負載開始事件", state.event))
        })?;

    let overload = loop {
        let scan = scan_forward(ctx, schedule, state, anchor)?;
        let Some(candidate) = scan.candidate.filter(|_| scan.overload) else {
            break scan.overload;
        };

        let load = schedule.resource(ctx.resource)?.timeline().get(anchor)?.quantity;
        let parallel = parallel_operations(scan.max - scan.onhand, load);
        tracing::trace!(
            "作業計劃 {} 往後移到 {}，可平行 {} 個",
            state.plan,
            candidate,
            parallel
        );
        schedule.set_plan_parameters(
            state.plan,
            ctx.original_quantity / Decimal::from(parallel),
            Some(candidate),
            None,
        )?;
    };

    state.answered_date = if overload {
        INFINITE_FUTURE
    } else {
        schedule.plan(state.plan)?.end
    };
    state.answered_qty = Decimal::ZERO;
    Ok(())
}

/// 從負載開始事件往後掃描
pub(crate) fn scan_forward(
    ctx: &Resolution<'_>,
    schedule: &Schedule,
    state: &ResolveState,
    anchor: EventId,
) -> Result<ForwardScan> {
    let plan_end = schedule.plan(state.plan)?.end;
    let timeline = schedule.resource(ctx.resource)?.timeline();
    let anchor_event = timeline.get(anchor)?;
    let load = anchor_event.quantity.abs();

    let mut scan = ForwardScan {
        overload: false,
        candidate: None,
        max: anchor_event.max(),
        onhand: anchor_event.onhand(),
    };

    let mut cursor = timeline.cursor(anchor, Direction::Forward)?.peekable();
    while let Some(step) = cursor.next() {
        // 同一日期只看最後一個事件
        if cursor
            .peek()
            .is_some_and(|next| next.event.date == step.event.date)
        {
            continue;
        }

        let date = step.event.date;
        scan.max = step.event.max();
        scan.onhand = step.event.onhand();

        if ctx.config.exceeds(scan.onhand, scan.max) {
            scan.overload = true;
        } else if !scan.overload && date > plan_end {
            // 已超過作業計劃結束日期且沒有超載
            break;
        } else if scan.overload && date != anchor_event.date && scan.max >= load {
            scan.candidate = Some(date);
            break;
        }
    }

    Ok(scan)
}

/// 剩餘產能可同時執行的作業數，至少為一
///
/// 以剩餘產能除以單位負載後取整；結果只是可行解，不保證延遲最小。
pub(crate) fn parallel_operations(headroom: Decimal, load: Decimal) -> i64 {
    if load <= Decimal::ZERO || headroom <= Decimal::ZERO {
        return 1;
    }
    (headroom / load).floor().to_i64().unwrap_or(i64::MAX).max(1)
}
