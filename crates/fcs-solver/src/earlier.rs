//! 往前搜尋產能
//!
//! 從負載結束事件往回掃描時間軸。發現超載時先嘗試縮短作業計劃，
//! 不行再把整個作業計劃（連同換線作業計劃）往前移，直到不再超載，
//! 或超出資源的最大提早時間窗。

use chrono::NaiveDateTime;
use fcs_core::dates::saturating_sub;
use fcs_core::{Direction, EventId, ResolveState, Result, Schedule};
use rust_decimal::Decimal;

use crate::resolver::Resolution;
use crate::setup::SetupLink;

/// 主負載的掃描結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MainScan {
    /// 最晚一個沒有超載的日期
    pub boundary: NaiveDateTime,

    /// 第一個超載的事件
    pub overload: Option<EventId>,
}

/// 執行往前搜尋，回傳是否不需要還原作業計劃
pub(crate) fn search(
    ctx: &Resolution<'_>,
    schedule: &mut Schedule,
    state: &mut ResolveState,
) -> Result<bool> {
    loop {
        // 提前期與凍結期
        if ctx.config.is_constrained()
            && !ctx.leadtime.check(schedule, state.plan, state, false)?
        {
            tracing::trace!("作業計劃 {} 違反提前期／凍結期，停止往前搜尋", state.plan);
            return Ok(true);
        }

        let main = scan_main(ctx, schedule, state)?;
        let setup_conflict = match &ctx.setup {
            Some(link) => scan_setup(ctx, schedule, state, link)?,
            None => None,
        };

        let mut overload = setup_conflict.or(main.overload);
        if main.overload.is_some() && setup_conflict.is_none() {
            let anchor_date = schedule
                .resource(ctx.resource)?
                .timeline()
                .get(state.event)?
                .date;
            if main.boundary < anchor_date && try_resize(ctx, schedule, state, main.boundary)? {
                overload = None;
            }
        }

        let Some(from) = overload else {
            return Ok(false);
        };

        match find_earlier_date(ctx, schedule, from)? {
            Some(date) => {
                tracing::trace!("作業計劃 {} 往前移，結束於 {}", state.plan, date);
                schedule.move_plan_end(state.plan, date)?;
                // 移動後再檢查一次，只影響回覆
                if ctx.config.is_constrained() {
                    ctx.leadtime.check(schedule, state.plan, state, false)?;
                }
            }
            None => {
                tracing::trace!("作業計劃 {} 在提早時間窗內找不到產能", state.plan);
                state.answered_qty = Decimal::ZERO;
            }
        }

        if state.answered_qty.is_zero() {
            return Ok(false);
        }
    }
}

/// 從負載結束事件往回掃描到作業計劃開始日期，找出第一個超載
pub(crate) fn scan_main(
    ctx: &Resolution<'_>,
    schedule: &Schedule,
    state: &ResolveState,
) -> Result<MainScan> {
    let earliest = schedule.plan(state.plan)?.start;
    let timeline = schedule.resource(ctx.resource)?.timeline();
    let mut boundary = timeline.get(state.event)?.date;

    for step in timeline.cursor(state.event, Direction::Backward)? {
        if step.event.date < earliest {
            break;
        }
        // 同一日期只看最後一個事件
        if step.event.date == boundary {
            continue;
        }
        if ctx.config.exceeds(step.event.onhand(), step.event.max()) {
            return Ok(MainScan {
                boundary,
                overload: Some(step.id),
            });
        }
        boundary = step.event.date;
    }

    Ok(MainScan {
        boundary,
        overload: None,
    })
}

/// 檢查換線作業計劃的時間窗：產能超載，或有其他換線代碼的負載與它重疊
///
/// 回傳往前移動時的起點事件。
pub(crate) fn scan_setup(
    ctx: &Resolution<'_>,
    schedule: &Schedule,
    state: &ResolveState,
    link: &SetupLink,
) -> Result<Option<EventId>> {
    let setup_plan = schedule.plan(link.plan)?;
    let (window_start, window_end) = (setup_plan.start, setup_plan.end);
    let timeline = schedule.resource(ctx.resource)?.timeline();

    let mut curdate = window_end;
    for step in timeline.cursor(link.end_event, Direction::Backward)? {
        if step.event.date < window_start {
            break;
        }
        if step.event.date == curdate {
            continue;
        }
        if ctx.config.exceeds(step.event.onhand(), step.event.max()) {
            tracing::trace!("換線時間窗 {} 超載", step.event.date);
            return Ok(Some(step.id));
        }
        curdate = step.event.date;
    }

    let own = [Some(link.plan), Some(state.plan)];
    for step in timeline.cursor(link.end_event, Direction::Backward)? {
        let event = step.event;
        if !event.is_start() || own.contains(&event.owner) {
            continue;
        }
        // 沒有換線代碼的負載不算衝突
        match event.setup.as_deref() {
            Some(code) if code != link.code => {}
            _ => continue,
        }
        let until = event
            .other
            .and_then(|other| timeline.event(other))
            .map_or(event.date, |other| other.date);
        if event.date < window_end && until > window_start {
            tracing::trace!(
                "換線衝突: {:?} 在 {} ~ {} 使用中",
                event.setup,
                event.date,
                until
            );
            return Ok(Some(step.id));
        }
    }

    Ok(None)
}

/// 嘗試縮短作業計劃，讓它從 `boundary` 開始、維持原本的結束日期
fn try_resize(
    ctx: &Resolution<'_>,
    schedule: &mut Schedule,
    state: &ResolveState,
    boundary: NaiveDateTime,
) -> Result<bool> {
    let current_end = schedule.plan(state.plan)?.end;
    schedule.set_plan_parameters(
        state.plan,
        ctx.original_quantity,
        Some(boundary),
        Some(current_end),
    )?;

    let plan = schedule.plan(state.plan)?;
    if plan.quantity > Decimal::ZERO && plan.end <= current_end && plan.start >= boundary {
        tracing::trace!(
            "作業計劃 {} 縮短為 {} @ {} ~ {}",
            state.plan,
            plan.quantity,
            plan.start,
            plan.end
        );
        return Ok(true);
    }

    // 縮短失敗，還原數量並交給往前移動處理
    schedule.set_plan_parameters(state.plan, ctx.original_quantity, None, Some(current_end))?;
    Ok(false)
}

/// 從超載事件繼續往回掃描，找出負載降回最大產能以內的日期
///
/// 搜尋範圍受最大提早時間窗限制（從原始結束日期起算）。
fn find_earlier_date(
    ctx: &Resolution<'_>,
    schedule: &Schedule,
    from: EventId,
) -> Result<Option<NaiveDateTime>> {
    let timeline = schedule.resource(ctx.resource)?.timeline();
    let limit = saturating_sub(ctx.original_end, ctx.max_early);
    let mut curdate = timeline.get(from)?.date;

    for step in timeline.cursor(from, Direction::Backward)? {
        if curdate <= limit {
            return Ok(None);
        }
        if step.event.date == curdate {
            continue;
        }
        if !ctx.config.exceeds(step.event.onhand(), step.event.max()) {
            return Ok(Some(curdate));
        }
        curdate = step.event.date;
    }

    // 時間軸第一個事件之前沒有負載
    let fits_before_first = !ctx.config.exceeds(Decimal::ZERO, timeline.initial_max());
    Ok((curdate > limit && fits_before_first).then_some(curdate))
}
