//! 回覆彙總：成本與懲罰

use chrono::Duration;
use fcs_core::dates::duration_hours;
use fcs_core::{ResolveState, Result, Schedule};
use rust_decimal::Decimal;

use crate::resolver::Resolution;

/// 使用成本：數量 × 每小時費率 × 時長（小時）
///
/// 資源不可用的時段也照時長計費。
pub(crate) fn usage_cost(quantity: Decimal, rate: Decimal, duration: Duration) -> Decimal {
    quantity * rate * duration_hours(duration)
}

/// 依最終回覆累計成本與懲罰，回覆數量為零時不累計
pub(crate) fn accrue(
    ctx: &Resolution<'_>,
    schedule: &Schedule,
    state: &mut ResolveState,
) -> Result<()> {
    if state.answered_qty <= Decimal::ZERO {
        return Ok(());
    }

    let rate = schedule.resource(ctx.resource)?.cost;
    let plan = schedule.plan(state.plan)?;
    state.cost += usage_cost(state.answered_qty, rate, plan.duration());

    if let Some(link) = &ctx.setup {
        let setup = schedule.plan(link.plan)?;
        state.cost += usage_cost(state.answered_qty, rate, setup.duration());
        state.penalty += setup.penalty;
    }
    Ok(())
}
