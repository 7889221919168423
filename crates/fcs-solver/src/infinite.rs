//! 無限產能資源

use fcs_core::{ResolveState, ResourceId, Result, Schedule};

use crate::answer::usage_cost;

/// 直接承接請求的數量與日期，只累計使用成本
pub(crate) fn grant(
    schedule: &Schedule,
    resource: ResourceId,
    state: &mut ResolveState,
) -> Result<()> {
    let res = schedule.resource(resource)?;
    let plan = schedule.plan(state.plan)?;

    state.answered_qty = state.requested_load();
    state.answered_date = state.requested_date;
    state.cost += usage_cost(state.answered_qty, res.cost, plan.duration());

    tracing::debug!(
        "無限產能資源 '{}' 承接: {} {}",
        res.name,
        state.answered_qty,
        state.answered_date
    );
    Ok(())
}
