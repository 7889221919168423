//! 換線作業追蹤

use fcs_core::{CapacityError, EventId, PlanId, ResolveState, ResourceId, Result, Schedule};

/// 串接在主作業計劃之前的換線作業計劃
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupLink {
    /// 換線作業計劃
    pub plan: PlanId,

    /// 換線作業計劃在此資源上的負載結束事件
    pub end_event: EventId,

    /// 請求要求的換線代碼
    pub code: String,
}

/// 換線作業追蹤器
pub struct SetupTracker;

impl SetupTracker {
    /// 找出主作業計劃在此資源上的換線作業計劃
    ///
    /// 只有資源設定了換線矩陣且請求的負載帶有換線代碼時才會尋找。
    /// 換線作業計劃存在卻找不到它在此資源上的負載結束事件，代表計劃已損毀，回傳錯誤。
    pub fn locate(
        schedule: &Schedule,
        resource: ResourceId,
        state: &ResolveState,
    ) -> Result<Option<SetupLink>> {
        let res = schedule.resource(resource)?;
        if res.setup_matrix.is_none() {
            return Ok(None);
        }

        let timeline = res.timeline();
        let code = match timeline.get(state.event)?.setup.as_deref() {
            Some(code) if !code.is_empty() => code.to_string(),
            _ => return Ok(None),
        };

        let Some(setup_plan) = schedule.plan(state.plan)?.setup else {
            return Ok(None);
        };

        let missing = CapacityError::SetupLoadMissing {
            plan: setup_plan,
            resource,
        };
        let load = match schedule.plan(setup_plan)?.load_on(resource) {
            Some(load) => *load,
            None => return Err(missing),
        };
        match timeline.event(load.end) {
            Some(event) if event.is_end() && event.owner == Some(setup_plan) => {}
            _ => return Err(missing),
        }

        tracing::trace!("作業計劃 {} 的換線作業計劃: {}", state.plan, setup_plan);
        Ok(Some(SetupLink {
            plan: setup_plan,
            end_event: load.end,
            code,
        }))
    }
}
