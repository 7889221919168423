//! 產能求解入口

use chrono::{Duration, NaiveDateTime};
use fcs_core::{
    Capacity, CapacityError, ResolveState, ResourceId, Result, Schedule, SolverConfig,
};
use rust_decimal::Decimal;

use crate::lead_time::LeadTimeCheck;
use crate::setup::{SetupLink, SetupTracker};

/// 產能求解器
///
/// 外層求解器對每個 (資源, 負載請求) 呼叫一次 [`CapacityResolver::resolve`]，
/// 結果寫回 [`ResolveState`] 的回覆欄位。
pub struct CapacityResolver<'a> {
    config: SolverConfig,
    leadtime: &'a dyn LeadTimeCheck,
}

/// 單次求解的共用內容
pub(crate) struct Resolution<'a> {
    pub config: &'a SolverConfig,
    pub leadtime: &'a dyn LeadTimeCheck,
    pub resource: ResourceId,
    pub max_early: Duration,
    pub setup: Option<SetupLink>,
    pub original_quantity: Decimal,
    pub original_end: NaiveDateTime,
}

impl<'a> CapacityResolver<'a> {
    /// 創建新的產能求解器
    pub fn new(config: SolverConfig, leadtime: &'a dyn LeadTimeCheck) -> Self {
        Self { config, leadtime }
    }

    /// 求解器配置
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// 求解一個負載請求
    pub fn resolve(
        &self,
        schedule: &mut Schedule,
        resource: ResourceId,
        state: &mut ResolveState,
    ) -> Result<()> {
        match schedule.resource(resource)?.capacity {
            Capacity::Infinite => crate::infinite::grant(schedule, resource, state),
            Capacity::Finite { max_early } => {
                self.resolve_finite(schedule, resource, max_early, state)
            }
        }
    }

    fn resolve_finite(
        &self,
        schedule: &mut Schedule,
        resource: ResourceId,
        max_early: Duration,
        state: &mut ResolveState,
    ) -> Result<()> {
        let res = schedule.resource(resource)?;
        let event = res.timeline().get(state.event)?;
        if !event.is_end() || event.owner != Some(state.plan) {
            return Err(CapacityError::InvalidRequest(format!(
                "{} 不是作業計劃 {} 的負載結束事件",
                state.event, state.plan
            )));
        }

        let plan = schedule.plan(state.plan)?;
        tracing::debug!(
            "資源 '{}' 被請求: {} {} ~ {}",
            res.name,
            state.requested_load(),
            plan.start,
            plan.end
        );

        let ctx = Resolution {
            config: &self.config,
            leadtime: self.leadtime,
            resource,
            max_early,
            setup: SetupTracker::locate(schedule, resource, state)?,
            original_quantity: plan.quantity,
            original_end: plan.end,
        };

        // 預設回覆：全數承接
        state.answered_date = state.requested_date;
        state.answered_qty = state.requested_load();

        let mut no_restore = false;
        if !state.force_late {
            no_restore = crate::earlier::search(&ctx, schedule, state)?;
        }

        if state.answered_qty.is_zero() || state.force_late {
            crate::later::search(&ctx, schedule, state, no_restore)?;
        }

        crate::answer::accrue(&ctx, schedule, state)?;

        let plan = schedule.plan(state.plan)?;
        tracing::debug!(
            "資源 '{}' 回覆: {} {}",
            schedule.resource(resource)?.name,
            state.answered_qty,
            state.answered_date
        );
        if plan.end < ctx.original_end {
            tracing::debug!("  使用較早的產能，結束於 {}", plan.end);
        }
        if state.answered_qty > Decimal::ZERO && plan.quantity < ctx.original_quantity {
            tracing::debug!("  數量縮減為 {}", plan.quantity);
        }
        Ok(())
    }
}
