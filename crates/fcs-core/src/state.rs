//! 產能請求／回覆狀態

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{CapacityError, EventId, PlanId, ResourceId, Result, Schedule, INFINITE_FUTURE};

/// 單次產能求解的請求與回覆
///
/// 生命週期為一次求解呼叫：求解過程中持續被修改，最後由成本彙總定案。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveState {
    /// 請求數量（負數表示耗用）
    pub requested_qty: Decimal,

    /// 請求日期
    pub requested_date: NaiveDateTime,

    /// 被求解的作業計劃
    pub plan: PlanId,

    /// 被求解的負載事件（負載結束事件）
    pub event: EventId,

    /// 強制只找較晚的產能
    pub force_late: bool,

    /// 回覆數量
    pub answered_qty: Decimal,

    /// 回覆日期
    pub answered_date: NaiveDateTime,

    /// 累計成本
    pub cost: Decimal,

    /// 累計懲罰
    pub penalty: Decimal,
}

impl ResolveState {
    /// 創建新的請求
    pub fn new(
        plan: PlanId,
        event: EventId,
        requested_qty: Decimal,
        requested_date: NaiveDateTime,
    ) -> Self {
        Self {
            requested_qty,
            requested_date,
            plan,
            event,
            force_late: false,
            answered_qty: Decimal::ZERO,
            answered_date: requested_date,
            cost: Decimal::ZERO,
            penalty: Decimal::ZERO,
        }
    }

    /// 為作業計劃在指定資源上的負載建立請求
    ///
    /// 請求數量為負載的相反數，請求日期為作業計劃開始日期，錨點為負載結束事件。
    pub fn for_load(schedule: &Schedule, plan: PlanId, resource: ResourceId) -> Result<Self> {
        let operation_plan = schedule.plan(plan)?;
        let load = operation_plan
            .load_on(resource)
            .ok_or(CapacityError::LoadNotFound { plan, resource })?;
        let event = schedule.resource(resource)?.timeline().get(load.end)?;
        Ok(Self::new(plan, load.end, event.quantity, operation_plan.start))
    }

    /// 建構器模式：強制找較晚的產能
    pub fn with_force_late(mut self, force_late: bool) -> Self {
        self.force_late = force_late;
        self
    }

    /// 請求的產能單位（正數）
    pub fn requested_load(&self) -> Decimal {
        self.requested_qty.abs()
    }

    /// 是否整個計劃時界都找不到產能
    pub fn is_infeasible_everywhere(&self) -> bool {
        self.answered_qty.is_zero() && self.answered_date == INFINITE_FUTURE
    }
}
