//! 作業計劃模型

use chrono::{Duration, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EventId, OperationId, PlanId, ResourceId};

/// 作業計劃在單一資源上的負載事件對
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadPlan {
    /// 資源
    pub resource: ResourceId,

    /// 負載開始事件
    pub start: EventId,

    /// 負載結束事件
    pub end: EventId,
}

/// 作業計劃（已排定的作業實例）
///
/// 負載事件登記在資源時間軸上；變更數量或日期必須透過
/// [`crate::Schedule`] 的調整原語，才能同步更新時間軸。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationPlan {
    /// 外部參照ID
    pub id: Uuid,

    /// 作業
    pub operation: OperationId,

    /// 計劃數量
    pub quantity: Decimal,

    /// 開始日期
    pub start: NaiveDateTime,

    /// 結束日期
    pub end: NaiveDateTime,

    /// 各資源上的負載事件
    pub loads: Vec<LoadPlan>,

    /// 緊接在前的換線作業計劃
    pub setup: Option<PlanId>,

    /// 換線作業計劃所服務的主作業計劃
    pub setup_for: Option<PlanId>,

    /// 懲罰值（換線作業計劃使用）
    pub penalty: Decimal,
}

impl OperationPlan {
    pub(crate) fn new(
        operation: OperationId,
        quantity: Decimal,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            operation,
            quantity,
            start,
            end,
            loads: Vec::new(),
            setup: None,
            setup_for: None,
            penalty: Decimal::ZERO,
        }
    }

    /// 計劃時長
    pub fn duration(&self) -> Duration {
        self.end.signed_duration_since(self.start)
    }

    /// 在指定資源上的負載事件對
    pub fn load_on(&self, resource: ResourceId) -> Option<&LoadPlan> {
        self.loads.iter().find(|l| l.resource == resource)
    }

    /// 是否為換線作業計劃
    pub fn is_setup(&self) -> bool {
        self.setup_for.is_some()
    }
}
