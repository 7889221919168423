//! 作業模型

use chrono::{Duration, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::dates::{duration_seconds, saturating_add, saturating_sub};
use crate::ResourceId;

/// 作業類型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// 生產作業
    Production,
    /// 換線作業
    Setup,
}

/// 作業對資源的負載
#[derive(Debug, Clone, PartialEq)]
pub struct Load {
    /// 資源
    pub resource: ResourceId,

    /// 同時佔用的產能單位
    pub quantity: Decimal,

    /// 要求的換線代碼
    pub setup: Option<String>,
}

impl Load {
    pub fn new(resource: ResourceId, quantity: Decimal) -> Self {
        Self {
            resource,
            quantity,
            setup: None,
        }
    }

    /// 建構器模式：設置換線代碼
    pub fn with_setup(mut self, setup: impl Into<String>) -> Self {
        self.setup = Some(setup.into());
        self
    }
}

/// 作業時長公式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationPolicy {
    /// 固定時長，與數量無關
    FixedTime { duration: Duration },

    /// 固定時長加上每單位時長
    TimePer { fixed: Duration, per_unit: Duration },
}

impl DurationPolicy {
    /// 指定數量所需的時長
    pub fn duration_for(&self, quantity: Decimal) -> Duration {
        match *self {
            DurationPolicy::FixedTime { duration } => duration,
            DurationPolicy::TimePer { fixed, per_unit } => {
                let variable = (duration_seconds(per_unit) * quantity.max(Decimal::ZERO))
                    .round()
                    .to_i64()
                    .unwrap_or(i64::MAX);
                Duration::try_seconds(variable)
                    .and_then(|v| fixed.checked_add(&v))
                    .unwrap_or(Duration::MAX)
            }
        }
    }

    /// 依數量與日期邊界計算作業計劃參數，回傳 (數量, 開始, 結束)
    ///
    /// - 只有結束邊界：往前推算開始日期
    /// - 只有開始邊界：往後推算結束日期
    /// - 兩者皆有：對齊結束邊界；`TimePer` 會縮減數量以放入區間，
    ///   `FixedTime` 則可能早於開始邊界，由呼叫者判斷
    /// - 兩者皆無：維持 `current_end`
    pub fn plan(
        &self,
        quantity: Decimal,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
        current_end: NaiveDateTime,
    ) -> (Decimal, NaiveDateTime, NaiveDateTime) {
        match (start, end) {
            (Some(s), Some(e)) => self.fit(quantity, s, e),
            (None, Some(e)) => (quantity, saturating_sub(e, self.duration_for(quantity)), e),
            (Some(s), None) => (quantity, s, saturating_add(s, self.duration_for(quantity))),
            (None, None) => (
                quantity,
                saturating_sub(current_end, self.duration_for(quantity)),
                current_end,
            ),
        }
    }

    fn fit(
        &self,
        quantity: Decimal,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> (Decimal, NaiveDateTime, NaiveDateTime) {
        let needed = self.duration_for(quantity);
        let available = end.signed_duration_since(start);
        if needed <= available {
            return (quantity, saturating_sub(end, needed), end);
        }

        match *self {
            DurationPolicy::FixedTime { .. } => (quantity, saturating_sub(end, needed), end),
            DurationPolicy::TimePer { fixed, per_unit } => {
                if available < fixed || per_unit <= Duration::zero() {
                    return (Decimal::ZERO, saturating_sub(end, fixed), end);
                }
                let reduced = (duration_seconds(available - fixed) / duration_seconds(per_unit))
                    .min(quantity);
                let begin = saturating_sub(end, self.duration_for(reduced)).max(start);
                (reduced, begin, end)
            }
        }
    }
}

/// 作業
#[derive(Debug, Clone)]
pub struct Operation {
    /// 作業名稱
    pub name: String,

    /// 作業類型
    pub kind: OperationKind,

    /// 時長公式
    pub duration: DurationPolicy,

    /// 資源負載
    pub loads: Vec<Load>,
}

impl Operation {
    /// 創建固定時長的生產作業
    pub fn fixed_time(name: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            kind: OperationKind::Production,
            duration: DurationPolicy::FixedTime { duration },
            loads: Vec::new(),
        }
    }

    /// 創建依數量計算時長的生產作業
    pub fn time_per(name: impl Into<String>, fixed: Duration, per_unit: Duration) -> Self {
        Self {
            name: name.into(),
            kind: OperationKind::Production,
            duration: DurationPolicy::TimePer { fixed, per_unit },
            loads: Vec::new(),
        }
    }

    /// 創建換線作業
    pub fn setup(name: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            kind: OperationKind::Setup,
            duration: DurationPolicy::FixedTime { duration },
            loads: Vec::new(),
        }
    }

    /// 建構器模式：新增資源負載
    pub fn with_load(mut self, load: Load) -> Self {
        self.loads.push(load);
        self
    }

    /// 在指定資源上的負載
    pub fn load_on(&self, resource: ResourceId) -> Option<&Load> {
        self.loads.iter().find(|l| l.resource == resource)
    }

    pub fn is_setup(&self) -> bool {
        self.kind == OperationKind::Setup
    }
}
