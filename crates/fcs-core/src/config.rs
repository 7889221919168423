//! 求解器配置

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 產能求解參數配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// 捨入容差：負載與最大產能比較時允許的誤差
    pub rounding_tolerance: Decimal,

    /// 是否檢查提前期限制
    pub leadtime_constrained: bool,

    /// 是否檢查凍結期（fence）限制
    pub fence_constrained: bool,
}

impl SolverConfig {
    /// 預設捨入容差
    pub const DEFAULT_ROUNDING_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 6);

    /// 創建預設配置（兩種限制皆啟用）
    pub fn new() -> Self {
        Self {
            rounding_tolerance: Self::DEFAULT_ROUNDING_TOLERANCE,
            leadtime_constrained: true,
            fence_constrained: true,
        }
    }

    /// 創建不受提前期與凍結期限制的配置
    pub fn unconstrained() -> Self {
        Self::new()
            .with_leadtime_constrained(false)
            .with_fence_constrained(false)
    }

    /// 建構器模式：設置捨入容差
    pub fn with_rounding_tolerance(mut self, tolerance: Decimal) -> Self {
        self.rounding_tolerance = tolerance.abs();
        self
    }

    /// 建構器模式：設置是否檢查提前期
    pub fn with_leadtime_constrained(mut self, constrained: bool) -> Self {
        self.leadtime_constrained = constrained;
        self
    }

    /// 建構器模式：設置是否檢查凍結期
    pub fn with_fence_constrained(mut self, constrained: bool) -> Self {
        self.fence_constrained = constrained;
        self
    }

    /// 是否需要呼叫提前期／凍結期檢查
    pub fn is_constrained(&self) -> bool {
        self.leadtime_constrained || self.fence_constrained
    }

    /// 負載是否超過最大產能（含容差）
    pub fn exceeds(&self, onhand: Decimal, max: Decimal) -> bool {
        max.checked_add(self.rounding_tolerance)
            .is_some_and(|limit| onhand > limit)
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::new()
    }
}
