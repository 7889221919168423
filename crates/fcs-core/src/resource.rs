//! 資源模型

use chrono::{Duration, NaiveDateTime};
use rust_decimal::Decimal;

use crate::timeline::Timeline;
use crate::EventId;

/// 產能策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    /// 有限產能：負載不得超過時間軸上生效的最大產能
    Finite {
        /// 允許往前提早的最大時間窗（從原始結束日期起算）
        max_early: Duration,
    },

    /// 無限產能：不檢查負載
    Infinite,
}

/// 資源
#[derive(Debug, Clone)]
pub struct Resource {
    /// 資源名稱
    pub name: String,

    /// 產能策略
    pub capacity: Capacity,

    /// 每單位每小時成本
    pub cost: Decimal,

    /// 換線矩陣（有設定時才會處理換線作業）
    pub setup_matrix: Option<String>,

    timeline: Timeline,
}

impl Resource {
    /// 創建有限產能資源
    pub fn finite(name: impl Into<String>, max: Decimal) -> Self {
        Self {
            name: name.into(),
            capacity: Capacity::Finite {
                max_early: Duration::zero(),
            },
            cost: Decimal::ZERO,
            setup_matrix: None,
            timeline: Timeline::new(max),
        }
    }

    /// 創建無限產能資源
    pub fn infinite(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capacity: Capacity::Infinite,
            cost: Decimal::ZERO,
            setup_matrix: None,
            timeline: Timeline::new(Decimal::MAX),
        }
    }

    /// 建構器模式：設置每小時成本
    pub fn with_cost(mut self, cost: Decimal) -> Self {
        self.cost = cost;
        self
    }

    /// 建構器模式：設置最大提早時間窗（僅對有限產能資源有效）
    pub fn with_max_early(mut self, window: Duration) -> Self {
        if let Capacity::Finite { max_early } = &mut self.capacity {
            *max_early = window;
        }
        self
    }

    /// 建構器模式：設置換線矩陣
    pub fn with_setup_matrix(mut self, matrix: impl Into<String>) -> Self {
        self.setup_matrix = Some(matrix.into());
        self
    }

    /// 建構器模式：新增產能變更
    pub fn with_capacity_change(mut self, date: NaiveDateTime, max: Decimal) -> Self {
        self.timeline.add_capacity_change(date, max);
        self
    }

    /// 新增產能變更
    pub fn add_capacity_change(&mut self, date: NaiveDateTime, max: Decimal) -> EventId {
        self.timeline.add_capacity_change(date, max)
    }

    /// 負載時間軸
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub(crate) fn timeline_mut(&mut self) -> &mut Timeline {
        &mut self.timeline
    }

    pub fn is_infinite(&self) -> bool {
        self.capacity == Capacity::Infinite
    }

    /// 最大提早時間窗；無限產能資源沒有
    pub fn max_early(&self) -> Option<Duration> {
        match self.capacity {
            Capacity::Finite { max_early } => Some(max_early),
            Capacity::Infinite => None,
        }
    }
}
