//! # FCS Core
//!
//! 有限產能排程核心資料模型：資源、負載時間軸、作業與作業計劃

pub mod config;
pub mod dates;
pub mod ids;
pub mod operation;
pub mod plan;
pub mod resource;
pub mod schedule;
pub mod state;
pub mod timeline;

// Re-export 主要類型
pub use config::SolverConfig;
pub use dates::{INFINITE_FUTURE, INFINITE_PAST};
pub use ids::{EventId, OperationId, PlanId, ResourceId};
pub use operation::{DurationPolicy, Load, Operation, OperationKind};
pub use plan::{LoadPlan, OperationPlan};
pub use resource::{Capacity, Resource};
pub use schedule::Schedule;
pub use state::ResolveState;
pub use timeline::{Cursor, Direction, Event, EventKind, Step, Timeline};

/// 產能求解錯誤類型
///
/// 只有內部不變量被破壞或呼叫參數無效時才會回傳錯誤；
/// 找不到產能是正常結果，透過回覆欄位傳回。
#[derive(Debug, thiserror::Error)]
pub enum CapacityError {
    #[error("找不到換線作業計劃 {plan} 在資源 {resource} 上的結束負載")]
    SetupLoadMissing { plan: PlanId, resource: ResourceId },

    #[error("找不到資源: {0}")]
    ResourceNotFound(ResourceId),

    #[error("找不到作業: {0}")]
    OperationNotFound(OperationId),

    #[error("找不到作業計劃: {0}")]
    PlanNotFound(PlanId),

    #[error("找不到時間軸事件: {0}")]
    EventNotFound(EventId),

    #[error("作業計劃 {plan} 在資源 {resource} 上沒有負載")]
    LoadNotFound { plan: PlanId, resource: ResourceId },

    #[error("無效的產能請求: {0}")]
    InvalidRequest(String),

    #[error("無效的數量: {0}")]
    InvalidQuantity(String),
}

pub type Result<T> = std::result::Result<T, CapacityError>;
