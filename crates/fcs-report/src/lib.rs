//! # FCS Report
//!
//! 產能排程結果報表：負載計劃匯出、資源分桶摘要、超載問題偵測

pub mod bucketing;
pub mod export;
pub mod problems;
pub mod summary;

// Re-export 主要類型
pub use bucketing::{Bucket, BucketingCalculator, BucketingStrategy};
pub use export::{export_load_plans, to_json, LoadPlanRow};
pub use problems::{detect_overloads, Problem, ProblemKind};
pub use summary::{summarize, ResourceBucket};

/// 報表錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("排程資料錯誤: {0}")]
    Capacity(#[from] fcs_core::CapacityError),

    #[error("序列化失敗: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("無效的報表區間: {0}")]
    InvalidRange(String),
}

pub type Result<T> = std::result::Result<T, ReportError>;
