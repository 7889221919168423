//! # FCS Solver
//!
//! 有限產能求解：判斷資源能否承接作業計劃的負載，
//! 不能時縮減數量、提早或延後作業計劃，使累計負載不超過最大產能

mod answer;
mod earlier;
mod infinite;
mod later;
pub mod lead_time;
pub mod resolver;
pub mod setup;

// Re-export 主要類型
pub use lead_time::{LeadTimeCheck, NoConstraint, PlanningFence};
pub use resolver::CapacityResolver;
pub use setup::{SetupLink, SetupTracker};
