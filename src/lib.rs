//! # FCS
//!
//! 有限產能排程：負載時間軸、產能求解與排程報表
//!
//! ```no_run
//! use fcs::prelude::*;
//!
//! fcs::logging::init();
//!
//! let mut schedule = Schedule::new();
//! let oven = schedule.add_resource(Resource::finite("OVEN", Decimal::from(10)));
//! ```

pub mod logging;

pub use fcs_core;
pub use fcs_report;
pub use fcs_solver;

/// 常用類型
pub mod prelude {
    pub use fcs_core::{
        Capacity, CapacityError, DurationPolicy, Load, Operation, ResolveState, Resource,
        Schedule, SolverConfig, INFINITE_FUTURE,
    };
    pub use fcs_report::{detect_overloads, export_load_plans, summarize};
    pub use fcs_solver::{CapacityResolver, LeadTimeCheck, NoConstraint, PlanningFence};
    pub use rust_decimal::Decimal;
}
