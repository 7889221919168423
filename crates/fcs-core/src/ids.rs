//! 排程實體識別碼
//!
//! 所有實體都存放在 [`crate::Schedule`] 的 arena 中，彼此以索引互相參照。

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub usize);

        impl $name {
            /// arena 內的索引
            #[inline]
            pub fn index(self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

arena_id!(
    /// 資源識別碼
    ResourceId,
    "resource"
);
arena_id!(
    /// 作業識別碼
    OperationId,
    "operation"
);
arena_id!(
    /// 作業計劃識別碼
    PlanId,
    "plan"
);
arena_id!(
    /// 時間軸事件識別碼（僅在所屬資源的時間軸內有效）
    EventId,
    "event"
);
