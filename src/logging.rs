//! 日誌初始化
//!
//! 使用 `RUST_LOG` 控制日誌級別，例如 `RUST_LOG=fcs_solver=trace`

use tracing_subscriber::{fmt, EnvFilter};

/// 初始化日誌系統（預設 info）
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .init();

    tracing::info!("日誌系統已初始化");
}

/// 初始化測試用日誌，可重複呼叫
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
