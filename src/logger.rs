//! 日志初始化
//!
//! `RUST_LOG` 优先；未设置时默认 `info`，详细模式下为 `debug`

use tracing_subscriber::EnvFilter;

/// 初始化日志（默认级别 info）
pub fn init() {
    init_with_verbosity(false);
}

/// 初始化日志，可重复调用，只有第一次生效
pub fn init_with_verbosity(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .try_init();
}
