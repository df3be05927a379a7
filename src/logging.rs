//! 日志初始化
//!
//! 库内部只通过 `tracing` 宏记录事件；是否安装订阅者由调用方决定。

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// 构造过滤器：`RUST_LOG` 优先，否则使用配置中的级别
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_directive()))
}

/// 初始化日志系统
///
/// 安装 `tracing_subscriber::fmt` 订阅者。重复调用（或已有全局订阅者）时静默返回 `false`。
///
/// # 参数
///
/// * `config` - 日志配置；`log_to_console` 为假时不安装订阅者
///
/// # 返回
///
/// 本次调用是否安装了订阅者
pub fn init(config: &LoggingConfig) -> bool {
    if !config.log_to_console {
        return false;
    }

    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_target(config.show_target)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(
            target: "game_math",
            backend = %crate::BackendKind::active(),
            "game_math logging initialized"
        );
    }
    installed
}
