//! 日志订阅器初始化
//!
//! 日志统一写入 stderr，命令行工具的 stdout 只留给面向用户的输出。

use std::io::Write;

use anyhow::Result;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::config::ObservabilityConfig;

/// Tracing 资源守卫
///
/// drop 时刷新 stderr，避免进程退出前最后几行日志丢失。
pub struct TracingGuard {
    _private: (),
}

impl Drop for TracingGuard {
    fn drop(&mut self) {
        let _ = std::io::stderr().flush();
    }
}

/// 构建环境过滤器：RUST_LOG 优先，其次是配置的日志级别
pub fn build_env_filter(config: &ObservabilityConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| level_filter(&config.log_level))
}

/// 按配置的日志级别构建过滤器，表达式非法时回退到 warn
fn level_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// 初始化 tracing（日志）
pub fn init(config: &ObservabilityConfig) -> Result<TracingGuard> {
    let env_filter = build_env_filter(config);

    let fmt_layer = if config.json_logs() {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_thread_ids(true)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(TracingGuard { _private: () })
}
