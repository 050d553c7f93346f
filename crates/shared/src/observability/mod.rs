//! 统一可观测性模块
//!
//! 提供日志的统一初始化。所有二进制入口通过单一入口点配置日志，
//! 确保字段命名和输出格式一致。

pub mod tracing;

use ::tracing::debug;
use anyhow::Result;

use crate::config::ObservabilityConfig;

/// 可观测性资源守卫
///
/// 持有日志相关资源的生命周期，drop 时刷新缓冲的日志。
pub struct ObservabilityGuard {
    _tracing_guard: tracing::TracingGuard,
}

/// 统一初始化可观测性
///
/// # Example
///
/// ```ignore
/// use rule_ast_shared::config::AppConfig;
/// use rule_ast_shared::observability;
///
/// let config = AppConfig::load()?;
/// let _guard = observability::init("rule-ast", &config.observability)?;
/// ```
pub fn init(service_name: &str, config: &ObservabilityConfig) -> Result<ObservabilityGuard> {
    let tracing_guard = tracing::init(config)?;

    debug!(
        service = %service_name,
        log_level = %config.log_level,
        log_format = %config.log_format,
        "Observability initialized"
    );

    Ok(ObservabilityGuard {
        _tracing_guard: tracing_guard,
    })
}
