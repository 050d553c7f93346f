//! 配置管理模块
//!
//! 支持多格式配置文件加载，环境变量覆盖，以及类型安全的配置访问。

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::error::Result;
use crate::rule_id::RuleId;

const DEFAULT_EVALUATION_RULE_ID: i64 = 1;

/// 远程规则服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub base_url: String,
    /// 单次请求超时（秒）；缺省时不设超时
    pub timeout_seconds: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5001".to_string(),
            timeout_seconds: None,
        }
    }
}

impl ServiceConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

/// 数据评估配置
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationConfig {
    /// 评估始终针对的固定规则 ID，与最近一次创建的 AST 无关；整数或字符串均可
    pub rule_id: RuleId,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            rule_id: RuleId::Integer(DEFAULT_EVALUATION_RULE_ID),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    pub log_level: String,
    /// 日志输出格式：json（结构化）或 pretty（人类可读）
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

impl ObservabilityConfig {
    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub environment: String,
    pub service: ServiceConfig,
    pub evaluation: EvaluationConfig,
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 加载顺序（后加载的会覆盖先加载的同名配置项）：
    /// 1. 内置默认值
    /// 2. config/default.toml（默认配置）
    /// 3. config/{environment}.toml（环境特定配置）
    /// 4. 环境变量（RULE_AST_ 前缀，层级用双下划线，如 RULE_AST_SERVICE__BASE_URL -> service.base_url）
    pub fn load() -> Result<Self> {
        let env = std::env::var("RULE_AST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_dir =
            std::env::var("RULE_AST_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

        Self::load_from(Path::new(&config_dir), &env)
    }

    /// 从指定目录加载配置，便于测试时指向临时目录
    pub fn load_from(config_dir: &Path, env: &str) -> Result<Self> {
        let defaults = Self::default();

        let builder = Config::builder()
            .set_default("environment", env)?
            .set_default("service.base_url", defaults.service.base_url)?
            .set_default("evaluation.rule_id", DEFAULT_EVALUATION_RULE_ID)?
            .set_default("observability.log_level", defaults.observability.log_level)?
            .set_default("observability.log_format", defaults.observability.log_format)?
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join(format!("{}.toml", env))).required(false))
            // 环境变量覆盖（RULE_AST_SERVICE__BASE_URL -> service.base_url）
            .add_source(
                Environment::with_prefix("RULE_AST")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        Ok(builder.build()?.try_deserialize()?)
    }

    /// 规则服务根地址（去掉末尾斜杠）
    pub fn base_url(&self) -> &str {
        self.service.base_url.trim_end_matches('/')
    }
}
