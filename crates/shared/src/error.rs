//! 统一错误处理模块
//!
//! 定义规则服务调用链路上共享的错误类型，使用 thiserror 提供良好的错误信息。

use thiserror::Error;

/// 系统错误类型
#[derive(Debug, Error)]
pub enum RuleAstError {
    // ==================== 远程服务错误 ====================
    #[error("规则服务请求失败: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("规则服务返回错误: {endpoint} status={status} body={body}")]
    RemoteStatus {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("规则服务响应无法解析: {endpoint} - {message}")]
    Decode { endpoint: String, message: String },

    #[error("无效的规则服务地址: {0}")]
    InvalidUrl(String),

    // ==================== 配置错误 ====================
    #[error("配置加载失败: {0}")]
    Config(#[from] config::ConfigError),
}

/// 错误结果类型别名
pub type Result<T> = std::result::Result<T, RuleAstError>;

impl RuleAstError {
    /// 获取错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::Transport(e) if e.is_timeout() => "REMOTE_TIMEOUT",
            Self::Transport(_) => "REMOTE_TRANSPORT_ERROR",
            Self::RemoteStatus { .. } => "REMOTE_STATUS_ERROR",
            Self::Decode { .. } => "REMOTE_DECODE_ERROR",
            Self::InvalidUrl(_) => "INVALID_URL",
            Self::Config(_) => "CONFIG_ERROR",
        }
    }

    /// 是否属于远程调用失败（网络、非 2xx 状态、响应体不合法）
    ///
    /// 这一类错误对用户统一呈现为一条通用失败通知，具体原因只写入日志。
    pub fn is_remote_failure(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::RemoteStatus { .. } | Self::Decode { .. }
        )
    }

    /// 从响应体解析错误构造 Decode 错误
    pub fn decode(endpoint: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            endpoint: endpoint.into(),
            message: err.to_string(),
        }
    }
}
