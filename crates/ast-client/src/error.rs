//! 客户端工作流错误类型
//!
//! 在共享库 RuleAstError 基础上区分两类对用户可见的失败：
//! 本地输入不是合法 JSON，以及远程规则服务调用失败。

use rule_ast_shared::error::RuleAstError;

/// 对用户呈现的错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedInput,
    RemoteFailure,
}

/// 工作流执行错误
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// 评估数据无法解析为 JSON，此时不会发起任何网络请求
    #[error("输入数据不是合法的 JSON: {0}")]
    MalformedInput(#[from] serde_json::Error),

    /// 远程调用失败（网络、非成功状态码或响应体不合法）
    #[error(transparent)]
    Remote(#[from] RuleAstError),
}

impl WorkflowError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedInput(_) => ErrorKind::MalformedInput,
            Self::Remote(_) => ErrorKind::RemoteFailure,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedInput(_) => "MALFORMED_INPUT",
            Self::Remote(e) => e.code(),
        }
    }
}
