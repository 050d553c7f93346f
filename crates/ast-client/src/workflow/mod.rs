//! 用户工作流
//!
//! 每个工作流由一次用户操作触发，是一条按顺序依赖的远程调用链。
//! 任何一步失败都会中止后续步骤，状态保持不变，并产出一条失败通知；
//! 期间已有同类的更新请求发起时，成功与失败都不再通知。
//! 不重试、不取消、不设默认超时。

mod acquisition;
mod evaluation;

pub use acquisition::{AcquiredAst, AcquisitionWorkflow};
pub use evaluation::EvaluationWorkflow;

use crate::error::ErrorKind;

/// 工作流结束状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowOutcome<T> {
    /// 成功，且结果已写入显示状态
    Applied(T),
    /// 期间已有同类的更新请求发起，结果（成功或失败）被丢弃
    Superseded,
    /// 失败，显示状态保持不变
    Failed(ErrorKind),
}

impl<T> WorkflowOutcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            _ => None,
        }
    }
}
