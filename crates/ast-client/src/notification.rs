//! 用户通知
//!
//! 每个工作流结束时恰好产出一条通知。远程失败只呈现通用文案，
//! 具体原因写入日志；本地 JSON 解析失败走单独的文案。

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{EvaluationResult, RuleId};

pub const AST_FAILED_MESSAGE: &str =
    "An error occurred while creating the AST. Please check your input and try again.";
pub const MALFORMED_INPUT_MESSAGE: &str =
    "Invalid JSON format in the data input. Please correct it and try again.";
pub const EVALUATION_FAILED_MESSAGE: &str =
    "An error occurred while evaluating the data. Please check your input and try again.";

/// 通知级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// 通知类型
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationKind {
    AstCreated { rule_id: RuleId },
    AstFailed,
    /// 只有服务端给出布尔结果时才会产生，不存在"未评估"的成功通知
    EvaluationSucceeded { matched: bool },
    MalformedInput,
    EvaluationFailed,
}

impl NotificationKind {
    pub fn level(&self) -> NotificationLevel {
        match self {
            Self::AstCreated { .. } | Self::EvaluationSucceeded { .. } => {
                NotificationLevel::Success
            }
            Self::AstFailed | Self::MalformedInput | Self::EvaluationFailed => {
                NotificationLevel::Error
            }
        }
    }

    /// 面向用户的文案
    pub fn message(&self) -> String {
        match self {
            Self::AstCreated { rule_id } => {
                format!("AST created successfully with ID: {rule_id}")
            }
            Self::AstFailed => AST_FAILED_MESSAGE.to_string(),
            Self::EvaluationSucceeded { matched } => {
                format!("Evaluation successful: {}", EvaluationResult::from(*matched))
            }
            Self::MalformedInput => MALFORMED_INPUT_MESSAGE.to_string(),
            Self::EvaluationFailed => EVALUATION_FAILED_MESSAGE.to_string(),
        }
    }
}

/// 一条用户通知
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub notification_id: String,
    pub level: NotificationLevel,
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(kind: NotificationKind) -> Self {
        Self {
            notification_id: Uuid::now_v7().to_string(),
            level: kind.level(),
            message: kind.message(),
            kind,
            created_at: Utc::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.level == NotificationLevel::Success
    }
}

/// 通知投递接口
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// 终端通知：成功写 stdout，失败写 stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => println!("✔ {}", notification.message),
            NotificationLevel::Error => eprintln!("✖ {}", notification.message),
        }
    }
}

/// 内存通知记录器，保留全部已投递的通知
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.notifications.lock().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.notifications.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.lock().is_empty()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().push(notification);
    }
}

/// 同时投递到多个通知器
pub struct FanoutNotifier {
    targets: Vec<std::sync::Arc<dyn Notifier>>,
}

impl FanoutNotifier {
    pub fn new(targets: Vec<std::sync::Arc<dyn Notifier>>) -> Self {
        Self { targets }
    }
}

impl Notifier for FanoutNotifier {
    fn notify(&self, notification: Notification) {
        for target in &self.targets {
            target.notify(notification.clone());
        }
    }
}
