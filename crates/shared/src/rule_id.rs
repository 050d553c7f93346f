//! 规则标识

use std::fmt;

use serde::{Deserialize, Serialize};

/// 规则标识
///
/// 由规则服务返回，用来把解析/合并调用与后续的 AST 查询关联起来。
/// 客户端从不解释它，只负责原样传递；整数不经过浮点表示，保证无损。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleId {
    Integer(i64),
    Unsigned(u64),
    Text(String),
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Unsigned(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RuleId {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for RuleId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RuleId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}
