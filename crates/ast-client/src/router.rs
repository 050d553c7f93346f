//! 请求路由
//!
//! 根据规范化后的规则数量决定调用单条解析还是多条合并接口。
//! 路由决策是输入的纯函数；`dispatch` 对每个决策恰好发起一次远程调用。

use rule_ast_shared::error::Result;
use tracing::debug;

use crate::models::RuleId;
use crate::normalizer::NormalizedQuery;
use crate::rule_client::RuleService;

/// 路由决策
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteRequest {
    /// 单条规则：调用 parse_rule
    Parse(String),
    /// 多条规则：按原始顺序调用 combine_rules
    Combine(Vec<String>),
}

impl From<NormalizedQuery> for RouteRequest {
    fn from(query: NormalizedQuery) -> Self {
        let mut rules = query.into_rules();
        if rules.len() > 1 {
            Self::Combine(rules)
        } else {
            Self::Parse(rules.pop().unwrap_or_default())
        }
    }
}

impl RouteRequest {
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Parse(_) => crate::rule_client::PARSE_RULE_PATH,
            Self::Combine(_) => crate::rule_client::COMBINE_RULES_PATH,
        }
    }

    /// 发起对应的远程调用，返回服务端分配的规则 ID
    pub async fn dispatch<S>(&self, service: &S) -> Result<RuleId>
    where
        S: RuleService + ?Sized,
    {
        debug!(endpoint = self.endpoint(), "路由规则请求");
        match self {
            Self::Parse(rule) => service.parse_rule(rule).await,
            Self::Combine(rules) => service.combine_rules(rules).await,
        }
    }
}
