//! 远程规则服务 HTTP 客户端封装
//!
//! 规则服务对外暴露四个 HTTP+JSON 接口：解析单条规则、合并多条规则、
//! 按规则 ID 取回 AST、针对规则评估数据。通过 RuleService trait 抽象调用，
//! 便于测试时注入 mock 实现。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use rule_ast_shared::error::{Result, RuleAstError};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, info};

use crate::models::{AstNode, RuleId};

pub const PARSE_RULE_PATH: &str = "/parse_rule";
pub const COMBINE_RULES_PATH: &str = "/combine_rules";
pub const GET_AST_PATH: &str = "/get_ast";
pub const EVALUATE_PATH: &str = "/evaluate";

// ---------------------------------------------------------------------------
// 请求/响应 DTO
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseRuleRequest {
    pub rule: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombineRulesRequest {
    pub rules: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRequest {
    pub rule_id: RuleId,
    pub data: Value,
}

/// 解析/合并接口的响应，只关心其中的规则 ID
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleIdResponse {
    pub rule_id: RuleId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateResponse {
    pub result: bool,
}

// ---------------------------------------------------------------------------
// Trait 抽象：测试时替换为 mock 实现
// ---------------------------------------------------------------------------

/// 远程规则服务的抽象接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RuleService: Send + Sync {
    /// 解析单条规则，返回服务端分配的规则 ID
    async fn parse_rule(&self, rule: &str) -> Result<RuleId>;

    /// 将多条规则合并为一棵 AST，返回规则 ID
    async fn combine_rules(&self, rules: &[String]) -> Result<RuleId>;

    /// 按规则 ID 取回 AST
    async fn get_ast(&self, rule_id: &RuleId) -> Result<AstNode>;

    /// 针对指定规则评估一段 JSON 数据
    async fn evaluate(&self, rule_id: &RuleId, data: &Value) -> Result<bool>;
}

// ---------------------------------------------------------------------------
// HTTP 客户端实现
// ---------------------------------------------------------------------------

/// 基于 reqwest 的规则服务客户端
///
/// reqwest::Client 内部带连接池，clone 是廉价操作。
#[derive(Clone)]
pub struct HttpRuleClient {
    client: Client,
    base_url: String,
}

impl HttpRuleClient {
    /// 创建规则服务客户端
    ///
    /// `timeout` 为 None 时不设置请求超时，挂起的调用会一直等待。
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let parsed = reqwest::Url::parse(base_url)
            .map_err(|e| RuleAstError::InvalidUrl(format!("{base_url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(RuleAstError::InvalidUrl(format!(
                "{base_url}: 仅支持 http/https"
            )));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        info!(base_url, ?timeout, "规则服务客户端已初始化");

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post<T: DeserializeOwned, R: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &R,
    ) -> Result<T> {
        let resp = self.client.post(self.url(path)).json(body).send().await?;
        Self::handle_response(path, resp).await
    }

    async fn handle_response<T: DeserializeOwned>(path: &str, resp: Response) -> Result<T> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RuleAstError::RemoteStatus {
                endpoint: path.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| RuleAstError::decode(path, e))
    }
}

#[async_trait]
impl RuleService for HttpRuleClient {
    async fn parse_rule(&self, rule: &str) -> Result<RuleId> {
        debug!(rule, "调用 parse_rule");

        let request = ParseRuleRequest {
            rule: rule.to_string(),
        };
        let response: RuleIdResponse = self.post(PARSE_RULE_PATH, &request).await?;

        debug!(rule_id = %response.rule_id, "parse_rule 返回");
        Ok(response.rule_id)
    }

    async fn combine_rules(&self, rules: &[String]) -> Result<RuleId> {
        debug!(rule_count = rules.len(), "调用 combine_rules");

        let request = CombineRulesRequest {
            rules: rules.to_vec(),
        };
        let response: RuleIdResponse = self.post(COMBINE_RULES_PATH, &request).await?;

        debug!(rule_id = %response.rule_id, "combine_rules 返回");
        Ok(response.rule_id)
    }

    async fn get_ast(&self, rule_id: &RuleId) -> Result<AstNode> {
        debug!(%rule_id, "调用 get_ast");

        let resp = self
            .client
            .get(self.url(GET_AST_PATH))
            .query(&[("ruleId", rule_id.to_string())])
            .send()
            .await?;
        let ast: AstNode = Self::handle_response(GET_AST_PATH, resp).await?;

        debug!(
            %rule_id,
            depth = ast.depth(),
            nodes = ast.node_count(),
            operators = ?ast.operator_counts(),
            "get_ast 返回"
        );
        Ok(ast)
    }

    async fn evaluate(&self, rule_id: &RuleId, data: &Value) -> Result<bool> {
        debug!(%rule_id, "调用 evaluate");

        let request = EvaluateRequest {
            rule_id: rule_id.clone(),
            data: data.clone(),
        };
        let response: EvaluateResponse = self.post(EVALUATE_PATH, &request).await?;

        debug!(%rule_id, result = response.result, "evaluate 返回");
        Ok(response.result)
    }
}
