//! AST 获取工作流
//!
//! 规范化 → 路由并调用解析/合并接口 → 按返回的规则 ID 取回 AST →
//! 整棵替换显示状态中的 AST → 发出携带规则 ID 的成功通知。

use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use super::WorkflowOutcome;
use crate::error::WorkflowError;
use crate::models::{AstNode, RuleId};
use crate::normalizer::normalize;
use crate::notification::{Notification, NotificationKind, Notifier};
use crate::router::RouteRequest;
use crate::rule_client::RuleService;
use crate::state::DisplayState;

/// 一次成功获取并已写入显示状态的 AST
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquiredAst {
    pub rule_id: RuleId,
    pub ast: Arc<AstNode>,
}

/// AST 获取工作流
///
/// 持有服务与通知器的共享引用，clone 后可在独立任务中并发运行。
#[derive(Clone)]
pub struct AcquisitionWorkflow {
    service: Arc<dyn RuleService>,
    notifier: Arc<dyn Notifier>,
}

impl AcquisitionWorkflow {
    pub fn new(service: Arc<dyn RuleService>, notifier: Arc<dyn Notifier>) -> Self {
        Self { service, notifier }
    }

    /// 执行一次 AST 获取
    ///
    /// 成功时整棵替换 AST；失败时 AST 保持原样，只发出一条通用失败通知。
    #[instrument(skip(self, state, query), fields(query_len = query.len()))]
    pub async fn run(&self, state: &DisplayState, query: &str) -> WorkflowOutcome<AcquiredAst> {
        let generation = state.begin_acquisition();

        let (rule_id, ast) = match self.acquire(query).await {
            Ok(acquired) => acquired,
            Err(e) => {
                if !state.is_latest_acquisition(generation) {
                    debug!(
                        error = %e,
                        generation = generation.value(),
                        "已有更新的 AST 请求，忽略本次失败"
                    );
                    return WorkflowOutcome::Superseded;
                }
                error!(error = %e, code = e.code(), "AST 获取失败");
                self.notifier
                    .notify(Notification::new(NotificationKind::AstFailed));
                return WorkflowOutcome::Failed(e.kind());
            }
        };

        if !ast.is_well_formed() {
            warn!(%rule_id, "规则服务返回的 AST 中存在带子节点的条件节点");
        }

        let ast = Arc::new(ast);
        if !state.commit_ast(generation, ast.clone()) {
            debug!(
                %rule_id,
                generation = generation.value(),
                "已有更新的 AST 请求，丢弃本次结果"
            );
            return WorkflowOutcome::Superseded;
        }

        info!(%rule_id, "AST 已更新");
        self.notifier.notify(Notification::new(NotificationKind::AstCreated {
            rule_id: rule_id.clone(),
        }));
        WorkflowOutcome::Applied(AcquiredAst { rule_id, ast })
    }

    async fn acquire(&self, query: &str) -> Result<(RuleId, AstNode), WorkflowError> {
        let route = RouteRequest::from(normalize(query));
        let rule_id = route.dispatch(self.service.as_ref()).await?;
        let ast = self.service.get_ast(&rule_id).await?;
        Ok((rule_id, ast))
    }
}
