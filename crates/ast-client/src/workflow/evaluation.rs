//! 数据评估工作流
//!
//! 本地解析 JSON → 针对固定规则 ID 调用评估接口 → 把布尔结果投影为三态评估结果。
//! 评估目标始终是配置中的固定规则 ID，而不是最近一次获取的 AST。

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use super::WorkflowOutcome;
use crate::error::{ErrorKind, WorkflowError};
use crate::models::{EvaluationResult, RuleId};
use crate::notification::{Notification, NotificationKind, Notifier};
use crate::rule_client::RuleService;
use crate::state::DisplayState;

/// 数据评估工作流
#[derive(Clone)]
pub struct EvaluationWorkflow {
    service: Arc<dyn RuleService>,
    notifier: Arc<dyn Notifier>,
    rule_id: RuleId,
}

impl EvaluationWorkflow {
    pub fn new(
        service: Arc<dyn RuleService>,
        notifier: Arc<dyn Notifier>,
        rule_id: RuleId,
    ) -> Self {
        Self {
            service,
            notifier,
            rule_id,
        }
    }

    /// 评估目标规则 ID
    pub fn rule_id(&self) -> &RuleId {
        &self.rule_id
    }

    /// 执行一次评估
    ///
    /// 输入不是合法 JSON 时发出专门的通知，且不发起网络请求。
    #[instrument(skip(self, state, payload), fields(rule_id = %self.rule_id))]
    pub async fn run(&self, state: &DisplayState, payload: &str) -> WorkflowOutcome<EvaluationResult> {
        let data: Value = match serde_json::from_str(payload) {
            Ok(data) => data,
            Err(e) => {
                let e = WorkflowError::from(e);
                warn!(error = %e, "评估数据不是合法的 JSON");
                self.notifier
                    .notify(Notification::new(NotificationKind::MalformedInput));
                return WorkflowOutcome::Failed(ErrorKind::MalformedInput);
            }
        };

        let generation = state.begin_evaluation();

        let matched = match self.service.evaluate(&self.rule_id, &data).await {
            Ok(matched) => matched,
            Err(e) => {
                let e = WorkflowError::from(e);
                if !state.is_latest_evaluation(generation) {
                    debug!(
                        error = %e,
                        generation = generation.value(),
                        "已有更新的评估请求，忽略本次失败"
                    );
                    return WorkflowOutcome::Superseded;
                }
                error!(error = %e, code = e.code(), "数据评估失败");
                self.notifier
                    .notify(Notification::new(NotificationKind::EvaluationFailed));
                return WorkflowOutcome::Failed(e.kind());
            }
        };
        let result = EvaluationResult::from(matched);

        if !state.commit_result(generation, result) {
            debug!(
                generation = generation.value(),
                %result,
                "已有更新的评估请求，丢弃本次结果"
            );
            return WorkflowOutcome::Superseded;
        }

        info!(%result, "评估完成");
        self.notifier
            .notify(Notification::new(NotificationKind::EvaluationSucceeded { matched }));
        WorkflowOutcome::Applied(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::{EVALUATION_FAILED_MESSAGE, MALFORMED_INPUT_MESSAGE, RecordingNotifier};
    use crate::rule_client::MockRuleService;
    use rule_ast_shared::error::RuleAstError;
    use serde_json::json;

    fn workflow(mock: MockRuleService) -> (EvaluationWorkflow, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        (
            EvaluationWorkflow::new(Arc::new(mock), notifier.clone(), RuleId::from(1)),
            notifier,
        )
    }

    #[tokio::test]
    async fn test_malformed_payload_issues_no_call() {
        let mut mock = MockRuleService::new();
        mock.expect_evaluate().times(0);

        let (workflow, notifier) = workflow(mock);
        let state = DisplayState::new();

        let outcome = workflow.run(&state, "{").await;

        assert_eq!(outcome, WorkflowOutcome::Failed(ErrorKind::MalformedInput));
        assert_eq!(state.result(), EvaluationResult::Unevaluated);
        let note = notifier.last().unwrap();
        assert_eq!(note.kind, NotificationKind::MalformedInput);
        assert_eq!(note.message, MALFORMED_INPUT_MESSAGE);
    }

    #[tokio::test]
    async fn test_true_result_is_projected() {
        let mut mock = MockRuleService::new();
        mock.expect_evaluate()
            .withf(|rule_id: &RuleId, data: &Value| {
                *rule_id == RuleId::from(1) && *data == json!({"age": 40})
            })
            .times(1)
            .returning(|_, _| Ok(true));

        let (workflow, notifier) = workflow(mock);
        let state = DisplayState::new();

        let outcome = workflow.run(&state, r#"{"age":40}"#).await;

        assert_eq!(outcome, WorkflowOutcome::Applied(EvaluationResult::True));
        assert_eq!(state.result(), EvaluationResult::True);
        assert_eq!(
            notifier.last().unwrap().message,
            "Evaluation successful: True"
        );
    }

    #[tokio::test]
    async fn test_false_result_replaces_previous() {
        let mut mock = MockRuleService::new();
        mock.expect_evaluate().times(1).returning(|_, _| Ok(false));

        let (workflow, notifier) = workflow(mock);
        let state = DisplayState::new();
        let earlier = state.begin_evaluation();
        state.commit_result(earlier, EvaluationResult::True);

        workflow.run(&state, r#"{"age": 20}"#).await;

        assert_eq!(state.result(), EvaluationResult::False);
        assert_eq!(
            notifier.last().unwrap().message,
            "Evaluation successful: False"
        );
    }

    #[tokio::test]
    async fn test_remote_failure_keeps_previous_result() {
        let mut mock = MockRuleService::new();
        mock.expect_evaluate().times(1).returning(|_, _| {
            Err(RuleAstError::RemoteStatus {
                endpoint: "/evaluate".to_string(),
                status: 500,
                body: String::new(),
            })
        });

        let (workflow, notifier) = workflow(mock);
        let state = DisplayState::new();
        let earlier = state.begin_evaluation();
        state.commit_result(earlier, EvaluationResult::True);

        let outcome = workflow.run(&state, r#"{"age": 20}"#).await;

        assert_eq!(outcome, WorkflowOutcome::Failed(ErrorKind::RemoteFailure));
        assert_eq!(state.result(), EvaluationResult::True);
        assert_eq!(notifier.last().unwrap().message, EVALUATION_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_any_json_value_is_accepted() {
        let mut mock = MockRuleService::new();
        mock.expect_evaluate()
            .withf(|_, data: &Value| data.is_array())
            .times(1)
            .returning(|_, _| Ok(false));

        let (workflow, _notifier) = workflow(mock);
        let state = DisplayState::new();

        let outcome = workflow.run(&state, "[1, 2, 3]").await;
        assert!(outcome.is_applied());
    }

    #[tokio::test]
    async fn test_superseded_result_is_dropped_silently() {
        let state = Arc::new(DisplayState::new());
        let during_call = state.clone();

        let mut mock = MockRuleService::new();
        // 评估进行期间用户又提交了一次数据
        mock.expect_evaluate().times(1).returning(move |_, _| {
            during_call.begin_evaluation();
            Ok(true)
        });

        let (workflow, notifier) = workflow(mock);

        let outcome = workflow.run(&state, r#"{"age": 40}"#).await;

        assert_eq!(outcome, WorkflowOutcome::Superseded);
        assert_eq!(state.result(), EvaluationResult::Unevaluated);
        assert!(notifier.is_empty());
    }

    #[tokio::test]
    async fn test_superseded_failure_is_silent() {
        let state = Arc::new(DisplayState::new());
        let during_call = state.clone();

        let mut mock = MockRuleService::new();
        mock.expect_evaluate().times(1).returning(move |_, _| {
            during_call.begin_evaluation();
            Err(RuleAstError::decode("/evaluate", "expected value"))
        });

        let (workflow, notifier) = workflow(mock);

        let outcome = workflow.run(&state, "{}").await;

        assert_eq!(outcome, WorkflowOutcome::Superseded);
        assert!(notifier.is_empty());
    }
}
