//! 命令执行器
//!
//! 负责执行各 CLI 子命令的具体逻辑，把命令行参数转化为工作流调用。

use std::io::Write as _;
use std::sync::Arc;

use anyhow::{Context, Result};
use rule_ast_shared::config::AppConfig;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tracing::{info, warn};

use super::commands::OutputFormat;
use super::repl::{HELP_TEXT, ReplCommand};
use crate::models::{AstNode, RuleId};
use crate::notification::{ConsoleNotifier, FanoutNotifier, Notifier, RecordingNotifier};
use crate::render::{EMPTY_PLACEHOLDER, render, render_text_or_placeholder};
use crate::rule_client::{HttpRuleClient, RuleService};
use crate::state::DisplayState;
use crate::workflow::{AcquisitionWorkflow, EvaluationWorkflow, WorkflowOutcome};

/// 命令执行器
///
/// 持有显示状态和两个工作流，作为 CLI 与业务逻辑之间的桥梁。
pub struct CommandRunner {
    state: Arc<DisplayState>,
    acquisition: AcquisitionWorkflow,
    evaluation: EvaluationWorkflow,
    history: Arc<RecordingNotifier>,
}

impl CommandRunner {
    /// 创建命令执行器
    ///
    /// 所有通知同时投递给 `notifier` 和内部的历史记录。
    pub fn new(
        service: Arc<dyn RuleService>,
        notifier: Arc<dyn Notifier>,
        evaluation_rule_id: RuleId,
    ) -> Self {
        let history = Arc::new(RecordingNotifier::new());
        let notifier: Arc<dyn Notifier> = Arc::new(FanoutNotifier::new(vec![
            notifier,
            history.clone() as Arc<dyn Notifier>,
        ]));

        Self {
            state: Arc::new(DisplayState::new()),
            acquisition: AcquisitionWorkflow::new(service.clone(), notifier.clone()),
            evaluation: EvaluationWorkflow::new(service, notifier, evaluation_rule_id),
            history,
        }
    }

    /// 按配置创建连接真实规则服务、通知输出到终端的执行器
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = HttpRuleClient::new(config.base_url(), config.service.timeout())
            .context("创建规则服务客户端失败")?;

        Ok(Self::new(
            Arc::new(client),
            Arc::new(ConsoleNotifier),
            config.evaluation.rule_id.clone(),
        ))
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn history(&self) -> &RecordingNotifier {
        &self.history
    }

    /// 执行 parse 命令，成功时返回渲染后的 AST
    pub async fn run_parse(&self, query: &str, format: OutputFormat) -> Option<String> {
        match self.acquisition.run(&self.state, query).await {
            WorkflowOutcome::Applied(acquired) => Some(format_ast(&acquired.ast, format)),
            WorkflowOutcome::Superseded | WorkflowOutcome::Failed(_) => None,
        }
    }

    /// 执行 evaluate 命令，返回评估是否成功
    pub async fn run_evaluate(&self, data: &str) -> bool {
        self.evaluation.run(&self.state, data).await.is_applied()
    }

    /// 当前状态的文本视图
    pub fn render_state(&self) -> String {
        let mut out = String::from("Formed AST\n");
        out.push_str(&render_text_or_placeholder(self.state.ast().as_deref()));
        if let Some(label) = self.state.result().label() {
            out.push_str(&format!("Result: {label}\n"));
        }
        out
    }

    /// 通知历史的文本视图
    pub fn render_history(&self) -> String {
        self.history
            .notifications()
            .iter()
            .map(|n| {
                format!(
                    "{} [{:?}] {}\n",
                    n.created_at.format("%H:%M:%S"),
                    n.level,
                    n.message
                )
            })
            .collect()
    }

    /// 执行 repl 命令
    ///
    /// 每个 `ast` / `eval` 操作在独立任务中运行，前一个请求未完成时即可发起下一个；
    /// 同类请求以最后发起的为准。退出时等待所有进行中的请求结束。
    pub async fn run_repl(&self) -> Result<()> {
        info!(evaluation_rule_id = %self.evaluation.rule_id(), "进入交互模式");
        println!("{HELP_TEXT}");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut in_flight = JoinSet::new();

        loop {
            prompt();
            let Some(line) = lines.next_line().await.context("读取输入失败")? else {
                break;
            };

            while let Some(finished) = in_flight.try_join_next() {
                if let Err(e) = finished {
                    warn!(error = %e, "后台任务异常结束");
                }
            }

            match ReplCommand::parse(&line) {
                ReplCommand::Ast(query) => {
                    let workflow = self.acquisition.clone();
                    let state = self.state.clone();
                    in_flight.spawn(async move {
                        // 只输出本次请求取回的树，不读共享槽位
                        if let WorkflowOutcome::Applied(acquired) = workflow.run(&state, &query).await
                        {
                            print!("{}", render(&acquired.ast).to_text());
                        }
                    });
                }
                ReplCommand::Eval(payload) => {
                    let workflow = self.evaluation.clone();
                    let state = self.state.clone();
                    in_flight.spawn(async move {
                        workflow.run(&state, &payload).await;
                    });
                }
                ReplCommand::Show => print!("{}", self.render_state()),
                ReplCommand::History => print!("{}", self.render_history()),
                ReplCommand::Help => println!("{HELP_TEXT}"),
                ReplCommand::Quit => break,
                ReplCommand::Empty => {}
                ReplCommand::Unknown(keyword) => {
                    println!("未知命令: {keyword}（输入 help 查看可用命令）");
                }
            }
        }

        if !in_flight.is_empty() {
            println!("等待 {} 个进行中的请求完成...", in_flight.len());
        }
        while let Some(finished) = in_flight.join_next().await {
            if let Err(e) = finished {
                warn!(error = %e, "后台任务异常结束");
            }
        }

        info!("退出交互模式");
        Ok(())
    }
}

/// 按指定格式输出 AST
pub fn format_ast(ast: &AstNode, format: OutputFormat) -> String {
    let view = render(ast);
    match format {
        OutputFormat::Text => view.to_text(),
        OutputFormat::Html => format!("{}\n", view.to_html()),
        OutputFormat::Json => match serde_json::to_string_pretty(&view) {
            Ok(json) => format!("{json}\n"),
            Err(e) => {
                warn!(error = %e, "AST 序列化失败");
                format!("{EMPTY_PLACEHOLDER}\n")
            }
        },
    }
}

fn prompt() {
    print!("rule-ast> ");
    let _ = std::io::stdout().flush();
}
