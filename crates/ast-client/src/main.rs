//! 规则 AST 客户端 CLI
//!
//! 加载配置、初始化日志后执行子命令。

use std::process::ExitCode;

use clap::Parser;
use rule_ast_client::cli::{Cli, CommandRunner, Commands};
use rule_ast_shared::config::AppConfig;
use rule_ast_shared::observability;
use tracing::debug;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = AppConfig::load()?;
    // 命令行参数优先于配置文件和环境变量
    if let Some(base_url) = cli.base_url {
        config.service.base_url = base_url;
    }
    if let Some(log_level) = cli.log_level {
        config.observability.log_level = log_level;
    }
    if cli.json_logs {
        config.observability.log_format = "json".to_string();
    }

    let _guard = observability::init("rule-ast", &config.observability)?;
    debug!(
        base_url = config.base_url(),
        environment = %config.environment,
        evaluation_rule_id = %config.evaluation.rule_id,
        "配置加载完成"
    );

    let runner = CommandRunner::from_config(&config)?;

    let succeeded = match cli.command {
        Commands::Parse { query, format } => match runner.run_parse(&query, format).await {
            Some(rendered) => {
                print!("{rendered}");
                true
            }
            None => false,
        },
        Commands::Evaluate { data } => runner.run_evaluate(&data).await,
        Commands::Repl => {
            runner.run_repl().await?;
            true
        }
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
