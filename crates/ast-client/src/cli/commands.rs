//! CLI 命令定义
//!
//! 使用 clap derive 宏定义命令行接口结构。

use clap::{Parser, Subcommand, ValueEnum};

/// 规则 AST 客户端命令行工具
///
/// 把规则交给远程规则服务解析并显示 AST，或针对已存储的规则评估 JSON 数据。
#[derive(Parser, Debug)]
#[command(name = "rule-ast")]
#[command(version, about = "规则 AST 解析与数据评估客户端")]
#[command(propagate_version = true)]
pub struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)，覆盖配置文件
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// 规则服务地址，覆盖配置文件
    #[arg(long)]
    pub base_url: Option<String>,

    /// 以 JSON 格式输出日志
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// AST 输出格式
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// 终端树形文本
    #[default]
    Text,
    /// 嵌套 div 的 HTML 片段
    Html,
    /// 渲染结构的 JSON
    Json,
}

/// 子命令枚举
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 解析规则并显示 AST
    ///
    /// 输入可以是单条规则，也可以是 `[(规则1), (规则2)]` 形式的多条规则，
    /// 多条规则会交给服务端合并为一棵 AST。
    Parse {
        /// 规则文本
        query: String,

        /// 输出格式
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// 针对固定规则评估一段 JSON 数据
    Evaluate {
        /// JSON 数据
        data: String,
    },

    /// 交互模式
    Repl,
}

// ============================================================================
// 单元测试
// ============================================================================
