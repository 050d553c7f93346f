//! 交互模式命令解析

/// 交互模式下的一行输入
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// 创建 AST：`ast <规则文本>`
    Ast(String),
    /// 评估数据：`eval <JSON>`
    Eval(String),
    /// 显示当前 AST 与评估结果
    Show,
    /// 显示通知历史
    History,
    Help,
    Quit,
    /// 空行
    Empty,
    Unknown(String),
}

pub const HELP_TEXT: &str = "\
命令:
  ast <规则>      解析规则并更新 AST，例如 ast [(age > 30), (salary > 50000)]
  eval <JSON>     针对固定规则评估数据，例如 eval {\"age\": 40}
  show            显示当前 AST 与评估结果
  history         显示通知历史
  help            显示本帮助
  quit | exit     等待进行中的请求完成后退出";

impl ReplCommand {
    /// 解析一行输入；命令关键字之后的文本原样保留（仅去掉与关键字之间的空白）
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }

        let (keyword, rest) = match line.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim_start()),
            None => (line, ""),
        };

        match keyword.to_ascii_lowercase().as_str() {
            "ast" => Self::Ast(rest.to_string()),
            "eval" => Self::Eval(rest.to_string()),
            "show" => Self::Show,
            "history" => Self::History,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => Self::Unknown(keyword.to_string()),
        }
    }
}
