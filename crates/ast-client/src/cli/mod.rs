//! CLI 模块
//!
//! 提供命令行接口，支持以下功能：
//!
//! - `parse` - 解析一条或一组规则并显示得到的 AST
//! - `evaluate` - 针对固定规则评估一段 JSON 数据
//! - `repl` - 交互模式，可连续创建 AST、评估数据、查看当前状态
//!
//! # 使用示例
//!
//! ```bash
//! # 解析单条规则
//! rule-ast parse "age > 30 AND department = 'Sales'"
//!
//! # 合并多条规则，输出 HTML
//! rule-ast parse "[(age > 30), (salary > 50000)]" --format html
//!
//! # 评估数据
//! rule-ast evaluate '{"age": 40, "department": "Sales"}'
//!
//! # 交互模式
//! rule-ast --base-url http://localhost:5001 repl
//! ```

pub mod commands;
pub mod repl;
pub mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use repl::ReplCommand;
pub use runner::CommandRunner;
