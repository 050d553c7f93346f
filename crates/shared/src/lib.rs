//! 共享库
//!
//! 规则 AST 客户端各组件共用的配置加载、错误类型与可观测性初始化代码。

pub mod config;
pub mod error;
pub mod observability;
pub mod rule_id;
