//! 规则 AST 客户端
//!
//! 将文本形式的布尔规则（或一组规则）交给远程规则服务解析为 AST，
//! 取回并渲染该树；另外可以把一段 JSON 数据交给服务针对已存储的规则求值。
//!
//! - 查询规范化与请求路由（单条解析 / 多条合并）
//! - AST 获取与渲染流水线
//! - 数据评估流程（本地 JSON 校验 + 布尔结果投影）

pub mod cli;
pub mod error;
pub mod models;
pub mod normalizer;
pub mod notification;
pub mod render;
pub mod router;
pub mod rule_client;
pub mod state;
pub mod workflow;

pub use error::{ErrorKind, WorkflowError};
pub use models::{AstNode, EvaluationResult, NodeType, RuleId};
pub use normalizer::{NormalizedQuery, normalize};
pub use notification::{Notification, NotificationKind, NotificationLevel, Notifier};
pub use render::{TreeView, render};
pub use router::RouteRequest;
pub use rule_client::{HttpRuleClient, RuleService};
pub use state::{DisplayState, Generation};
pub use workflow::{AcquiredAst, AcquisitionWorkflow, EvaluationWorkflow, WorkflowOutcome};
