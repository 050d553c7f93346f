//! 规则 AST 领域模型

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

pub use rule_ast_shared::rule_id::RuleId;

/// AST 节点类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// 逻辑运算符节点（AND / OR），可以有 0~2 个子节点
    Operator,
    /// 条件节点，没有子节点
    #[default]
    Operand,
}

/// 规则 AST 节点（递归二叉树）
///
/// 从规则服务整体取回后即不可变，每次获取成功时整棵替换。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AstNode {
    #[serde(rename = "type", default)]
    pub node_type: NodeType,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<Box<AstNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<Box<AstNode>>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl AstNode {
    /// 创建条件叶子节点
    pub fn operand(value: impl Into<String>) -> Self {
        Self {
            node_type: NodeType::Operand,
            value: value.into(),
            left: None,
            right: None,
        }
    }

    /// 创建运算符节点，左右子节点均可缺省
    pub fn operator(
        value: impl Into<String>,
        left: Option<AstNode>,
        right: Option<AstNode>,
    ) -> Self {
        Self {
            node_type: NodeType::Operator,
            value: value.into(),
            left: left.map(Box::new),
            right: right.map(Box::new),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// 按先左后右的顺序返回存在的子节点
    pub fn children(&self) -> impl Iterator<Item = &AstNode> {
        self.left.iter().chain(self.right.iter()).map(|b| &**b)
    }

    /// 树的深度（单个节点为 1）
    pub fn depth(&self) -> usize {
        1 + self.children().map(AstNode::depth).max().unwrap_or(0)
    }

    pub fn node_count(&self) -> usize {
        1 + self.children().map(AstNode::node_count).sum::<usize>()
    }

    /// 检查整棵树是否满足"条件节点没有子节点"
    pub fn is_well_formed(&self) -> bool {
        match self.node_type {
            NodeType::Operand => self.is_leaf(),
            NodeType::Operator => self.children().all(AstNode::is_well_formed),
        }
    }

    /// 统计各运算符出现次数
    pub fn operator_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        self.count_operators(&mut counts);
        counts
    }

    fn count_operators(&self, counts: &mut BTreeMap<String, usize>) {
        if self.node_type == NodeType::Operator {
            *counts.entry(self.value.clone()).or_insert(0) += 1;
        }
        for child in self.children() {
            child.count_operators(counts);
        }
    }
}

/// 评估结果
///
/// 三态值：尚未评估 / 真 / 假。"尚未评估"是显式状态，而不是空值。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationResult {
    #[default]
    Unevaluated,
    True,
    False,
}

impl EvaluationResult {
    /// 面向用户的结果标签，未评估时为 None
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Self::Unevaluated => None,
            Self::True => Some("True"),
            Self::False => Some("False"),
        }
    }
}

impl From<bool> for EvaluationResult {
    fn from(value: bool) -> Self {
        if value { Self::True } else { Self::False }
    }
}

impl fmt::Display for EvaluationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label().unwrap_or("Unevaluated"))
    }
}
