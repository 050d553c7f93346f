//! AST 渲染
//!
//! 把 AST 递归投影为嵌套的可视结构 `TreeView`：先渲染节点自身的标签，
//! 再依次渲染存在的左、右子节点，每个子节点放在各自独立的嵌套容器里。
//! `TreeView` 可以再输出为终端文本、HTML 片段或 JSON。
//!
//! 递归深度不设上限，输入来自受信任的规则服务且必然是树。

use std::fmt::Write as _;

use serde::Serialize;

use crate::models::AstNode;

/// AST 为空时显示的占位文本
pub const EMPTY_PLACEHOLDER: &str = "No AST available";

/// 渲染后的可视节点
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeView {
    pub label: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeView>,
}

impl TreeView {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// 终端文本形式，使用制表符线条表示层级
    ///
    /// ```text
    /// AND
    /// ├── age > 30
    /// └── salary > 50000
    /// ```
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.label);
        out.push('\n');
        self.write_text_children(&mut out, "");
        out
    }

    fn write_text_children(&self, out: &mut String, prefix: &str) {
        let last = self.children.len().saturating_sub(1);
        for (i, child) in self.children.iter().enumerate() {
            let (branch, indent) = if i == last {
                ("└── ", "    ")
            } else {
                ("├── ", "│   ")
            };
            let _ = writeln!(out, "{prefix}{branch}{}", child.label);
            child.write_text_children(out, &format!("{prefix}{indent}"));
        }
    }

    /// HTML 片段形式：`tree-node` 容器内先是 `node-content` 标签，
    /// 有子节点时再跟一个 `children` 容器，每个子节点包在各自的 `child` 容器中
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push_str(r#"<div class="tree-node"><div class="node-content">"#);
        out.push_str(&escape_html(&self.label));
        out.push_str("</div>");
        if !self.children.is_empty() {
            out.push_str(r#"<div class="children">"#);
            for child in &self.children {
                out.push_str(r#"<div class="child">"#);
                child.write_html(out);
                out.push_str("</div>");
            }
            out.push_str("</div>");
        }
        out.push_str("</div>");
    }
}

/// 递归渲染 AST
pub fn render(node: &AstNode) -> TreeView {
    TreeView {
        label: node.value.clone(),
        children: node.children().map(render).collect(),
    }
}

/// 渲染可能为空的 AST 槽位为终端文本
pub fn render_text_or_placeholder(node: Option<&AstNode>) -> String {
    match node {
        Some(node) => render(node).to_text(),
        None => format!("{EMPTY_PLACEHOLDER}\n"),
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
