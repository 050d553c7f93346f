//! 查询规范化
//!
//! 把用户输入的自由文本拆成有序的规则字面量序列。输入被视为以逗号连接的
//! 带括号规则列表，可选地整体包在一对方括号里，例如 `[(a=1),(b=2)]`。

use std::sync::LazyLock;

use regex::Regex;

/// 相邻两条规则之间的边界："右括号, 可选空白, 逗号, 可选空白, 左括号"
static RULE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\)\s*,\s*\(").expect("规则边界正则表达式合法"));

/// 规范化后的规则序列，至少包含一个元素
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    rules: Vec<String>,
}

impl NormalizedQuery {
    pub fn rules(&self) -> &[String] {
        &self.rules
    }

    /// 规则条数，至少为 1
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn into_rules(self) -> Vec<String> {
        self.rules
    }
}

/// 规范化查询文本
///
/// 1. 去掉开头的一个 `[` 和结尾的一个 `]`（各自独立判断，仅最外层）
/// 2. 按规则边界切分，只消耗边界处的括号
///
/// 没有边界时得到一个元素；空输入得到 `[""]`，交由远程服务校验失败。
pub fn normalize(raw: &str) -> NormalizedQuery {
    let text = raw.strip_prefix('[').unwrap_or(raw);
    let text = text.strip_suffix(']').unwrap_or(text);

    let mut rules: Vec<String> = RULE_BOUNDARY.split(text).map(str::to_string).collect();
    if rules.is_empty() {
        rules.push(String::new());
    }

    NormalizedQuery { rules }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracketed_pair_splits_on_boundary() {
        let query = normalize("[(a=1),(b=2)]");
        assert_eq!(query.rules(), ["(a=1", "b=2)"]);
    }

    #[test]
    fn test_single_rule_is_kept_verbatim() {
        assert_eq!(normalize("age > 30").rules(), ["age > 30"]);

        let rule = "((age > 30 AND department = 'Sales') OR (age < 25))";
        assert_eq!(normalize(rule).rules(), [rule]);
    }

    #[test]
    fn test_boundary_allows_whitespace() {
        let query = normalize("(age > 30) ,\n  (salary > 50000)  ,(experience > 5)");
        assert_eq!(
            query.rules(),
            ["(age > 30", "salary > 50000", "experience > 5)"]
        );
    }

    #[test]
    fn test_only_outermost_brackets_are_stripped() {
        assert_eq!(normalize("[[x]]").rules(), ["[x]"]);
        assert_eq!(normalize("[(a=1)").rules(), ["(a=1)"]);
        assert_eq!(normalize("(a=1)]").rules(), ["(a=1)"]);
    }

    #[test]
    fn test_comma_without_parens_is_not_a_boundary() {
        assert_eq!(normalize("a = 1, b = 2").rules(), ["a = 1, b = 2"]);
    }

    #[test]
    fn test_empty_input_yields_single_empty_rule() {
        let query = normalize("");
        assert_eq!(query.len(), 1);
        assert_eq!(query.rules(), [""]);

        assert_eq!(normalize("[]").rules(), [""]);
    }

    #[test]
    fn test_normalize_is_pure() {
        let input = "[(a=1), (b=2), (c=3)]";
        assert_eq!(normalize(input), normalize(input));
    }
}
