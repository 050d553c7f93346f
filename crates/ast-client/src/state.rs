//! 显示状态容器
//!
//! 持有两个共享槽位：当前显示的 AST 与最近一次评估结果。
//! 每个槽位带一个单调递增的请求代号：工作流开始时领取代号，
//! 结束时只有代号仍是该类工作流最新签发的那个，写入才会生效（最新请求胜出）。

use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::{AstNode, EvaluationResult};

/// 请求代号
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// 带代号的槽位
#[derive(Debug, Default)]
struct Slot<T> {
    latest_issued: u64,
    value: T,
}

impl<T> Slot<T> {
    fn begin(&mut self) -> Generation {
        self.latest_issued += 1;
        Generation(self.latest_issued)
    }

    fn is_latest(&self, generation: Generation) -> bool {
        generation.0 == self.latest_issued
    }

    fn commit(&mut self, generation: Generation, value: T) -> bool {
        if !self.is_latest(generation) {
            return false;
        }
        self.value = value;
        true
    }
}

/// 显示状态
///
/// 以引用传入各工作流，仅在工作流结束时写入，不存在全局可变状态。
#[derive(Debug, Default)]
pub struct DisplayState {
    ast: Mutex<Slot<Option<Arc<AstNode>>>>,
    result: Mutex<Slot<EvaluationResult>>,
}

impl DisplayState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前显示的 AST
    pub fn ast(&self) -> Option<Arc<AstNode>> {
        self.ast.lock().value.clone()
    }

    /// 最近一次评估结果
    pub fn result(&self) -> EvaluationResult {
        self.result.lock().value
    }

    /// 为一次 AST 获取领取代号
    pub fn begin_acquisition(&self) -> Generation {
        self.ast.lock().begin()
    }

    /// 该代号是否仍是最新签发的 AST 获取
    pub fn is_latest_acquisition(&self, generation: Generation) -> bool {
        self.ast.lock().is_latest(generation)
    }

    /// 整棵替换 AST；代号已过期时不写入并返回 false
    pub fn commit_ast(&self, generation: Generation, ast: impl Into<Arc<AstNode>>) -> bool {
        self.ast.lock().commit(generation, Some(ast.into()))
    }

    /// 为一次评估领取代号
    pub fn begin_evaluation(&self) -> Generation {
        self.result.lock().begin()
    }

    /// 该代号是否仍是最新签发的评估
    pub fn is_latest_evaluation(&self, generation: Generation) -> bool {
        self.result.lock().is_latest(generation)
    }

    /// 写入评估结果；代号已过期时不写入并返回 false
    pub fn commit_result(&self, generation: Generation, result: EvaluationResult) -> bool {
        self.result.lock().commit(generation, result)
    }
}
