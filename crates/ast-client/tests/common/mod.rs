//! 测试工具：进程内的规则服务 Mock
//!
//! 用 axum 实现规则服务的四个接口，记录收到的每次调用，并允许测试控制响应：
//! 指定接口返回 500，为某个规则 ID 放入任意 AST JSON，挂起某个 AST 查询直到放行。
//! Mock 不实现规则语法：parse_rule 把整条规则存为一个条件节点，
//! combine_rules 用 AND 从左到右串起各条规则。

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Notify;

/// 一次被记录的调用
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub path: &'static str,
    pub body: Value,
}

#[derive(Default)]
struct Inner {
    calls: Mutex<Vec<RecordedCall>>,
    asts: Mutex<HashMap<String, Value>>,
    failing: Mutex<HashSet<&'static str>>,
    held: Mutex<HashMap<String, Arc<Notify>>>,
    evaluate_result: Mutex<Value>,
    next_id: AtomicI64,
}

/// Mock 规则服务
#[derive(Clone)]
pub struct MockRuleServer {
    inner: Arc<Inner>,
    addr: SocketAddr,
}

impl MockRuleServer {
    /// 在随机端口启动 Mock 服务
    pub async fn start() -> Self {
        let inner = Arc::new(Inner {
            evaluate_result: Mutex::new(json!(true)),
            next_id: AtomicI64::new(1),
            ..Default::default()
        });

        let app = Router::new()
            .route("/parse_rule", post(parse_rule))
            .route("/combine_rules", post(combine_rules))
            .route("/get_ast", get(get_ast))
            .route("/evaluate", post(evaluate))
            .with_state(inner.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { inner, addr }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// 让指定接口返回 500
    pub fn fail(&self, path: &'static str) {
        self.inner.failing.lock().insert(path);
    }

    /// 为规则 ID 放入任意 AST JSON
    pub fn insert_ast(&self, rule_id: &str, ast: Value) {
        self.inner.asts.lock().insert(rule_id.to_string(), ast);
    }

    /// 设置 evaluate 接口返回的 result 字段
    pub fn set_evaluate_result(&self, result: Value) {
        *self.inner.evaluate_result.lock() = result;
    }

    /// 挂起对该规则 ID 的 AST 查询，直到调用返回的 Notify::notify_one
    pub fn hold_ast(&self, rule_id: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.inner
            .held
            .lock()
            .insert(rule_id.to_string(), gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.inner.calls.lock().clone()
    }

    pub fn calls_to(&self, path: &str) -> Vec<RecordedCall> {
        self.calls().into_iter().filter(|c| c.path == path).collect()
    }

    /// 等待某接口至少被调用 n 次
    pub async fn wait_for_calls(&self, path: &str, n: usize) {
        for _ in 0..500 {
            if self.calls_to(path).len() >= n {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("等待 {path} 被调用 {n} 次超时");
    }
}

fn record(inner: &Inner, path: &'static str, body: Value) {
    inner.calls.lock().push(RecordedCall { path, body });
}

/// 在响应前检查，挂起期间设置的失败同样生效
fn check_failing(inner: &Inner, path: &'static str) -> Result<(), StatusCode> {
    if inner.failing.lock().contains(path) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(())
}

fn store(inner: &Inner, ast: Value) -> i64 {
    let id = inner.next_id.fetch_add(1, Ordering::SeqCst);
    inner.asts.lock().insert(id.to_string(), ast);
    id
}

fn operand(rule: &str) -> Value {
    json!({"type": "operand", "value": rule, "left": null, "right": null})
}

async fn parse_rule(
    State(inner): State<Arc<Inner>>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    record(&inner, "/parse_rule", body.clone());
    check_failing(&inner, "/parse_rule")?;

    let rule = body["rule"].as_str().ok_or(StatusCode::BAD_REQUEST)?;
    if rule.trim().is_empty() {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    let id = store(&inner, operand(rule));
    Ok(Json(json!({"ruleId": id})))
}

async fn combine_rules(
    State(inner): State<Arc<Inner>>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    record(&inner, "/combine_rules", body.clone());
    check_failing(&inner, "/combine_rules")?;

    let rules = body["rules"].as_array().ok_or(StatusCode::BAD_REQUEST)?;
    let mut combined: Option<Value> = None;
    for rule in rules {
        let rule = operand(rule.as_str().ok_or(StatusCode::BAD_REQUEST)?);
        combined = Some(match combined {
            None => rule,
            Some(left) => json!({"type": "operator", "value": "AND", "left": left, "right": rule}),
        });
    }

    let ast = combined.ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;
    let id = store(&inner, ast);
    Ok(Json(json!({"ruleId": id})))
}

async fn get_ast(
    State(inner): State<Arc<Inner>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    let rule_id = params.get("ruleId").cloned().unwrap_or_default();
    record(&inner, "/get_ast", json!({"ruleId": rule_id}));

    let gate = inner.held.lock().get(&rule_id).cloned();
    if let Some(gate) = gate {
        gate.notified().await;
    }
    check_failing(&inner, "/get_ast")?;

    let ast = inner.asts.lock().get(&rule_id).cloned();
    ast.map(Json).ok_or(StatusCode::INTERNAL_SERVER_ERROR)
}

async fn evaluate(
    State(inner): State<Arc<Inner>>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    record(&inner, "/evaluate", body.clone());
    check_failing(&inner, "/evaluate")?;

    if body.get("ruleId").is_none() || body.get("data").is_none() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let result = inner.evaluate_result.lock().clone();
    Ok(Json(json!({"result": result})))
}
