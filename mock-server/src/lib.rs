//! In-memory stand-in for the history API.
//!
//! Keeps one append-only log per account. Commits are accepted only when
//! their `ancestor-index` equals the current head; anything else is a 409
//! carrying the head the client should have used.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, warn};

pub const SCHEMA: u32 = 301;

const OP_CREATE: u8 = 0;
const OP_MODIFY: u8 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Operation {
    pub t: u8,
    pub e: String,
    pub p: Map<String, Value>,
}

/// One account's log and the item state it has produced.
#[derive(Debug, Default)]
pub struct History {
    pub head: i64,
    /// Applied commits, each tagged with the head it was applied on top of.
    pub log: Vec<(i64, HashMap<String, Operation>)>,
    pub items: HashMap<String, Map<String, Value>>,
}

impl History {
    fn starting_at(head: i64) -> Self {
        Self {
            head,
            ..Self::default()
        }
    }
}

#[derive(Debug, Default)]
pub struct Accounts {
    initial_head: i64,
    histories: HashMap<String, History>,
}

impl Accounts {
    fn history(&mut self, account: &str) -> &mut History {
        let initial_head = self.initial_head;
        self.histories
            .entry(account.to_string())
            .or_insert_with(|| History::starting_at(initial_head))
    }
}

pub type Db = Arc<RwLock<Accounts>>;

#[derive(Deserialize)]
pub struct HistoryParams {
    #[serde(rename = "start-index", default)]
    pub start_index: i64,
}

#[derive(Deserialize)]
pub struct CommitParams {
    #[serde(rename = "ancestor-index")]
    pub ancestor_index: i64,
    #[serde(rename = "_cnt")]
    pub count: Option<usize>,
}

type ApiResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

pub fn app() -> Router {
    app_with_head(0)
}

/// Router whose accounts start with `head` as their current index.
pub fn app_with_head(head: i64) -> Router {
    let db: Db = Arc::new(RwLock::new(Accounts {
        initial_head: head,
        histories: HashMap::new(),
    }));
    Router::new()
        .route("/version/1/history/{account}/items", get(list_history))
        .route("/version/1/history/{account}/commit", post(commit))
        .with_state(db)
}

pub async fn run(listener: TcpListener, head: i64) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_head(head)).await
}

fn reject(status: StatusCode, body: Value) -> (StatusCode, Json<Value>) {
    warn!(%status, %body, "rejecting request");
    (status, Json(body))
}

async fn list_history(
    State(db): State<Db>,
    Path(account): Path<String>,
    Query(params): Query<HistoryParams>,
) -> Json<Value> {
    let mut accounts = db.write().await;
    let history = accounts.history(&account);
    let items: Vec<_> = history
        .log
        .iter()
        .filter(|(slot, _)| *slot >= params.start_index)
        .map(|(_, ops)| json!(ops))
        .collect();
    Json(json!({
        "current-item-index": history.head,
        "schema": SCHEMA,
        "items": items,
    }))
}

async fn commit(
    State(db): State<Db>,
    Path(account): Path<String>,
    Query(params): Query<CommitParams>,
    headers: HeaderMap,
    Json(ops): Json<HashMap<String, Operation>>,
) -> ApiResult {
    if !headers.contains_key("app-id") {
        return Err(reject(StatusCode::BAD_REQUEST, json!({"error": "missing App-Id"})));
    }
    if params.count.is_some_and(|count| count != ops.len()) {
        return Err(reject(
            StatusCode::BAD_REQUEST,
            json!({"error": "_cnt does not match operation count"}),
        ));
    }

    let mut accounts = db.write().await;
    let history = accounts.history(&account);

    if params.ancestor_index != history.head {
        return Err(reject(
            StatusCode::CONFLICT,
            json!({"current-item-index": history.head}),
        ));
    }

    for (id, op) in &ops {
        match op.t {
            OP_CREATE => {}
            OP_MODIFY if history.items.contains_key(id) => {}
            OP_MODIFY => {
                return Err(reject(StatusCode::NOT_FOUND, json!({"error": "unknown item", "id": id})));
            }
            other => {
                return Err(reject(
                    StatusCode::BAD_REQUEST,
                    json!({"error": "unknown operation type", "t": other}),
                ));
            }
        }
    }

    for (id, op) in &ops {
        let fields = history.items.entry(id.clone()).or_default();
        if op.t == OP_CREATE {
            fields.clear();
        }
        fields.extend(op.p.clone());
    }

    let slot = history.head;
    history.log.push((slot, ops));
    history.head += 1;
    debug!(%account, head = history.head, "commit applied");

    Ok(Json(json!({"server-head-index": history.head})))
}
