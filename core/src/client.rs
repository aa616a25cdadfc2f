//! Stateless request builder and response parser for the history API.
//!
//! # Design
//! `HistoryClient` holds the account's endpoint paths and the header sets
//! built from `ClientConfig`; it never mutates them. Each operation is split
//! into a `build_*` method producing an `HttpRequest` and a `parse_*` method
//! consuming an `HttpResponse`, so the protocol can be tested without I/O.

use serde::Deserialize;
use serde_json::Value;

use crate::commit::Commit;
use crate::config::{ClientConfig, RequestHeaders};
use crate::error::{ApiError, ConfigError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

const CURRENT_ITEM_INDEX: &str = "current-item-index";
const SERVER_HEAD_INDEX: &str = "server-head-index";

/// One page of the history log as returned by the items endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPage {
    pub current_item_index: i64,
    pub schema: Option<u32>,
    pub items: Vec<Value>,
}

#[derive(Deserialize)]
struct RawHistoryPage {
    #[serde(rename = "current-item-index")]
    current_item_index: Option<i64>,
    schema: Option<u32>,
    #[serde(default)]
    items: Vec<Value>,
}

#[derive(Deserialize)]
struct RawCommitResponse {
    #[serde(rename = "server-head-index")]
    server_head_index: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct HistoryClient {
    items_url: String,
    commit_url: String,
    headers: RequestHeaders,
}

impl HistoryClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let history = format!(
            "{}/history/{}",
            config.base_url.trim_end_matches('/'),
            config.account
        );
        Ok(Self {
            items_url: format!("{history}/items"),
            commit_url: format!("{history}/commit"),
            headers: RequestHeaders::new(config)?,
        })
    }

    pub fn build_history(&self, start_index: i64) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: self.items_url.clone(),
            query: vec![("start-index".to_string(), start_index.to_string())],
            headers: self.headers.read().to_vec(),
            body: None,
        }
    }

    pub fn build_commit(&self, ancestor_index: i64, commit: &Commit) -> Result<HttpRequest, ApiError> {
        if commit.is_empty() {
            return Err(ApiError::EmptyCommit);
        }
        let body = serde_json::to_string(commit).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.commit_url.clone(),
            query: vec![
                ("ancestor-index".to_string(), ancestor_index.to_string()),
                ("_cnt".to_string(), commit.len().to_string()),
            ],
            headers: self.headers.commit().to_vec(),
            body: Some(body),
        })
    }

    pub fn parse_history(&self, response: HttpResponse) -> Result<HistoryPage, ApiError> {
        check_status(&response)?;
        let raw: RawHistoryPage =
            serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))?;
        Ok(HistoryPage {
            current_item_index: raw.current_item_index.ok_or(ApiError::MissingField(CURRENT_ITEM_INDEX))?,
            schema: raw.schema,
            items: raw.items,
        })
    }

    pub fn parse_current_index(&self, response: HttpResponse) -> Result<i64, ApiError> {
        self.parse_history(response).map(|page| page.current_item_index)
    }

    pub fn parse_commit(&self, response: HttpResponse) -> Result<i64, ApiError> {
        check_status(&response)?;
        let raw: RawCommitResponse =
            serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))?;
        raw.server_head_index.ok_or(ApiError::MissingField(SERVER_HEAD_INDEX))
    }
}

/// Anything but 200 is an application failure carrying the raw body.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.status == 200 {
        return Ok(());
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Destination, TodoItem};

    fn client() -> HistoryClient {
        let config = ClientConfig::new("acc-1", "com.example.app", "demo/1.0")
            .with_base_url("http://localhost:3000/version/1");
        HistoryClient::new(&config).unwrap()
    }

    fn ok(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_history_produces_correct_request() {
        let req = client().build_history(1540);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/version/1/history/acc-1/items");
        assert_eq!(req.query_param("start-index"), Some("1540"));
        assert_eq!(req.header("Host"), Some("localhost:3000"));
        assert!(req.header("App-Id").is_none());
        assert!(req.body.is_none());
    }

    #[test]
    fn build_commit_produces_correct_request() {
        let commit = Commit::create(TodoItem::new(1541, "HELLO WORLD", Destination::Inbox));
        let req = client().build_commit(1541, &commit).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3000/version/1/history/acc-1/commit");
        assert_eq!(req.query_param("ancestor-index"), Some("1541"));
        assert_eq!(req.query_param("_cnt"), Some("1"));
        assert_eq!(req.header("Schema"), Some("301"));
        assert_eq!(req.header("App-Instance-Id"), Some("-com.example.app"));

        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        let op = &body[commit.item_id().unwrap()];
        assert_eq!(op["t"], 0);
        assert_eq!(op["p"]["tt"], "HELLO WORLD");
    }

    #[test]
    fn build_commit_rejects_empty_commit() {
        let commit: Commit = serde_json::from_str("{}").unwrap();
        let err = client().build_commit(1, &commit).unwrap_err();
        assert!(matches!(err, ApiError::EmptyCommit));
    }

    #[test]
    fn parse_current_index_success() {
        let index = client().parse_current_index(ok(r#"{"current-item-index":1541}"#)).unwrap();
        assert_eq!(index, 1541);
    }

    #[test]
    fn parse_history_keeps_items() {
        let page = client()
            .parse_history(ok(r#"{"current-item-index":2,"schema":301,"items":[{"a":{}},{"b":{}}]}"#))
            .unwrap();
        assert_eq!(page.schema, Some(301));
        assert_eq!(page.items.len(), 2);
    }

    #[test]
    fn parse_current_index_missing_field() {
        let err = client().parse_current_index(ok(r#"{"items":[]}"#)).unwrap_err();
        assert!(matches!(err, ApiError::MissingField("current-item-index")));
    }

    #[test]
    fn parse_current_index_server_error() {
        let response = HttpResponse {
            status: 500,
            headers: Vec::new(),
            body: "internal error".to_string(),
        };
        let err = client().parse_current_index(response).unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 500, .. }));
    }

    #[test]
    fn parse_commit_success() {
        let head = client().parse_commit(ok(r#"{"server-head-index":1542}"#)).unwrap();
        assert_eq!(head, 1542);
    }

    #[test]
    fn parse_commit_conflict() {
        let response = HttpResponse {
            status: 409,
            headers: Vec::new(),
            body: r#"{"current-item-index":1600}"#.to_string(),
        };
        let err = client().parse_commit(response).unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 409, .. }));
    }

    #[test]
    fn parse_commit_bad_json() {
        let err = client().parse_commit(ok("not json")).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config = ClientConfig::new("acc", "app", "ua").with_base_url("http://h/version/1/");
        let req = HistoryClient::new(&config).unwrap().build_history(0);
        assert_eq!(req.url, "http://h/version/1/history/acc/items");
    }
}
