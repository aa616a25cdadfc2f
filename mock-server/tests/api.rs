use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with_head};
use serde_json::Value;
use tower::ServiceExt;

const ITEMS: &str = "/version/1/history/acc/items";

async fn body_json(response: axum::response::Response) -> Value {
    let bytes: bytes::Bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn commit_request(ancestor: i64, count: usize, body: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(format!(
            "/version/1/history/acc/commit?ancestor-index={ancestor}&_cnt={count}"
        ))
        .header("content-type", "application/json; charset=UTF-8")
        .header("app-id", "com.example.app")
        .body(body.to_string())
        .unwrap()
}

const CREATE_ABC: &str = r#"{"abc":{"t":0,"e":"Task6","p":{"tt":"Walk dog","ss":0}}}"#;

// --- history ---

#[tokio::test]
async fn history_of_new_account_is_empty() {
    let resp = app().oneshot(get(&format!("{ITEMS}?start-index=0"))).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["current-item-index"], 0);
    assert_eq!(body["schema"], 301);
    assert_eq!(body["items"], serde_json::json!([]));
}

#[tokio::test]
async fn history_reports_initial_head() {
    let resp = app_with_head(1541)
        .oneshot(get(&format!("{ITEMS}?start-index=1540")))
        .await
        .unwrap();

    let body = body_json(resp).await;
    assert_eq!(body["current-item-index"], 1541);
}

#[tokio::test]
async fn history_rejects_non_numeric_start_index() {
    let resp = app().oneshot(get(&format!("{ITEMS}?start-index=abc"))).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- commit ---

#[tokio::test]
async fn commit_returns_new_head() {
    let resp = app_with_head(1541)
        .oneshot(commit_request(1541, 1, CREATE_ABC))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["server-head-index"], 1542);
}

#[tokio::test]
async fn stale_ancestor_is_a_conflict() {
    let resp = app_with_head(10)
        .oneshot(commit_request(9, 1, CREATE_ABC))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body = body_json(resp).await;
    assert_eq!(body["current-item-index"], 10);
}

#[tokio::test]
async fn commit_without_app_id_is_rejected() {
    let req = Request::builder()
        .method("POST")
        .uri("/version/1/history/acc/commit?ancestor-index=0&_cnt=1")
        .header("content-type", "application/json")
        .body(CREATE_ABC.to_string())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn commit_count_must_match_body() {
    let resp = app().oneshot(commit_request(0, 2, CREATE_ABC)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn modify_of_unknown_item_is_not_found() {
    let body = r#"{"nope":{"t":1,"e":"Task6","p":{"ss":3}}}"#;
    let resp = app().oneshot(commit_request(0, 1, body)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_operation_type_is_rejected() {
    let body = r#"{"abc":{"t":4,"e":"Task6","p":{}}}"#;
    let resp = app().oneshot(commit_request(0, 1, body)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_operation_returns_422() {
    let resp = app()
        .oneshot(commit_request(0, 1, r#"{"abc":{"t":0}}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- full lifecycle ---

#[tokio::test]
async fn create_complete_trash_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(commit_request(0, 1, CREATE_ABC))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["server-head-index"], 1);

    // complete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(commit_request(
            1,
            1,
            r#"{"abc":{"t":1,"e":"Task6","p":{"ss":3}}}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["server-head-index"], 2);

    // replaying the old ancestor is refused
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(commit_request(
            1,
            1,
            r#"{"abc":{"t":1,"e":"Task6","p":{"tr":true}}}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // trash
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(commit_request(
            2,
            1,
            r#"{"abc":{"t":1,"e":"Task6","p":{"tr":true}}}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["server-head-index"], 3);

    // history from 1 holds the two modifications
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get(&format!("{ITEMS}?start-index=1")))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["current-item-index"], 3);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["abc"]["p"]["ss"], 3);
    assert_eq!(items[1]["abc"]["p"]["tr"], true);
}
