mod common;

use std::time::Duration;

use axum::http::{header, Method, StatusCode};
use common::{build_test_router, send_empty, send_json};
use futures::StreamExt;
use serde_json::json;

#[tokio::test]
async fn hub_pushes_change_after_write() {
    let app = build_test_router().await;

    let response = send_empty(&app, Method::GET, "/api/hubs/grocery").await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/event-stream"));
    let mut stream = response.into_body().into_data_stream();

    let created = send_json(
        &app,
        Method::POST,
        "/api/groceryentries",
        json!({ "note": "Kaffefiltre" }),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let chunk = tokio::time::timeout(Duration::from_secs(5), stream.next())
        .await
        .expect("hub did not push in time")
        .expect("hub stream ended")
        .unwrap();
    let text = String::from_utf8(chunk.to_vec()).unwrap();
    assert!(text.contains("event: groceryChanged"), "got {text}");
    assert!(text.contains("\"type\":\"created\""), "got {text}");
    assert!(text.contains("\"entryId\":1"), "got {text}");
}

#[tokio::test]
async fn clear_is_pushed_without_entry_id() {
    let app = build_test_router().await;

    let response = send_empty(&app, Method::GET, "/api/hubs/grocery").await;
    let mut stream = response.into_body().into_data_stream();

    let cleared = send_empty(&app, Method::DELETE, "/api/groceryentries").await;
    assert_eq!(cleared.status(), StatusCode::NO_CONTENT);

    let chunk = tokio::time::timeout(Duration::from_secs(5), stream.next())
        .await
        .expect("hub did not push in time")
        .expect("hub stream ended")
        .unwrap();
    let text = String::from_utf8(chunk.to_vec()).unwrap();
    assert!(text.contains("\"type\":\"cleared\""), "got {text}");
    assert!(text.contains("\"entryId\":null"), "got {text}");
}
