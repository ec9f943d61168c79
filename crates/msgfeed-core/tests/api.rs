//! MessagesApi against a real local HTTP server.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use msgfeed_core::{FeedError, Message, MessageSource, MessagesApi, Payload};

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_fetch_sends_limit_and_decodes_list() {
    let seen_limit: Arc<Mutex<Option<String>>> = Arc::default();
    let seen = seen_limit.clone();

    let app = Router::new().route(
        "/messages",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let seen = seen.clone();
            async move {
                *seen.lock().unwrap() = params.get("limit").cloned();
                Json(json!([
                    {"text": "Привіт!", "timestamp": "2024-03-15T08:30:00Z"},
                    {"text": "<i>без розмітки</i>"}
                ]))
            }
        }),
    );
    let base_url = serve(app).await;

    // trailing slash is tolerated
    let api = MessagesApi::new(&format!("{}/", base_url));
    let payload = api.fetch_messages(10).await.unwrap();

    assert_eq!(seen_limit.lock().unwrap().as_deref(), Some("10"));
    assert_eq!(
        payload,
        Payload::Messages(vec![
            Message::new("Привіт!").with_timestamp("2024-03-15T08:30:00Z"),
            Message::new("<i>без розмітки</i>"),
        ])
    );
}

#[tokio::test]
async fn test_fetch_empty_list() {
    let app = Router::new().route("/messages", get(|| async { Json(json!([])) }));
    let api = MessagesApi::new(&serve(app).await);

    assert_eq!(api.fetch_messages(5).await.unwrap(), Payload::Empty);
}

#[tokio::test]
async fn test_fetch_server_error_status() {
    let app = Router::new().route(
        "/messages",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let api = MessagesApi::new(&serve(app).await);

    let err = api.fetch_messages(10).await.unwrap_err();
    assert_eq!(err, FeedError::HttpStatus(500));
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_fetch_error_field() {
    let app = Router::new().route(
        "/messages",
        get(|| async { Json(json!({"error": "X"})) }),
    );
    let api = MessagesApi::new(&serve(app).await);

    let err = api.fetch_messages(10).await.unwrap_err();
    assert_eq!(err, FeedError::ServerReported("X".to_string()));
}

#[tokio::test]
async fn test_fetch_malformed_body() {
    let app = Router::new().route("/messages", get(|| async { "<html>not json</html>" }));
    let api = MessagesApi::new(&serve(app).await);

    let err = api.fetch_messages(10).await.unwrap_err();
    assert!(matches!(err, FeedError::MalformedPayload(_)));
}

#[tokio::test]
async fn test_fetch_connection_refused() {
    // nothing listens on a freshly released port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = MessagesApi::new(&format!("http://{}", addr));
    let err = api.fetch_messages(10).await.unwrap_err();
    assert!(matches!(err, FeedError::Network(_)));
}

#[tokio::test]
async fn test_post_message() {
    let posted: Arc<Mutex<Vec<Value>>> = Arc::default();
    let seen = posted.clone();

    let app = Router::new().route(
        "/messages",
        axum::routing::post(move |Json(body): Json<Value>| {
            let seen = seen.clone();
            async move {
                seen.lock().unwrap().push(body);
                Json(json!({"success": true}))
            }
        }),
    );
    let api = MessagesApi::new(&serve(app).await);

    api.post_message("Дякую!").await.unwrap();
    assert_eq!(*posted.lock().unwrap(), vec![json!({"text": "Дякую!"})]);
}

#[tokio::test]
async fn test_post_message_rejected() {
    let app = Router::new()
        .route(
            "/messages",
            axum::routing::post(|| async {
                Json(json!({"success": false, "error": "Порожнє повідомлення"}))
            }),
        )
        .route(
            "/bare/messages",
            axum::routing::post(|| async { Json(json!({"success": false})) }),
        );
    let base_url = serve(app).await;

    let err = MessagesApi::new(&base_url).post_message("x").await.unwrap_err();
    assert_eq!(err, FeedError::ServerReported("Порожнє повідомлення".to_string()));

    let err = MessagesApi::new(&format!("{}/bare", base_url))
        .post_message("x")
        .await
        .unwrap_err();
    assert_eq!(err, FeedError::ServerReported("Невідома помилка".to_string()));
}
