//! HttpEndpoint against an in-process axum server.

use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use folio_rs_client::HttpEndpoint;
use folio_rs_config::EndpointConfig;
use folio_rs_protocol::{
    AttachmentPart, BinaryFile, ContentKind, EndpointError, RecordEndpoint, SaveRequest,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

/// Requests seen by the test server.
type Captured = Arc<Mutex<Vec<Value>>>;

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{addr}")
}

fn captured(state: &Captured) -> Vec<Value> {
    state.lock().expect("lock").clone()
}

fn hero_request(id: Option<&str>) -> SaveRequest {
    SaveRequest {
        kind: ContentKind::new("home", "hero"),
        id: id.map(str::to_string),
        values: vec![json!({ "headline": { "title": "Launch" } })],
        parts: Vec::new(),
    }
}

#[tokio::test]
async fn fetch_decodes_encoded_values_and_numeric_id() {
    let router = Router::new().route(
        "/api/content/header",
        get(|| async {
            Json(json!({
                "id": 7,
                "values": "[{\"general\":{\"phone\":\"555\"}}]",
            }))
        }),
    );
    let endpoint = HttpEndpoint::new(serve(router).await).expect("endpoint");

    let envelope = endpoint
        .fetch("/api/content/header")
        .await
        .expect("fetch")
        .expect("record");

    assert_eq!(envelope.id.as_deref(), Some("7"));
    assert_eq!(envelope.values, vec![json!({ "general": { "phone": "555" } })]);
}

#[tokio::test]
async fn fetch_treats_not_found_and_empty_body_as_missing() {
    let router = Router::new().route("/api/content/empty", get(|| async { StatusCode::OK }));
    let endpoint = HttpEndpoint::new(serve(router).await).expect("endpoint");

    assert_eq!(endpoint.fetch("/api/content/none").await.expect("404"), None);
    assert_eq!(endpoint.fetch("/api/content/empty").await.expect("empty"), None);
}

#[tokio::test]
async fn create_posts_json_with_bearer_token() {
    let state = Captured::default();
    let router = Router::new()
        .route(
            "/api/content/hero",
            post(
                |State(state): State<Captured>, headers: HeaderMap, Json(body): Json<Value>| async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|value| value.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    let values = body["values"].clone();
                    state.lock().expect("lock").push(json!({ "auth": auth, "body": body }));
                    Json(json!({ "id": "rec-1", "values": values }))
                },
            ),
        )
        .with_state(state.clone());
    let config = EndpointConfig {
        base_url: format!("{}/", serve(router).await),
        timeout_secs: 5,
        token: Some("secret".to_string()),
    };
    let endpoint = HttpEndpoint::from_config(&config).expect("endpoint");

    let stored = endpoint
        .create("/api/content/hero", hero_request(None))
        .await
        .expect("create");

    assert_eq!(stored.id.as_deref(), Some("rec-1"));
    assert_eq!(stored.first(), Some(&json!({ "headline": { "title": "Launch" } })));
    assert_eq!(
        captured(&state),
        vec![json!({
            "auth": "Bearer secret",
            "body": {
                "type": "home",
                "subtype": "hero",
                "values": "[{\"headline\":{\"title\":\"Launch\"}}]",
            },
        })]
    );
}

#[tokio::test]
async fn update_puts_id_and_accepts_empty_response() {
    let state = Captured::default();
    let router = Router::new()
        .route(
            "/api/content/hero",
            put(|State(state): State<Captured>, Json(body): Json<Value>| async move {
                state.lock().expect("lock").push(body);
                StatusCode::NO_CONTENT
            }),
        )
        .with_state(state.clone());
    let endpoint = HttpEndpoint::new(serve(router).await).expect("endpoint");

    let stored = endpoint
        .update("/api/content/hero", hero_request(Some("rec-1")))
        .await
        .expect("update");

    assert_eq!(stored.id, None);
    assert!(stored.values.is_empty());
    assert_eq!(captured(&state)[0]["id"], json!("rec-1"));
}

#[tokio::test]
async fn attachments_switch_to_multipart() {
    let state = Captured::default();
    let router = Router::new()
        .route(
            "/api/content/services",
            post(|State(state): State<Captured>, mut multipart: Multipart| async move {
                while let Some(field) = multipart.next_field().await.expect("field") {
                    let name = field.name().unwrap_or_default().to_string();
                    let file_name = field.file_name().map(str::to_string);
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await.expect("bytes");
                    state.lock().expect("lock").push(json!({
                        "name": name,
                        "file_name": file_name,
                        "content_type": content_type,
                        "text": String::from_utf8_lossy(&bytes),
                    }));
                }
                Json(json!({ "id": "svc-1" }))
            }),
        )
        .with_state(state.clone());
    let endpoint = HttpEndpoint::new(serve(router).await).expect("endpoint");
    let request = SaveRequest {
        kind: ContentKind::new("home", "services"),
        id: None,
        values: vec![json!({ "home": { "title": "Services" } })],
        parts: vec![
            AttachmentPart {
                name: "file:home.banner".to_string(),
                path: "home.banner".to_string(),
                file: None,
            },
            AttachmentPart {
                name: "servicesImage0".to_string(),
                path: "home.services.0.image".to_string(),
                file: Some(BinaryFile::new("card.png", "image/png", b"png".to_vec())),
            },
        ],
    };

    let stored = endpoint
        .create("/api/content/services", request)
        .await
        .expect("create");

    assert_eq!(stored.id.as_deref(), Some("svc-1"));
    let fields = captured(&state);
    let names: Vec<&str> = fields
        .iter()
        .filter_map(|field| field["name"].as_str())
        .collect();
    assert_eq!(
        names,
        vec!["type", "subtype", "values", "file:home.banner", "servicesImage0"]
    );
    assert_eq!(fields[2]["text"], json!("[{\"home\":{\"title\":\"Services\"}}]"));
    assert_eq!(fields[3]["text"], json!(""));
    assert_eq!(fields[3]["file_name"], Value::Null);
    assert_eq!(fields[4]["file_name"], json!("card.png"));
    assert_eq!(fields[4]["content_type"], json!("image/png"));
    assert_eq!(fields[4]["text"], json!("png"));
}

#[tokio::test]
async fn delete_sends_id_in_body() {
    let state = Captured::default();
    let router = Router::new()
        .route(
            "/api/content/hero",
            delete(|State(state): State<Captured>, Json(body): Json<Value>| async move {
                state.lock().expect("lock").push(body);
                StatusCode::NO_CONTENT
            }),
        )
        .with_state(state.clone());
    let endpoint = HttpEndpoint::new(serve(router).await).expect("endpoint");

    endpoint
        .delete("/api/content/hero", "rec-1")
        .await
        .expect("delete");

    assert_eq!(captured(&state), vec![json!({ "id": "rec-1" })]);
}

#[tokio::test]
async fn error_status_carries_body() {
    let router = Router::new().route(
        "/api/content/hero",
        post(|| async { (StatusCode::UNPROCESSABLE_ENTITY, "values rejected") }),
    );
    let endpoint = HttpEndpoint::new(serve(router).await).expect("endpoint");

    let err = endpoint
        .create("/api/content/hero", hero_request(None))
        .await
        .unwrap_err();

    match err {
        EndpointError::Status { status, body } => {
            assert_eq!(status, 422);
            assert_eq!(body, "values rejected");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn malformed_success_body_is_a_decode_error() {
    let router = Router::new().route("/api/content/hero", get(|| async { "<html>" }));
    let endpoint = HttpEndpoint::new(serve(router).await).expect("endpoint");

    let err = endpoint.fetch("/api/content/hero").await.unwrap_err();

    assert!(matches!(err, EndpointError::Decode(_)));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let endpoint = HttpEndpoint::new(format!("http://{addr}")).expect("endpoint");

    let err = endpoint.fetch("/api/content/hero").await.unwrap_err();

    assert!(matches!(err, EndpointError::Transport(_)));
}
