//! Configured edit sessions talking to an in-process content API.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use folio_rs::client::HttpEndpoint;
use folio_rs::config::FolioConfig;
use folio_rs::core::EditSession;
use folio_rs::resolve_definitions;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

/// The single stored record, as the API would return it.
type Store = Arc<Mutex<Option<Value>>>;

async fn fetch(State(store): State<Store>) -> Response {
    match store.lock().expect("lock").clone() {
        Some(record) => Json(record).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn create(State(store): State<Store>, Json(body): Json<Value>) -> Json<Value> {
    // Numeric id and string-encoded values, like the production API.
    let record = json!({ "id": 41, "values": body["values"].clone() });
    *store.lock().expect("lock") = Some(record.clone());
    Json(record)
}

async fn update(State(store): State<Store>, Json(body): Json<Value>) -> Json<Value> {
    let record = json!({ "id": body["id"].clone(), "values": body["values"].clone() });
    *store.lock().expect("lock") = Some(record.clone());
    Json(record)
}

async fn remove(State(store): State<Store>) -> StatusCode {
    *store.lock().expect("lock") = None;
    StatusCode::NO_CONTENT
}

async fn serve(store: Store) -> String {
    let router = Router::new()
        .route(
            "/cms/promo",
            get(fetch).post(create).put(update).delete(remove),
        )
        .with_state(store);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{addr}")
}

const CONFIG: &str = r#"{
    documents: [
        {
            name: "promo",
            api_path: "/cms/promo",
            type: "home",
            subtype: "promo",
            array_fallback: ["slides"],
            defaults: {
                title: "Spring sale",
                slides: [{ caption: "", image: "" }],
                visible: true,
            },
        },
    ],
}"#;

#[tokio::test]
async fn configured_document_round_trips_through_http() {
    let store = Store::default();
    let mut config = FolioConfig::load_from_str(CONFIG).expect("config");
    config.endpoint.base_url = serve(store.clone()).await;
    let definition = resolve_definitions(&config)
        .expect("definitions")
        .into_iter()
        .find(|definition| definition.name == "promo")
        .expect("promo");
    let endpoint = HttpEndpoint::from_config(&config.endpoint).expect("endpoint");

    let mut session = EditSession::new(definition.clone());
    session.load(&endpoint).await.expect("load");
    assert!(!session.is_persisted());

    session.set("title", "Summer sale").expect("set");
    session.set("visible", false).expect("set");
    session.submit(&endpoint).await.expect("create");
    assert_eq!(session.record_id(), Some("41"));

    let mut reloaded = EditSession::new(definition.clone());
    reloaded.load(&endpoint).await.expect("reload");
    assert_eq!(reloaded.get("title"), Some(&json!("Summer sale")));
    assert_eq!(reloaded.get("visible"), Some(&json!(false)));

    reloaded.set("slides", json!([])).expect("set");
    reloaded.submit(&endpoint).await.expect("update");
    assert_eq!(
        reloaded.get("slides"),
        Some(&json!([{ "caption": "", "image": "" }]))
    );
    assert_eq!(reloaded.record_id(), Some("41"));

    reloaded.delete(&endpoint).await.expect("delete");
    assert_eq!(store.lock().expect("lock").clone(), None);
    assert_eq!(reloaded.document(), &definition.default_shape);
}
