use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    response::IntoResponse,
    Router,
};
use graphwise_api::{build_router, config::Config, error::ApiError, state::AppState};
use graphwise_core::{
    ByteStream, GraphEndpoint, SummaryEndpoint, SummaryRequest, TurnError,
};
use graphwise_llm::{decode_summary_stream, encode_finish_part, encode_text_part, Message};
use graphwise_persist::{InMemorySessionStore, SessionStore};
use graphwise_types::{GraphDocument, GraphNode};
use serde_json::{json, Value};
use tower::ServiceExt;

struct FakeModel {
    answer: Result<Value, String>,
    seen: Mutex<Vec<Vec<Message>>>,
}

#[async_trait]
impl GraphEndpoint for FakeModel {
    async fn generate_graph(&self, messages: Vec<Message>) -> Result<Value, TurnError> {
        self.seen.lock().unwrap().push(messages);
        self.answer.clone().map_err(TurnError::Transport)
    }
}

#[async_trait]
impl SummaryEndpoint for FakeModel {
    async fn stream_summary(&self, request: SummaryRequest) -> Result<ByteStream, TurnError> {
        let lines = vec![
            Ok(encode_text_part("About ").into_bytes()),
            Ok(encode_text_part(&request.user_prompt).into_bytes()),
            Ok(encode_finish_part(None).into_bytes()),
        ];
        Ok(Box::pin(futures::stream::iter(lines)))
    }
}

fn config() -> Config {
    Config::from_file(concat!(env!("CARGO_MANIFEST_DIR"), "/config/default.toml")).unwrap()
}

fn app(answer: Result<Value, String>) -> (Router, Arc<FakeModel>, Arc<InMemorySessionStore>) {
    let model = Arc::new(FakeModel {
        answer,
        seen: Mutex::new(Vec::new()),
    });
    let store = Arc::new(InMemorySessionStore::new());
    let state = Arc::new(AppState::new(
        config(),
        model.clone(),
        model.clone(),
        store.clone(),
    ));
    (build_router(state), model, store)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn graph_answer() -> Value {
    json!({
        "nodes": [
            { "id": "rivers", "name": "Rivers", "group": 0, "val": 3 },
            { "id": "deltas", "name": "Deltas", "group": 1 }
        ],
        "links": [{ "source": "rivers", "target": "deltas" }]
    })
}

#[tokio::test]
async fn test_health() {
    let (app, _, _) = app(Ok(graph_answer()));
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["store"], "connected");
}

#[tokio::test]
async fn test_graph_from_browser_shape() {
    let (app, model, _) = app(Ok(graph_answer()));
    let response = app
        .oneshot(post_json(
            "/api/get-graph-data",
            json!({ "userPrompt": "rivers", "graphData": {} }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let graph: GraphDocument = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(graph.nodes.len(), 2);
    assert_eq!(graph.root().map(|n| n.id.as_str()), Some("rivers"));

    let seen = model.seen.lock().unwrap();
    assert_eq!(seen[0].len(), 2);
}

#[tokio::test]
async fn test_graph_with_prior_expands() {
    let (app, model, _) = app(Ok(graph_answer()));
    let prior = GraphDocument::new(vec![GraphNode::new("rivers", "Rivers").with_group(0)], vec![]);
    let response = app
        .oneshot(post_json(
            "/api/get-graph-data",
            json!({ "userPrompt": "deltas", "graphData": prior }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let seen = model.seen.lock().unwrap();
    let roles: Vec<_> = seen[0].iter().map(|m| m.role()).collect();
    assert_eq!(roles, vec!["system", "assistant", "user"]);
}

#[tokio::test]
async fn test_invalid_model_graph_is_422() {
    let (app, _, _) = app(Ok(json!({
        "nodes": [{ "id": "a", "name": "A" }],
        "links": [{ "source": "a", "target": "missing" }]
    })));
    let response = app
        .oneshot(post_json(
            "/api/get-graph-data",
            json!({ "messages": [{ "role": "user", "content": "a" }] }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("missing"));
}

#[tokio::test]
async fn test_upstream_failure_is_502() {
    let (app, _, _) = app(Err("connection refused".to_string()));
    let response = app
        .oneshot(post_json("/api/get-graph-data", json!({ "userPrompt": "x" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_summary_streams_line_protocol() {
    let (app, _, _) = app(Ok(graph_answer()));
    let response = app
        .oneshot(post_json("/api/summary", json!({ "userPrompt": "rivers" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["x-vercel-ai-data-stream"],
        "v1"
    );

    let stream = response.into_body().into_data_stream();
    let text = decode_summary_stream(stream, |_| {}).await.unwrap();
    assert_eq!(text, "About rivers");
}

#[tokio::test]
async fn test_sessions_history() {
    let (app, _, store) = app(Ok(graph_answer()));
    let created_at = chrono::Utc::now();
    store
        .insert("erin", "rivers", "About rivers", &GraphDocument::default(), created_at)
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::get("/api/sessions?user_id=erin")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body[0]["prompt"], "rivers");

    let response = app
        .oneshot(
            Request::get("/api/sessions?user_id=")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_api_error_response() {
    let response = ApiError::BadRequest("Test error".to_string()).into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
