use std::sync::Arc;

use axum::{
	Router,
	body::{self, Body},
	http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::util::ServiceExt;

use lexgraph_api::{routes, state::AppState};
use lexgraph_domain::entity::LegalSection;
use lexgraph_service::{
	BoxFuture, Error, GraphStore, LexgraphService, MemoryGraph, Result,
	store::{Neighbor, Relationship, SectionFilter, TextHit},
};

struct DownStore;
impl DownStore {
	fn unavailable() -> Error {
		Error::StoreUnavailable { message: "connection refused".to_string() }
	}
}
impl GraphStore for DownStore {
	fn get_section<'a>(&'a self, _: &'a str) -> BoxFuture<'a, Result<LegalSection>> {
		Box::pin(async { Err(Self::unavailable()) })
	}

	fn find_sections<'a>(
		&'a self,
		_: &'a SectionFilter,
	) -> BoxFuture<'a, Result<Vec<LegalSection>>> {
		Box::pin(async { Err(Self::unavailable()) })
	}

	fn neighbors<'a>(
		&'a self,
		_: &'a str,
		_: Relationship,
	) -> BoxFuture<'a, Result<Vec<Neighbor>>> {
		Box::pin(async { Err(Self::unavailable()) })
	}

	fn search_by_text<'a>(
		&'a self,
		_: &'a [String],
		_: &'a SectionFilter,
	) -> BoxFuture<'a, Result<Vec<TextHit>>> {
		Box::pin(async { Err(Self::unavailable()) })
	}

	fn ping(&self) -> BoxFuture<'_, Result<()>> {
		Box::pin(async { Err(Self::unavailable()) })
	}
}

fn app() -> Router {
	let graph = MemoryGraph::from_json(lexgraph_testkit::LEGAL_GRAPH_JSON)
		.expect("Fixture graph must load.");
	let service =
		LexgraphService::new(lexgraph_testkit::test_config("postgres://unused"), Arc::new(graph));

	routes::router(AppState::from_service(service))
}

fn down_app() -> Router {
	let mut cfg = lexgraph_testkit::test_config("postgres://unused");

	cfg.store.max_retries = 0;

	routes::router(AppState::from_service(LexgraphService::new(cfg, Arc::new(DownStore))))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
	let response = app.oneshot(request).await.expect("Failed to call router.");
	let status = response.status();
	let bytes = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");
	let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

	(status, value)
}

fn get(uri: &str) -> Request<Body> {
	Request::builder().uri(uri).body(Body::empty()).expect("Failed to build request.")
}

fn post_json(uri: &str, body: String) -> Request<Body> {
	Request::builder()
		.method("POST")
		.uri(uri)
		.header(header::CONTENT_TYPE, "application/json")
		.body(Body::from(body))
		.expect("Failed to build request.")
}

#[tokio::test]
async fn health_reports_connected_store() {
	let (status, body) = send(app(), get("/health")).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body, json!({ "status": "ok", "database": "connected" }));
}

#[tokio::test]
async fn health_reports_unreachable_store() {
	let (status, body) = send(down_app(), get("/health")).await;

	assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
	assert!(body["detail"].as_str().unwrap_or_default().starts_with("Database unreachable"));
}

#[tokio::test]
async fn analyze_returns_full_result() {
	let payload = json!({
		"case_description": "neighbour cheated me with false promises of money",
		"state": null,
	});
	let (status, body) = send(app(), post_json("/analyze", payload.to_string())).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["state"], "All India");
	assert_eq!(body["matched_sections"][0]["section_id"], "IPC_420");
	assert_eq!(body["matched_sections"][0]["case_type_id"], "CHEATING_01");
	assert_eq!(body["action_plan"][0]["action_id"], "ACT_FIR");
	assert_eq!(body["action_plan"][0]["sequence"], 1);
	assert_eq!(body["reasoning_trace"][0]["type"], "match");

	let confidence = body["confidence_score"].as_f64().expect("Confidence must be a number.");

	assert!(confidence > 0.0 && confidence <= 1.0);
}

#[tokio::test]
async fn analyze_rejects_blank_description() {
	let payload = json!({ "case_description": "   " });
	let (status, body) = send(app(), post_json("/analyze", payload.to_string())).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert!(body["detail"].is_string());
	assert_eq!(body.as_object().map(|object| object.len()), Some(1));
}

#[tokio::test]
async fn analyze_rejects_malformed_bodies() {
	for raw in ["{\"case_description\":", "{\"state\":\"Maharashtra\"}"] {
		let (status, body) = send(app(), post_json("/analyze", raw.to_string())).await;

		assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "body {raw}");
		assert!(body["detail"].is_string());
	}
}

#[tokio::test]
async fn analyze_surfaces_store_outage() {
	let payload = json!({ "case_description": "neighbour cheated me with false promises" });
	let (status, body) = send(down_app(), post_json("/analyze", payload.to_string())).await;

	assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
	assert_eq!(body["detail"], "connection refused");
}

#[tokio::test]
async fn graph_view_and_missing_root() {
	let (status, body) = send(app(), get("/graph/IPC_420")).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["root"], "IPC_420");
	assert!(body["edges"].as_array().is_some_and(|edges| !edges.is_empty()));

	let (status, body) = send(app(), get("/graph/IPC_000")).await;

	assert_eq!(status, StatusCode::NOT_FOUND);
	assert!(body["detail"].is_string());
}

#[tokio::test]
async fn section_detail_and_missing_section() {
	let (status, body) = send(app(), get("/section/IPC_406")).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["section_title"], "Punishment for criminal breach of trust");

	let (status, _) = send(app(), get("/section/IPC_000")).await;

	assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_validates_and_ranks() {
	let (status, body) = send(app(), get("/search?q=cheating")).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["results"][0]["section_id"], "IPC_415");
	assert_eq!(body["results"][1]["section_id"], "IPC_420");

	let (status, body) = send(app(), get("/search?q=ab")).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert!(body["detail"].is_string());

	let (status, body) = send(app(), get("/search")).await;

	assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
	assert!(body["detail"].is_string());
}

#[tokio::test]
async fn cors_allows_configured_origin() {
	let request = Request::builder()
		.method("OPTIONS")
		.uri("/analyze")
		.header(header::ORIGIN, "http://localhost:3000")
		.header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
		.body(Body::empty())
		.expect("Failed to build request.");
	let response = app().oneshot(request).await.expect("Failed to call router.");

	assert_eq!(
		response
			.headers()
			.get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
			.and_then(|value| value.to_str().ok()),
		Some("http://localhost:3000")
	);
}
