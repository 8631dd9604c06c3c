use std::{future, net::SocketAddr, sync::Arc};

use tokio::net::TcpListener;

use lexgraph_api::state::AppState;
use lexgraph_service::{Error, LexgraphService, MemoryGraph};
use lexgraph_testkit::TestDatabase;

fn memory_state() -> AppState {
	let graph = MemoryGraph::from_json(lexgraph_testkit::LEGAL_GRAPH_JSON)
		.expect("Fixture graph must load.");

	AppState::from_service(LexgraphService::new(
		lexgraph_testkit::test_config("postgres://unused"),
		Arc::new(graph),
	))
}

async fn taken_addr() -> (TcpListener, SocketAddr) {
	let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind listener.");
	let addr = listener.local_addr().expect("Listener must have an address.");

	(listener, addr)
}

#[tokio::test]
async fn serve_stops_when_shutdown_resolves() {
	let addr: SocketAddr = "127.0.0.1:0".parse().expect("Address must parse.");

	lexgraph_api::serve(memory_state(), addr, async {}).await.expect("Server must stop cleanly.");
}

#[tokio::test]
async fn serve_reports_bind_failures() {
	let (_listener, addr) = taken_addr().await;
	let result = lexgraph_api::serve(memory_state(), addr, future::pending()).await;

	assert!(result.is_err());
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set LEXGRAPH_PG_DSN to run."]
async fn failed_serve_still_closes_the_pool() {
	let Some(base_dsn) = lexgraph_testkit::env_dsn() else {
		eprintln!("Skipping failed_serve_still_closes_the_pool; set LEXGRAPH_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let state = AppState::new(lexgraph_testkit::test_config(test_db.dsn()))
		.await
		.expect("State must connect.");

	assert!(state.service.health().await.is_ok());

	let (_listener, addr) = taken_addr().await;

	assert!(lexgraph_api::serve(state.clone(), addr, future::pending()).await.is_err());
	assert!(matches!(state.service.health().await, Err(Error::StoreUnavailable { .. })));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
