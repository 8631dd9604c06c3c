use std::sync::Arc;

use lexgraph_service::{AnalyzeRequest, Error, LexgraphService, PgGraphStore};
use lexgraph_storage::db::Db;
use lexgraph_testkit::TestDatabase;

async fn service(test_db: &TestDatabase) -> LexgraphService {
	let cfg = lexgraph_testkit::test_config(test_db.dsn());
	let db = Db::connect(&cfg.storage.postgres).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");
	lexgraph_testkit::seed_legal_graph(&db.pool).await.expect("Failed to seed graph.");

	LexgraphService::new(cfg, Arc::new(PgGraphStore::new(Arc::new(db))))
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set LEXGRAPH_PG_DSN to run."]
async fn postgres_store_backs_full_analysis() {
	let Some(base_dsn) = lexgraph_testkit::env_dsn() else {
		eprintln!("Skipping postgres_store_backs_full_analysis; set LEXGRAPH_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let service = service(&test_db).await;
	let result = service
		.analyze(AnalyzeRequest {
			case_description: "neighbour cheated me with false promises of money".to_string(),
			state: None,
			category: None,
		})
		.await
		.expect("Analysis must succeed.");

	assert_eq!(result.matched_sections[0].section.section_id, "IPC_420");
	assert_eq!(result.matched_sections[0].case_type_id.as_deref(), Some("CHEATING_01"));
	assert!(result.matched_sections.iter().all(|m| m.section.section_id != "MH_MONEYLENDING_12"));
	assert_eq!(result.action_plan[0].action.action_id, "ACT_FIR");
	assert_eq!(result.action_plan[0].action.procedure_steps.len(), 2);

	let conviction = &result.outcome_probabilities[0];

	assert_eq!(conviction.outcome.outcome_id, "OUT_CONVICTION");
	assert!((conviction.probability - 0.7).abs() < 1e-9);
	assert_eq!(result.evidence_checklist[0].evidence.evidence_id, "EV_BANK");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set LEXGRAPH_PG_DSN to run."]
async fn postgres_store_reports_missing_sections() {
	let Some(base_dsn) = lexgraph_testkit::env_dsn() else {
		eprintln!("Skipping postgres_store_reports_missing_sections; set LEXGRAPH_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let service = service(&test_db).await;

	assert!(matches!(service.section("IPC_000").await, Err(Error::NotFound { .. })));
	assert!(matches!(service.section_graph("IPC_000").await, Err(Error::NotFound { .. })));

	let view = service.section_graph("IPC_420").await.expect("Graph must build.");

	assert!(view.nodes.iter().any(|node| node.id == "IPC_415"));
	assert!(view.edges.iter().any(|edge| edge.label == "LEADS_TO"));
	assert_eq!(service.health().await.expect("Store must answer.").database, "connected");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
