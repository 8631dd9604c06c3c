use lexgraph_config::Postgres;
use lexgraph_storage::{Error, db::Db, graph, models::SectionQuery};
use lexgraph_testkit::TestDatabase;

async fn seeded_db(test_db: &TestDatabase) -> Db {
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 1 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	lexgraph_testkit::seed_legal_graph(&db.pool).await.expect("Failed to seed graph.");

	db
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set LEXGRAPH_PG_DSN to run."]
async fn schema_bootstrap_is_idempotent() {
	let Some(base_dsn) = lexgraph_testkit::env_dsn() else {
		eprintln!("Skipping schema_bootstrap_is_idempotent; set LEXGRAPH_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = seeded_db(&test_db).await;

	db.ensure_schema().await.expect("Second bootstrap must succeed.");
	db.ping().await.expect("Ping must succeed.");
	db.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set LEXGRAPH_PG_DSN to run."]
async fn find_sections_applies_jurisdiction_and_case_types() {
	let Some(base_dsn) = lexgraph_testkit::env_dsn() else {
		eprintln!("Skipping find_sections_applies_jurisdiction_and_case_types; set LEXGRAPH_PG_DSN.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = seeded_db(&test_db).await;
	let nationwide = graph::find_sections(
		&db.pool,
		&SectionQuery { state: Some("All India"), ..SectionQuery::default() },
	)
	.await
	.expect("Query must succeed.");

	assert_eq!(nationwide.iter().map(|s| s.section_id.as_str()).collect::<Vec<_>>(), vec![
		"IPC_415", "IPC_420"
	]);

	let maharashtra = graph::find_sections(
		&db.pool,
		&SectionQuery { state: Some(" maharashtra "), ..SectionQuery::default() },
	)
	.await
	.expect("Query must succeed.");

	assert_eq!(maharashtra.len(), 3);

	let case_type_ids = vec!["CHEATING_01".to_string()];
	let by_case_type = graph::find_sections(
		&db.pool,
		&SectionQuery {
			case_type_ids: Some(case_type_ids.as_slice()),
			limit: Some(5),
			..SectionQuery::default()
		},
	)
	.await
	.expect("Query must succeed.");

	// Strongest mapping first.
	assert_eq!(by_case_type.iter().map(|s| s.section_id.as_str()).collect::<Vec<_>>(), vec![
		"IPC_420", "IPC_415"
	]);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set LEXGRAPH_PG_DSN to run."]
async fn text_search_ranks_and_bounds_scores() {
	let Some(base_dsn) = lexgraph_testkit::env_dsn() else {
		eprintln!("Skipping text_search_ranks_and_bounds_scores; set LEXGRAPH_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = seeded_db(&test_db).await;
	let terms = vec!["cheated".to_string(), "promises".to_string()];
	let bounded = SectionQuery { limit: Some(5), ..SectionQuery::default() };
	let rows =
		graph::search_sections(&db.pool, &terms, &bounded).await.expect("Search must succeed.");

	assert_eq!(rows[0].section.section_id, "IPC_420");
	assert!(rows[0].score > 0.0 && rows[0].score < 1.0);
	assert!(graph::search_sections(&db.pool, &[], &bounded).await.expect("Empty.").is_empty());

	// Scope filters apply before the limit.
	let civil_terms = vec!["moneylenders".to_string(), "cheated".to_string()];
	let civil = graph::search_sections(
		&db.pool,
		&civil_terms,
		&SectionQuery {
			state: Some("Maharashtra"),
			category: Some("Civil"),
			limit: Some(1),
			..SectionQuery::default()
		},
	)
	.await
	.expect("Filtered search must succeed.");

	assert_eq!(civil.iter().map(|row| row.section.section_id.as_str()).collect::<Vec<_>>(), vec![
		"MH_MONEYLENDING_12"
	]);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set LEXGRAPH_PG_DSN to run."]
async fn edge_queries_follow_links_and_report_missing_nodes() {
	let Some(base_dsn) = lexgraph_testkit::env_dsn() else {
		eprintln!("Skipping edge_queries_follow_links_and_report_missing_nodes; set LEXGRAPH_PG_DSN.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = seeded_db(&test_db).await;
	let actions = graph::section_actions(&db.pool, "IPC_420").await.expect("Actions must load.");

	assert_eq!(actions.len(), 2);
	assert_eq!(actions[1].action_id, "ACT_FIR");
	assert_eq!(actions[1].action_sequence.as_deref(), Some("Primary"));
	assert_eq!(actions[1].procedure_steps, vec![
		"Visit the police station",
		"Collect a copy of the FIR"
	]);

	let outcomes = graph::action_outcomes(&db.pool, "ACT_FIR").await.expect("Outcomes must load.");

	assert_eq!(outcomes[0].probability_percentage, Some(50.0));

	let evidence =
		graph::section_evidence(&db.pool, "MH_MONEYLENDING_12").await.expect("Empty edges.");

	assert!(evidence.is_empty());
	assert!(matches!(
		graph::section_case_types(&db.pool, "IPC_000").await,
		Err(Error::NotFound(_))
	));
	assert!(matches!(graph::get_section(&db.pool, "IPC_000").await, Err(Error::NotFound(_))));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
