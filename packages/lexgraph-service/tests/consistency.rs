use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};

use lexgraph_domain::{
	entity::{CaseType, CaseTypeMapping, LegalSection},
	ordinal::Severity,
};
use lexgraph_service::{
	AnalyzeRequest, BoxFuture, Error, GraphStore, LexgraphService, Result,
	store::{Neighbor, Relationship, SectionFilter, TextHit},
};

/// Serves one section whose case type mapping disappears after the first lookup.
#[derive(Default)]
struct DriftingStore {
	mapping_reads: AtomicUsize,
}
impl DriftingStore {
	fn section() -> LegalSection {
		LegalSection {
			section_id: "IPC_420".to_string(),
			section_number: "420".to_string(),
			section_title: "Cheating".to_string(),
			act_name: "Indian Penal Code".to_string(),
			category: "Criminal".to_string(),
			applicable_states: vec!["All India".to_string()],
			layman_explanation: "Tricking someone out of money.".to_string(),
			severity_level: Severity::new(4).expect("Severity must be in range."),
			cognizable: true,
			bailable: false,
			punishment_summary: "Imprisonment up to 7 years and fine".to_string(),
			max_punishment_years: 7,
			embedding_text: "cheating money".to_string(),
		}
	}

	fn mapped_case_type() -> Neighbor {
		Neighbor::CaseType {
			case_type: CaseType {
				case_type_id: "CHEATING_01".to_string(),
				case_category: "Criminal".to_string(),
				description: "Cheating".to_string(),
				duration_months: 12,
				common_mistakes: Vec::new(),
				recommended_first_action: None,
			},
			mapping: CaseTypeMapping {
				relevance_score: 0.8,
				conditions: String::new(),
				exceptions: String::new(),
			},
		}
	}
}
impl GraphStore for DriftingStore {
	fn get_section<'a>(&'a self, _: &'a str) -> BoxFuture<'a, Result<LegalSection>> {
		Box::pin(async { Ok(Self::section()) })
	}

	fn find_sections<'a>(
		&'a self,
		_: &'a SectionFilter,
	) -> BoxFuture<'a, Result<Vec<LegalSection>>> {
		Box::pin(async { Ok(Vec::new()) })
	}

	fn neighbors<'a>(
		&'a self,
		_: &'a str,
		relationship: Relationship,
	) -> BoxFuture<'a, Result<Vec<Neighbor>>> {
		Box::pin(async move {
			if relationship != Relationship::MapsToCaseType {
				return Ok(Vec::new());
			}
			if self.mapping_reads.fetch_add(1, Ordering::SeqCst) == 0 {
				return Ok(vec![Self::mapped_case_type()]);
			}

			Ok(Vec::new())
		})
	}

	fn search_by_text<'a>(
		&'a self,
		_: &'a [String],
		_: &'a SectionFilter,
	) -> BoxFuture<'a, Result<Vec<TextHit>>> {
		Box::pin(async { Ok(vec![TextHit { section: Self::section(), score: 1.0 }]) })
	}

	fn ping(&self) -> BoxFuture<'_, Result<()>> {
		Box::pin(async { Ok(()) })
	}
}

#[tokio::test]
async fn vanished_case_type_fails_the_analysis() {
	let store = Arc::new(DriftingStore::default());
	let service =
		LexgraphService::new(lexgraph_testkit::test_config("postgres://unused"), store.clone());
	let req = AnalyzeRequest {
		case_description: "Someone cheated me out of money".to_string(),
		state: None,
		category: None,
	};
	let err = service.analyze(req).await.expect_err("Drifting mappings must fail the analysis.");

	assert!(matches!(err, Error::InternalInconsistency { .. }), "unexpected error {err:?}");
	assert!(err.message().contains("CHEATING_01"));
	assert_eq!(store.mapping_reads.load(Ordering::SeqCst), 2);
}
