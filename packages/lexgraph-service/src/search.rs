use serde::Serialize;

use lexgraph_domain::{entity::LegalSection, ordinal::Severity, text};

use crate::{Error, LexgraphService, Result, store::SectionFilter};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
	pub section_id: String,
	pub section_number: String,
	pub section_title: String,
	pub layman_explanation: String,
	pub severity_level: Severity,
	pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
	pub results: Vec<SearchResult>,
}

impl LexgraphService {
	/// Text-ranked sections for a short free-text query.
	pub async fn search(&self, q: &str) -> Result<SearchResponse> {
		let q = q.trim();
		let min_chars = self.cfg.limits.search_min_chars as usize;

		if q.chars().count() < min_chars {
			return Err(Error::invalid_input(format!(
				"Query must be at least {min_chars} characters."
			)));
		}

		let terms = text::query_terms(q, min_chars, self.cfg.matching.max_query_terms as usize);

		if terms.is_empty() {
			return Ok(SearchResponse { results: Vec::new() });
		}

		let filter = SectionFilter {
			limit: Some(self.cfg.limits.search_limit as usize),
			..SectionFilter::default()
		};
		let hits = self.store.search_by_text(&terms, &filter).await?;
		let results = hits
			.into_iter()
			.map(|hit| SearchResult {
				section_id: hit.section.section_id,
				section_number: hit.section.section_number,
				section_title: hit.section.section_title,
				layman_explanation: hit.section.layman_explanation,
				severity_level: hit.section.severity_level,
				score: hit.score,
			})
			.collect();

		Ok(SearchResponse { results })
	}

	pub async fn section(&self, section_id: &str) -> Result<LegalSection> {
		let section_id = section_id.trim();

		if section_id.is_empty() {
			return Err(Error::invalid_input("section_id must not be empty."));
		}

		self.store.get_section(section_id).await
	}
}
