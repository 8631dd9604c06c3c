//! Section matching: a text path over section prose and a symbolic path over the keyword rule
//! table, merged into one scored, deterministically ordered list.

use std::{cmp::Ordering, collections::BTreeMap};

use serde::Serialize;

use lexgraph_config::Matching;
use lexgraph_domain::{
	entity::LegalSection,
	jurisdiction,
	rules::{self, RuleHit},
	section_number, text,
};

use crate::{
	Error, Result,
	store::{self, GraphStore, SectionFilter},
};

#[derive(Debug, Clone, Copy)]
pub struct MatchQuery<'a> {
	pub description: &'a str,
	/// Already resolved; "All India" when the caller named no state.
	pub state: &'a str,
	pub category: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionMatch {
	#[serde(flatten)]
	pub section: LegalSection,
	pub relevance_score: f64,
	pub case_type_id: Option<String>,
	pub explain: MatchExplain,
}

/// Raw components behind `relevance_score`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchExplain {
	pub text_score: f64,
	pub rule_score: f64,
	pub jurisdiction_match: bool,
	pub category_match: bool,
	pub matched_keywords: Vec<String>,
}

#[derive(Debug)]
struct Candidate {
	section: LegalSection,
	text_score: f64,
	rule_score: f64,
	rule_case_type: Option<String>,
	keywords: Vec<String>,
}
impl Candidate {
	fn new(section: LegalSection) -> Self {
		Self {
			section,
			text_score: 0.0,
			rule_score: 0.0,
			rule_case_type: None,
			keywords: Vec::new(),
		}
	}
}

pub async fn match_sections(
	store: &dyn GraphStore,
	cfg: &Matching,
	query: MatchQuery<'_>,
) -> Result<Vec<SectionMatch>> {
	let description = query.description.trim();

	if description.is_empty() {
		return Err(Error::invalid_input("case_description must not be empty."));
	}

	let terms =
		text::query_terms(description, cfg.min_term_chars as usize, cfg.max_query_terms as usize);
	let hits = rules::fire(description);
	// Scope constraints go to the store so they apply before either path's limit.
	let text_filter = SectionFilter {
		state: Some(query.state.to_string()),
		category: query.category.map(str::to_string),
		limit: Some(cfg.text_section_limit as usize),
		..SectionFilter::default()
	};
	let rule_filter = SectionFilter {
		case_type_ids: Some(hits.iter().map(|hit| hit.case_type_id.clone()).collect()),
		limit: Some(cfg.rule_section_limit as usize),
		..text_filter.clone()
	};
	let (text_hits, rule_sections) = tokio::try_join!(
		async {
			if terms.is_empty() {
				return Ok(Vec::new());
			}

			store.search_by_text(&terms, &text_filter).await
		},
		async {
			if hits.is_empty() {
				return Ok(Vec::new());
			}

			store.find_sections(&rule_filter).await
		},
	)?;

	tracing::debug!(
		terms = terms.len(),
		rules_fired = hits.len(),
		text_hits = text_hits.len(),
		rule_sections = rule_sections.len(),
		"Collected section candidates."
	);

	let mut candidates: BTreeMap<String, Candidate> = BTreeMap::new();

	for hit in text_hits {
		let candidate = candidates
			.entry(hit.section.section_id.clone())
			.or_insert_with(|| Candidate::new(hit.section));

		candidate.text_score = candidate.text_score.max(hit.score.clamp(0.0, 1.0));
	}
	for section in rule_sections {
		candidates.entry(section.section_id.clone()).or_insert_with(|| Candidate::new(section));
	}

	let mut out = Vec::with_capacity(candidates.len());

	for candidate in candidates.into_values() {
		if let Some(matched) = score_candidate(store, cfg, &query, &hits, candidate).await? {
			out.push(matched);
		}
	}

	out.sort_by(compare_matches);

	Ok(out)
}

async fn score_candidate(
	store: &dyn GraphStore,
	cfg: &Matching,
	query: &MatchQuery<'_>,
	hits: &[RuleHit],
	mut candidate: Candidate,
) -> Result<Option<SectionMatch>> {
	let links = store::case_type_links(store, &candidate.section.section_id).await?;

	for (case_type, mapping) in &links {
		let Some(hit) = hits.iter().find(|hit| hit.case_type_id == case_type.case_type_id) else {
			continue;
		};

		if mapping.relevance_score > candidate.rule_score
			|| (mapping.relevance_score == candidate.rule_score && candidate.rule_case_type.is_none())
		{
			candidate.rule_score = mapping.relevance_score;
			candidate.rule_case_type = Some(case_type.case_type_id.clone());
			candidate.keywords = hit.keywords.clone();
		}
	}

	if candidate.text_score <= 0.0 && candidate.rule_score <= 0.0 {
		return Ok(None);
	}

	// Text-only matches fall back to the section's strongest mapping.
	let case_type_id = candidate.rule_case_type.or_else(|| {
		links
			.iter()
			.max_by(|(a, a_map), (b, b_map)| {
				a_map
					.relevance_score
					.total_cmp(&b_map.relevance_score)
					.then_with(|| b.case_type_id.cmp(&a.case_type_id))
			})
			.map(|(case_type, _)| case_type.case_type_id.clone())
	});
	let jurisdiction_match = jurisdiction::names_state(&candidate.section, query.state);
	let category_match = query.category.is_some_and(|category| !category.trim().is_empty());
	let relevance_score = relevance(
		cfg,
		candidate.text_score,
		candidate.rule_score,
		jurisdiction_match,
		category_match,
	);

	Ok(Some(SectionMatch {
		section: candidate.section,
		relevance_score,
		case_type_id,
		explain: MatchExplain {
			text_score: candidate.text_score,
			rule_score: candidate.rule_score,
			jurisdiction_match,
			category_match,
			matched_keywords: candidate.keywords,
		},
	}))
}

/// Weighted blend of the text and rule scores plus exactness bonuses, normalized by the weight
/// sum so the result stays in [0, 1].
pub fn relevance(
	cfg: &Matching,
	text_score: f64,
	rule_score: f64,
	jurisdiction_match: bool,
	category_match: bool,
) -> f64 {
	let sum = cfg.weight_sum();

	if sum <= 0.0 {
		return 0.0;
	}

	let raw = cfg.text_weight * text_score
		+ cfg.rule_weight * rule_score
		+ if jurisdiction_match { cfg.jurisdiction_bonus } else { 0.0 }
		+ if category_match { cfg.category_bonus } else { 0.0 };

	(raw / sum).clamp(0.0, 1.0)
}

fn compare_matches(a: &SectionMatch, b: &SectionMatch) -> Ordering {
	b.relevance_score
		.total_cmp(&a.relevance_score)
		.then_with(|| b.section.severity_level.cmp(&a.section.severity_level))
		.then_with(|| {
			section_number::natural_cmp(&a.section.section_number, &b.section.section_number)
		})
		.then_with(|| a.section.section_id.cmp(&b.section.section_id))
}
