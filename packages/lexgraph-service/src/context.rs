use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use lexgraph_config::Limits;
use lexgraph_domain::{
	entity::{CaseType, Evidence},
	ordinal::Necessity,
};

use crate::{Result, matcher::SectionMatch, store};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseTypeEntry {
	#[serde(flatten)]
	pub case_type: CaseType,
	/// Strongest `MAPS_TO_CASE_TYPE` relevance seen across matched sections.
	pub relevance_score: f64,
	pub supported_sections: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvidenceItem {
	#[serde(flatten)]
	pub evidence: Evidence,
	pub necessity_level: Necessity,
	pub provenance: Vec<EvidenceSource>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvidenceSource {
	pub section_id: String,
	pub how_it_proves: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelatedSection {
	pub section_id: String,
	pub section_number: String,
	pub section_title: String,
	pub relationship_type: String,
	pub explanation: String,
	/// The matched section the relation was reached from.
	pub via_section_id: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseContext {
	pub case_types: Vec<CaseTypeEntry>,
	pub evidence_checklist: Vec<EvidenceItem>,
	pub related_sections: Vec<RelatedSection>,
}
impl CaseContext {
	pub fn required_evidence(&self) -> usize {
		self.evidence_checklist
			.iter()
			.filter(|item| item.necessity_level == Necessity::Required)
			.count()
	}

	pub fn contains_case_type(&self, case_type_id: &str) -> bool {
		self.case_types.iter().any(|entry| entry.case_type.case_type_id == case_type_id)
	}
}

/// Collects case types, evidence requirements and related sections around `matches`,
/// deduplicated by id with provenance kept per matched section.
pub async fn aggregate(
	store: &dyn store::GraphStore,
	limits: &Limits,
	matches: &[SectionMatch],
) -> Result<CaseContext> {
	let mut case_types: BTreeMap<String, CaseTypeEntry> = BTreeMap::new();
	let mut evidence: BTreeMap<String, EvidenceItem> = BTreeMap::new();
	let mut related = Vec::new();
	let matched_ids =
		matches.iter().map(|m| m.section.section_id.as_str()).collect::<HashSet<_>>();
	let mut related_seen = HashSet::new();

	for matched in matches {
		let section_id = matched.section.section_id.as_str();
		let (case_type_links, evidence_links, related_links) = tokio::try_join!(
			store::case_type_links(store, section_id),
			store::evidence_links(store, section_id),
			store::related_links(store, section_id),
		)?;

		for (case_type, mapping) in case_type_links {
			let entry = case_types.entry(case_type.case_type_id.clone()).or_insert_with(|| {
				CaseTypeEntry {
					case_type,
					relevance_score: mapping.relevance_score,
					supported_sections: Vec::new(),
				}
			});

			entry.relevance_score = entry.relevance_score.max(mapping.relevance_score);

			push_unique(&mut entry.supported_sections, section_id);
		}
		for (item, requirement) in evidence_links {
			let source = EvidenceSource {
				section_id: section_id.to_string(),
				how_it_proves: requirement.how_it_proves,
			};

			match evidence.get_mut(&item.evidence_id) {
				Some(existing) => {
					existing.necessity_level =
						existing.necessity_level.strongest(requirement.necessity);

					if !existing.provenance.iter().any(|p| p.section_id == section_id) {
						existing.provenance.push(source);
					}
				},
				None => {
					evidence.insert(
						item.evidence_id.clone(),
						EvidenceItem {
							evidence: item,
							necessity_level: requirement.necessity,
							provenance: vec![source],
						},
					);
				},
			}
		}
		for (section, relation) in related_links {
			if matched_ids.contains(section.section_id.as_str())
				|| related.len() >= limits.max_related_sections as usize
				|| !related_seen.insert(section.section_id.clone())
			{
				continue;
			}

			related.push(RelatedSection {
				section_id: section.section_id,
				section_number: section.section_number,
				section_title: section.section_title,
				relationship_type: relation.relationship_type,
				explanation: relation.explanation,
				via_section_id: section_id.to_string(),
			});
		}
	}

	let mut case_types = case_types.into_values().collect::<Vec<_>>();

	case_types.sort_by(|a, b| {
		b.relevance_score
			.total_cmp(&a.relevance_score)
			.then_with(|| a.case_type.case_type_id.cmp(&b.case_type.case_type_id))
	});

	let mut evidence_checklist = evidence.into_values().collect::<Vec<_>>();

	evidence_checklist.sort_by(|a, b| {
		a.necessity_level
			.cmp(&b.necessity_level)
			.then_with(|| b.evidence.legal_weight.cmp(&a.evidence.legal_weight))
			.then_with(|| a.evidence.evidence_id.cmp(&b.evidence.evidence_id))
	});

	Ok(CaseContext { case_types, evidence_checklist, related_sections: related })
}

fn push_unique(list: &mut Vec<String>, value: &str) {
	if !list.iter().any(|existing| existing == value) {
		list.push(value.to_string());
	}
}
