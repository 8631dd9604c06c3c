//! In-process graph used by tests and local runs without a database.

use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;

use lexgraph_domain::{
	entity::{
		ActionLink, CaseType, CaseTypeMapping, Evidence, EvidenceRequirement, LegalAction,
		LegalSection, Outcome, OutcomeLink, SectionRelation, Validate,
	},
	text,
};

use crate::{
	BoxFuture, Error, Result,
	store::{GraphStore, Neighbor, Relationship, SectionFilter, TextHit},
};

/// Serialized form of a whole graph: node lists followed by edge lists.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GraphSnapshot {
	pub sections: Vec<LegalSection>,
	pub case_types: Vec<CaseType>,
	pub actions: Vec<LegalAction>,
	pub evidence: Vec<Evidence>,
	pub outcomes: Vec<Outcome>,
	pub related_to: Vec<RelatedToEdge>,
	pub has_action: Vec<HasActionEdge>,
	pub requires_evidence: Vec<RequiresEvidenceEdge>,
	pub maps_to_case_type: Vec<MapsToCaseTypeEdge>,
	pub leads_to_outcome: Vec<LeadsToOutcomeEdge>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelatedToEdge {
	pub from: String,
	pub to: String,
	#[serde(flatten)]
	pub relation: SectionRelation,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HasActionEdge {
	pub section_id: String,
	pub action_id: String,
	#[serde(flatten)]
	pub link: ActionLink,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequiresEvidenceEdge {
	pub section_id: String,
	pub evidence_id: String,
	#[serde(flatten)]
	pub requirement: EvidenceRequirement,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MapsToCaseTypeEdge {
	pub section_id: String,
	pub case_type_id: String,
	#[serde(flatten)]
	pub mapping: CaseTypeMapping,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeadsToOutcomeEdge {
	pub action_id: String,
	pub outcome_id: String,
	#[serde(flatten)]
	pub link: OutcomeLink,
}

#[derive(Debug, Default)]
pub struct MemoryGraph {
	sections: BTreeMap<String, LegalSection>,
	case_types: BTreeMap<String, CaseType>,
	actions: BTreeMap<String, LegalAction>,
	evidence: BTreeMap<String, Evidence>,
	outcomes: BTreeMap<String, Outcome>,
	related_to: BTreeMap<String, Vec<(String, SectionRelation)>>,
	has_action: BTreeMap<String, Vec<(String, ActionLink)>>,
	requires_evidence: BTreeMap<String, Vec<(String, EvidenceRequirement)>>,
	maps_to_case_type: BTreeMap<String, Vec<(String, CaseTypeMapping)>>,
	leads_to_outcome: BTreeMap<String, Vec<(String, OutcomeLink)>>,
}
impl MemoryGraph {
	/// Builds the graph, rejecting invalid entities, duplicate ids and dangling edges.
	pub fn from_snapshot(snapshot: GraphSnapshot) -> Result<Self> {
		let mut graph = Self {
			sections: index("LegalSection", snapshot.sections, |s| &s.section_id)?,
			case_types: index("CaseType", snapshot.case_types, |c| &c.case_type_id)?,
			actions: index("LegalAction", snapshot.actions, |a| &a.action_id)?,
			evidence: index("Evidence", snapshot.evidence, |e| &e.evidence_id)?,
			outcomes: index("Outcome", snapshot.outcomes, |o| &o.outcome_id)?,
			..Self::default()
		};

		for edge in snapshot.related_to {
			edge.relation.validate()?;
			graph.expect_node(&graph.sections, "LegalSection", &edge.from)?;
			graph.expect_node(&graph.sections, "LegalSection", &edge.to)?;
			graph.related_to.entry(edge.from).or_default().push((edge.to, edge.relation));
		}
		for edge in snapshot.has_action {
			edge.link.validate()?;
			graph.expect_node(&graph.sections, "LegalSection", &edge.section_id)?;
			graph.expect_node(&graph.actions, "LegalAction", &edge.action_id)?;
			graph.has_action.entry(edge.section_id).or_default().push((edge.action_id, edge.link));
		}
		for edge in snapshot.requires_evidence {
			edge.requirement.validate()?;
			graph.expect_node(&graph.sections, "LegalSection", &edge.section_id)?;
			graph.expect_node(&graph.evidence, "Evidence", &edge.evidence_id)?;
			graph
				.requires_evidence
				.entry(edge.section_id)
				.or_default()
				.push((edge.evidence_id, edge.requirement));
		}
		for edge in snapshot.maps_to_case_type {
			edge.mapping.validate()?;
			graph.expect_node(&graph.sections, "LegalSection", &edge.section_id)?;
			graph.expect_node(&graph.case_types, "CaseType", &edge.case_type_id)?;
			graph
				.maps_to_case_type
				.entry(edge.section_id)
				.or_default()
				.push((edge.case_type_id, edge.mapping));
		}
		for edge in snapshot.leads_to_outcome {
			edge.link.validate()?;
			graph.expect_node(&graph.actions, "LegalAction", &edge.action_id)?;
			graph.expect_node(&graph.outcomes, "Outcome", &edge.outcome_id)?;
			graph
				.leads_to_outcome
				.entry(edge.action_id)
				.or_default()
				.push((edge.outcome_id, edge.link));
		}

		sort_targets(&mut graph.related_to);
		sort_targets(&mut graph.has_action);
		sort_targets(&mut graph.requires_evidence);
		sort_targets(&mut graph.maps_to_case_type);
		sort_targets(&mut graph.leads_to_outcome);

		Ok(graph)
	}

	/// Parses a JSON snapshot, e.g. a fixture file.
	pub fn from_json(raw: &str) -> Result<Self> {
		let snapshot = serde_json::from_str::<GraphSnapshot>(raw)
			.map_err(|err| Error::inconsistency(format!("graph snapshot is malformed: {err}")))?;

		Self::from_snapshot(snapshot)
	}

	fn expect_node<T>(&self, nodes: &BTreeMap<String, T>, kind: &str, id: &str) -> Result<()> {
		if !nodes.contains_key(id) {
			return Err(Error::inconsistency(format!("edge references unknown {kind} {id}")));
		}

		Ok(())
	}

	fn section(&self, section_id: &str) -> Result<&LegalSection> {
		self.sections.get(section_id).ok_or_else(|| Error::NotFound {
			message: format!("section not found; section_id={section_id}"),
		})
	}

	fn best_mapping(&self, section_id: &str, case_type_ids: &[String]) -> Option<f64> {
		self.maps_to_case_type
			.get(section_id)?
			.iter()
			.filter(|(case_type_id, _)| case_type_ids.contains(case_type_id))
			.map(|(_, mapping)| mapping.relevance_score)
			.reduce(f64::max)
	}

	fn collect_neighbors(&self, id: &str, relationship: Relationship) -> Result<Vec<Neighbor>> {
		if relationship == Relationship::LeadsToOutcome {
			if !self.actions.contains_key(id) {
				return Err(Error::NotFound {
					message: format!("action not found; action_id={id}"),
				});
			}
		} else {
			self.section(id)?;
		}

		let out = match relationship {
			Relationship::RelatedTo => targets(&self.related_to, id)
				.map(|(to, relation)| -> Result<Neighbor> {
					Ok(Neighbor::Section {
						section: lookup(&self.sections, to)?,
						relation: relation.clone(),
					})
				})
				.collect::<Result<Vec<_>>>()?,
			Relationship::HasAction => targets(&self.has_action, id)
				.map(|(to, link)| -> Result<Neighbor> {
					Ok(Neighbor::Action { action: lookup(&self.actions, to)?, link: link.clone() })
				})
				.collect::<Result<Vec<_>>>()?,
			Relationship::RequiresEvidence => targets(&self.requires_evidence, id)
				.map(|(to, requirement)| -> Result<Neighbor> {
					Ok(Neighbor::Evidence {
						evidence: lookup(&self.evidence, to)?,
						requirement: requirement.clone(),
					})
				})
				.collect::<Result<Vec<_>>>()?,
			Relationship::MapsToCaseType => targets(&self.maps_to_case_type, id)
				.map(|(to, mapping)| -> Result<Neighbor> {
					Ok(Neighbor::CaseType {
						case_type: lookup(&self.case_types, to)?,
						mapping: mapping.clone(),
					})
				})
				.collect::<Result<Vec<_>>>()?,
			Relationship::LeadsToOutcome => targets(&self.leads_to_outcome, id)
				.map(|(to, link)| -> Result<Neighbor> {
					Ok(Neighbor::Outcome { outcome: lookup(&self.outcomes, to)?, link: link.clone() })
				})
				.collect::<Result<Vec<_>>>()?,
		};

		Ok(out)
	}

	fn select(&self, filter: &SectionFilter) -> Vec<LegalSection> {
		let mut ranked = self
			.sections
			.values()
			.filter(|section| filter.admits(section))
			.filter_map(|section| match &filter.case_type_ids {
				Some(ids) => self.best_mapping(&section.section_id, ids).map(|score| (section, score)),
				None => Some((section, 0.0)),
			})
			.collect::<Vec<_>>();

		ranked.sort_by(|(a, a_score), (b, b_score)| {
			b_score.total_cmp(a_score).then_with(|| a.section_id.cmp(&b.section_id))
		});

		let limit = filter.limit.unwrap_or(usize::MAX);

		ranked.into_iter().take(limit).map(|(section, _)| section.clone()).collect()
	}

	fn rank_by_text(&self, terms: &[String], filter: &SectionFilter) -> Vec<TextHit> {
		let mut hits = self
			.sections
			.values()
			.filter(|section| filter.admits(section))
			.filter(|section| match &filter.case_type_ids {
				Some(ids) => self.best_mapping(&section.section_id, ids).is_some(),
				None => true,
			})
			.filter_map(|section| {
				let haystack = text::field_terms([
					section.section_title.as_str(),
					section.layman_explanation.as_str(),
					section.embedding_text.as_str(),
				]);
				let score = text::term_overlap(terms, &haystack);

				(score > 0.0).then(|| TextHit { section: section.clone(), score })
			})
			.collect::<Vec<_>>();

		hits.sort_by(|a, b| {
			b.score.total_cmp(&a.score).then_with(|| a.section.section_id.cmp(&b.section.section_id))
		});
		hits.truncate(filter.limit.unwrap_or(usize::MAX));

		hits
	}
}
impl GraphStore for MemoryGraph {
	fn get_section<'a>(&'a self, section_id: &'a str) -> BoxFuture<'a, Result<LegalSection>> {
		Box::pin(async move { self.section(section_id).cloned() })
	}

	fn find_sections<'a>(
		&'a self,
		filter: &'a SectionFilter,
	) -> BoxFuture<'a, Result<Vec<LegalSection>>> {
		Box::pin(async move { Ok(self.select(filter)) })
	}

	fn neighbors<'a>(
		&'a self,
		id: &'a str,
		relationship: Relationship,
	) -> BoxFuture<'a, Result<Vec<Neighbor>>> {
		Box::pin(async move { self.collect_neighbors(id, relationship) })
	}

	fn search_by_text<'a>(
		&'a self,
		terms: &'a [String],
		filter: &'a SectionFilter,
	) -> BoxFuture<'a, Result<Vec<TextHit>>> {
		Box::pin(async move { Ok(self.rank_by_text(terms, filter)) })
	}

	fn ping(&self) -> BoxFuture<'_, Result<()>> {
		Box::pin(async { Ok(()) })
	}
}

fn index<T, F>(kind: &str, items: Vec<T>, id_of: F) -> Result<BTreeMap<String, T>>
where
	T: Validate,
	F: Fn(&T) -> &String,
{
	let mut seen = HashSet::new();
	let mut out = BTreeMap::new();

	for item in items {
		item.validate()?;

		let id = id_of(&item).clone();

		if !seen.insert(id.clone()) {
			return Err(Error::inconsistency(format!("duplicate {kind} id {id}")));
		}

		out.insert(id, item);
	}

	Ok(out)
}

fn sort_targets<A>(adjacency: &mut BTreeMap<String, Vec<(String, A)>>) {
	for targets in adjacency.values_mut() {
		targets.sort_by(|(a, _), (b, _)| a.cmp(b));
	}
}

fn targets<'a, A>(
	adjacency: &'a BTreeMap<String, Vec<(String, A)>>,
	id: &str,
) -> impl Iterator<Item = &'a (String, A)> {
	adjacency.get(id).into_iter().flatten()
}

fn lookup<T: Clone>(nodes: &BTreeMap<String, T>, id: &str) -> Result<T> {
	nodes
		.get(id)
		.cloned()
		.ok_or_else(|| Error::inconsistency(format!("dangling edge target {id}")))
}
