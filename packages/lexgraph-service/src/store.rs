//! Typed façade over the legal property graph.
//!
//! The engine only reads through [`GraphStore`]. Implementations convert whatever shape the
//! backing database hands back into the fixed entity types, failing with
//! [`Error::InternalInconsistency`] rather than passing incomplete records along.

mod guarded;
mod memory;
mod postgres;

pub use guarded::GuardedStore;
pub use memory::{GraphSnapshot, MemoryGraph};
pub use postgres::PgGraphStore;

use std::fmt;

use lexgraph_domain::{
	entity::{
		ActionLink, CaseType, CaseTypeMapping, Evidence, EvidenceRequirement, LegalAction,
		LegalSection, Outcome, OutcomeLink, SectionRelation,
	},
	jurisdiction,
};

use crate::{BoxFuture, Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relationship {
	/// LegalSection to LegalSection.
	RelatedTo,
	/// LegalSection to LegalAction.
	HasAction,
	/// LegalSection to Evidence.
	RequiresEvidence,
	/// LegalSection to CaseType.
	MapsToCaseType,
	/// LegalAction to Outcome.
	LeadsToOutcome,
}
impl Relationship {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::RelatedTo => "RELATED_TO",
			Self::HasAction => "HAS_ACTION",
			Self::RequiresEvidence => "REQUIRES_EVIDENCE",
			Self::MapsToCaseType => "MAPS_TO_CASE_TYPE",
			Self::LeadsToOutcome => "LEADS_TO_OUTCOME",
		}
	}
}
impl fmt::Display for Relationship {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Target node of an outgoing edge together with the edge's attributes.
#[derive(Debug, Clone, PartialEq)]
pub enum Neighbor {
	Section { section: LegalSection, relation: SectionRelation },
	Action { action: LegalAction, link: ActionLink },
	Evidence { evidence: Evidence, requirement: EvidenceRequirement },
	CaseType { case_type: CaseType, mapping: CaseTypeMapping },
	Outcome { outcome: Outcome, link: OutcomeLink },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextHit {
	pub section: LegalSection,
	/// Normalized into [0, 1].
	pub score: f64,
}

/// Section selection criteria; `None` leaves a dimension unconstrained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionFilter {
	pub section_ids: Option<Vec<String>>,
	/// Keep sections mapped to at least one of these case types, strongest mapping first.
	pub case_type_ids: Option<Vec<String>>,
	pub state: Option<String>,
	pub category: Option<String>,
	pub limit: Option<usize>,
}
impl SectionFilter {
	/// Checks the attribute constraints that can be judged from the section alone.
	pub fn admits(&self, section: &LegalSection) -> bool {
		if let Some(ids) = &self.section_ids
			&& !ids.contains(&section.section_id)
		{
			return false;
		}
		if let Some(state) = &self.state
			&& !jurisdiction::applies_in(section, state)
		{
			return false;
		}

		jurisdiction::category_matches(section, self.category.as_deref())
	}
}

pub trait GraphStore
where
	Self: Send + Sync,
{
	/// Fails with [`Error::NotFound`] when no section has this id.
	fn get_section<'a>(&'a self, section_id: &'a str) -> BoxFuture<'a, Result<LegalSection>>;

	fn find_sections<'a>(
		&'a self,
		filter: &'a SectionFilter,
	) -> BoxFuture<'a, Result<Vec<LegalSection>>>;

	/// Outgoing edges of `relationship` from node `id`, ordered by target id. Fails with
	/// [`Error::NotFound`] when the source node does not exist.
	fn neighbors<'a>(
		&'a self,
		id: &'a str,
		relationship: Relationship,
	) -> BoxFuture<'a, Result<Vec<Neighbor>>>;

	/// Sections matching any of `terms` and admitted by `filter`, best first. The filter is
	/// applied before `filter.limit` cuts the ranking.
	fn search_by_text<'a>(
		&'a self,
		terms: &'a [String],
		filter: &'a SectionFilter,
	) -> BoxFuture<'a, Result<Vec<TextHit>>>;

	/// Cheapest possible round trip, used for health reporting.
	fn ping(&self) -> BoxFuture<'_, Result<()>>;
}

pub(crate) async fn case_type_links(
	store: &dyn GraphStore,
	section_id: &str,
) -> Result<Vec<(CaseType, CaseTypeMapping)>> {
	let neighbors = store.neighbors(section_id, Relationship::MapsToCaseType).await?;

	neighbors
		.into_iter()
		.map(|neighbor| match neighbor {
			Neighbor::CaseType { case_type, mapping } => Ok((case_type, mapping)),
			other => Err(unexpected(Relationship::MapsToCaseType, section_id, &other)),
		})
		.collect()
}

pub(crate) async fn action_links(
	store: &dyn GraphStore,
	section_id: &str,
) -> Result<Vec<(LegalAction, ActionLink)>> {
	let neighbors = store.neighbors(section_id, Relationship::HasAction).await?;

	neighbors
		.into_iter()
		.map(|neighbor| match neighbor {
			Neighbor::Action { action, link } => Ok((action, link)),
			other => Err(unexpected(Relationship::HasAction, section_id, &other)),
		})
		.collect()
}

pub(crate) async fn evidence_links(
	store: &dyn GraphStore,
	section_id: &str,
) -> Result<Vec<(Evidence, EvidenceRequirement)>> {
	let neighbors = store.neighbors(section_id, Relationship::RequiresEvidence).await?;

	neighbors
		.into_iter()
		.map(|neighbor| match neighbor {
			Neighbor::Evidence { evidence, requirement } => Ok((evidence, requirement)),
			other => Err(unexpected(Relationship::RequiresEvidence, section_id, &other)),
		})
		.collect()
}

pub(crate) async fn related_links(
	store: &dyn GraphStore,
	section_id: &str,
) -> Result<Vec<(LegalSection, SectionRelation)>> {
	let neighbors = store.neighbors(section_id, Relationship::RelatedTo).await?;

	neighbors
		.into_iter()
		.map(|neighbor| match neighbor {
			Neighbor::Section { section, relation } => Ok((section, relation)),
			other => Err(unexpected(Relationship::RelatedTo, section_id, &other)),
		})
		.collect()
}

pub(crate) async fn outcome_links(
	store: &dyn GraphStore,
	action_id: &str,
) -> Result<Vec<(Outcome, OutcomeLink)>> {
	let neighbors = store.neighbors(action_id, Relationship::LeadsToOutcome).await?;

	neighbors
		.into_iter()
		.map(|neighbor| match neighbor {
			Neighbor::Outcome { outcome, link } => Ok((outcome, link)),
			other => Err(unexpected(Relationship::LeadsToOutcome, action_id, &other)),
		})
		.collect()
}

fn unexpected(relationship: Relationship, id: &str, neighbor: &Neighbor) -> Error {
	let kind = match neighbor {
		Neighbor::Section { .. } => "LegalSection",
		Neighbor::Action { .. } => "LegalAction",
		Neighbor::Evidence { .. } => "Evidence",
		Neighbor::CaseType { .. } => "CaseType",
		Neighbor::Outcome { .. } => "Outcome",
	};

	Error::inconsistency(format!("{relationship} edge from {id} reached a {kind} node"))
}
