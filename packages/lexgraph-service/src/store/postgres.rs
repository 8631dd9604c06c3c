use std::sync::Arc;

use lexgraph_domain::{
	entity::{
		ActionLink, CaseType, CaseTypeMapping, Evidence, EvidenceRequirement, LegalAction,
		LegalSection, Outcome, OutcomeLink, SectionRelation, Validate,
	},
	ordinal::{self, LabelOrNumber, Level, Necessity, Severity},
};
use lexgraph_storage::{
	db::Db,
	graph,
	models::{
		ActionLinkRow, CaseTypeLinkRow, EvidenceLinkRow, OutcomeLinkRow, SectionQuery, SectionRow,
	},
};

use crate::{
	BoxFuture, Error, Result,
	store::{GraphStore, Neighbor, Relationship, SectionFilter, TextHit},
};

/// [`GraphStore`] over the Postgres tables created by `sql/init.sql`.
pub struct PgGraphStore {
	db: Arc<Db>,
}
impl PgGraphStore {
	pub fn new(db: Arc<Db>) -> Self {
		Self { db }
	}

	async fn load_section(&self, section_id: &str) -> Result<LegalSection> {
		let row = graph::get_section(&self.db.pool, section_id).await?;

		section_from_row(row)
	}

	async fn load_sections(&self, filter: &SectionFilter) -> Result<Vec<LegalSection>> {
		let rows = graph::find_sections(&self.db.pool, &section_query(filter)).await?;

		rows.into_iter().map(section_from_row).collect()
	}

	async fn load_neighbors(&self, id: &str, relationship: Relationship) -> Result<Vec<Neighbor>> {
		let pool = &self.db.pool;

		match relationship {
			Relationship::RelatedTo => graph::related_sections(pool, id)
				.await?
				.into_iter()
				.map(|row| -> Result<Neighbor> {
					let relation = SectionRelation {
						relationship_type: row.relationship_type,
						explanation: row.explanation.unwrap_or_default(),
					};

					relation.validate()?;

					Ok(Neighbor::Section { section: section_from_row(row.section)?, relation })
				})
				.collect(),
			Relationship::HasAction => graph::section_actions(pool, id)
				.await?
				.into_iter()
				.map(action_from_row)
				.collect(),
			Relationship::RequiresEvidence => graph::section_evidence(pool, id)
				.await?
				.into_iter()
				.map(evidence_from_row)
				.collect(),
			Relationship::MapsToCaseType => graph::section_case_types(pool, id)
				.await?
				.into_iter()
				.map(case_type_from_row)
				.collect(),
			Relationship::LeadsToOutcome => graph::action_outcomes(pool, id)
				.await?
				.into_iter()
				.map(outcome_from_row)
				.collect(),
		}
	}

	async fn text_hits(&self, terms: &[String], filter: &SectionFilter) -> Result<Vec<TextHit>> {
		let rows = graph::search_sections(&self.db.pool, terms, &section_query(filter)).await?;

		rows.into_iter()
			.map(|row| -> Result<TextHit> {
				Ok(TextHit { section: section_from_row(row.section)?, score: row.score.clamp(0.0, 1.0) })
			})
			.collect()
	}
}
impl GraphStore for PgGraphStore {
	fn get_section<'a>(&'a self, section_id: &'a str) -> BoxFuture<'a, Result<LegalSection>> {
		Box::pin(self.load_section(section_id))
	}

	fn find_sections<'a>(
		&'a self,
		filter: &'a SectionFilter,
	) -> BoxFuture<'a, Result<Vec<LegalSection>>> {
		Box::pin(self.load_sections(filter))
	}

	fn neighbors<'a>(
		&'a self,
		id: &'a str,
		relationship: Relationship,
	) -> BoxFuture<'a, Result<Vec<Neighbor>>> {
		Box::pin(self.load_neighbors(id, relationship))
	}

	fn search_by_text<'a>(
		&'a self,
		terms: &'a [String],
		filter: &'a SectionFilter,
	) -> BoxFuture<'a, Result<Vec<TextHit>>> {
		Box::pin(self.text_hits(terms, filter))
	}

	fn ping(&self) -> BoxFuture<'_, Result<()>> {
		Box::pin(async move { Ok(self.db.ping().await?) })
	}
}

fn section_query(filter: &SectionFilter) -> SectionQuery<'_> {
	SectionQuery {
		section_ids: filter.section_ids.as_deref(),
		case_type_ids: filter.case_type_ids.as_deref(),
		state: filter.state.as_deref(),
		category: filter.category.as_deref().map(str::trim).filter(|c| !c.is_empty()),
		limit: filter.limit.map(|limit| i64::try_from(limit).unwrap_or(i64::MAX)),
	}
}

fn section_from_row(row: SectionRow) -> Result<LegalSection> {
	let context = format!("section {}", row.section_id);
	let severity = Severity::parse(&required(&context, "severity_level", row.severity_level)?)?;
	let years = required(&context, "max_punishment_years", row.max_punishment_years)?;
	let section = LegalSection {
		section_title: required(&context, "section_title", row.section_title)?,
		act_name: row.act_name.unwrap_or_default(),
		category: required(&context, "category", row.category)?,
		applicable_states: row.applicable_states,
		layman_explanation: row.layman_explanation.unwrap_or_default(),
		severity_level: severity,
		cognizable: required(&context, "cognizable", row.cognizable)?,
		bailable: required(&context, "bailable", row.bailable)?,
		punishment_summary: row.punishment_summary.unwrap_or_default(),
		max_punishment_years: non_negative(&context, "max_punishment_years", years)?,
		embedding_text: row.embedding_text.unwrap_or_default(),
		section_id: row.section_id,
		section_number: row.section_number,
	};

	section.validate()?;

	Ok(section)
}

fn action_from_row(row: ActionLinkRow) -> Result<Neighbor> {
	let context = format!("action {}", row.action_id);
	let risk = required(&context, "risk_level", row.risk_level)?;
	let cost_min = required(&context, "cost_estimate_min", row.cost_estimate_min)?;
	let cost_max = required(&context, "cost_estimate_max", row.cost_estimate_max)?;
	let sequence = match row.action_sequence {
		Some(raw) => ordinal::parse_sequence(&LabelOrNumber::Label(raw))?,
		None => ordinal::UNRANKED_SEQUENCE,
	};
	let action = LegalAction {
		action_name: required(&context, "action_name", row.action_name)?,
		action_type: row.action_type.unwrap_or_default(),
		authority_involved: required(&context, "authority_involved", row.authority_involved)?,
		cost_min: non_negative(&context, "cost_estimate_min", cost_min)?,
		cost_max: non_negative(&context, "cost_estimate_max", cost_max)?,
		online_possible: row.online_possible.unwrap_or(false),
		risk_level: Level::parse("risk_level", &risk)?,
		procedure_steps: row.procedure_steps,
		prerequisites: row.prerequisites.filter(|p| !p.trim().is_empty()),
		action_id: row.action_id,
	};
	let link = ActionLink { sequence, conditions: row.conditions_required.unwrap_or_default() };

	action.validate()?;

	Ok(Neighbor::Action { action, link })
}

fn evidence_from_row(row: EvidenceLinkRow) -> Result<Neighbor> {
	let context = format!("evidence {}", row.evidence_id);
	let weight = required(&context, "legal_weight", row.legal_weight)?;
	let tamper = required(&context, "tamper_risk", row.tamper_risk)?;
	let necessity = required(&context, "necessity_level", row.necessity_level)?;
	let evidence = Evidence {
		evidence_name: required(&context, "evidence_name", row.evidence_name)?,
		evidence_type: row.evidence_type.unwrap_or_default(),
		description: row.description.unwrap_or_default(),
		legal_weight: Level::parse("legal_weight", &weight)?,
		evidence_source: row.evidence_source.unwrap_or_default(),
		storage_requirements: row.storage_requirements.unwrap_or_default(),
		tamper_risk: Level::parse("tamper_risk", &tamper)?,
		evidence_id: row.evidence_id,
	};
	let requirement = EvidenceRequirement {
		necessity: Necessity::parse(&necessity)?,
		how_it_proves: row.how_it_proves.unwrap_or_default(),
	};

	evidence.validate()?;

	Ok(Neighbor::Evidence { evidence, requirement })
}

fn case_type_from_row(row: CaseTypeLinkRow) -> Result<Neighbor> {
	let context = format!("case type {}", row.case_type_id);
	let months = required(&context, "typical_duration_months", row.typical_duration_months)?;
	let case_type = CaseType {
		case_category: row.case_category.unwrap_or_default(),
		description: required(&context, "scenario_description", row.scenario_description)?,
		duration_months: non_negative(&context, "typical_duration_months", months)?,
		common_mistakes: row.common_mistakes,
		recommended_first_action: row.recommended_first_action.filter(|a| !a.trim().is_empty()),
		case_type_id: row.case_type_id,
	};
	let mapping = CaseTypeMapping {
		relevance_score: required(&context, "relevance_score", row.relevance_score)?,
		conditions: row.conditions.unwrap_or_default(),
		exceptions: row.exceptions.unwrap_or_default(),
	};

	case_type.validate()?;
	mapping.validate()?;

	Ok(Neighbor::CaseType { case_type, mapping })
}

fn outcome_from_row(row: OutcomeLinkRow) -> Result<Neighbor> {
	let context = format!("outcome {}", row.outcome_id);
	let months = required(&context, "typical_timeline_months", row.typical_timeline_months)?;
	let outcome = Outcome {
		outcome_description: required(&context, "outcome_description", row.outcome_description)?,
		outcome_type: row.outcome_type.unwrap_or_default(),
		timeline_months: non_negative(&context, "typical_timeline_months", months)?,
		appeal_possible: row.appeal_possible.unwrap_or(false),
		precedent_cases: row.precedent_cases,
		outcome_id: row.outcome_id,
	};
	let link = OutcomeLink {
		probability_pct: required(&context, "probability_percentage", row.probability_percentage)?,
		influencing_factors: row.influencing_factors.unwrap_or_default(),
	};

	outcome.validate()?;
	link.validate()?;

	Ok(Neighbor::Outcome { outcome, link })
}

fn required<T>(context: &str, field: &str, value: Option<T>) -> Result<T> {
	value.ok_or_else(|| Error::inconsistency(format!("{context} has no {field}")))
}

fn non_negative<I, O>(context: &str, field: &str, value: I) -> Result<O>
where
	I: Copy + std::fmt::Display,
	O: TryFrom<I>,
{
	O::try_from(value)
		.map_err(|_| Error::inconsistency(format!("{context} has negative {field}: {value}")))
}
