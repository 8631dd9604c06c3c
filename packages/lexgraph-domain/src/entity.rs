//! Reference entities of the legal graph and the attributes carried by its edges.
//!
//! Entities are immutable once ingested. Every constructor path from store data goes
//! through [`Validate`], so the invariants below hold for any value handed to the engine.

use serde::{Deserialize, Serialize};

use crate::{
	Error, Result,
	ordinal::{self, Level, Necessity, Severity},
};

pub trait Validate {
	fn validate(&self) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegalSection {
	pub section_id: String,
	pub section_number: String,
	pub section_title: String,
	#[serde(default)]
	pub act_name: String,
	pub category: String,
	/// Empty means the section applies across India.
	#[serde(default)]
	pub applicable_states: Vec<String>,
	pub layman_explanation: String,
	pub severity_level: Severity,
	pub cognizable: bool,
	pub bailable: bool,
	pub punishment_summary: String,
	pub max_punishment_years: u32,
	#[serde(default, skip_serializing)]
	pub embedding_text: String,
}
impl Validate for LegalSection {
	fn validate(&self) -> Result<()> {
		require("section_id", &self.section_id)?;
		require("section_number", &self.section_number)
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseType {
	pub case_type_id: String,
	#[serde(default)]
	pub case_category: String,
	pub description: String,
	pub duration_months: u32,
	#[serde(default)]
	pub common_mistakes: Vec<String>,
	#[serde(default)]
	pub recommended_first_action: Option<String>,
}
impl Validate for CaseType {
	fn validate(&self) -> Result<()> {
		require("case_type_id", &self.case_type_id)
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegalAction {
	pub action_id: String,
	pub action_name: String,
	pub action_type: String,
	pub authority_involved: String,
	pub cost_min: u64,
	pub cost_max: u64,
	pub online_possible: bool,
	pub risk_level: Level,
	#[serde(default)]
	pub procedure_steps: Vec<String>,
	#[serde(default)]
	pub prerequisites: Option<String>,
}
impl Validate for LegalAction {
	fn validate(&self) -> Result<()> {
		require("action_id", &self.action_id)?;

		if self.cost_min > self.cost_max {
			return Err(Error::OutOfRange {
				field: "cost_min",
				value: format!("{} exceeds cost_max {}", self.cost_min, self.cost_max),
			});
		}

		Ok(())
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
	pub evidence_id: String,
	pub evidence_name: String,
	pub evidence_type: String,
	pub description: String,
	pub legal_weight: Level,
	pub evidence_source: String,
	pub storage_requirements: String,
	pub tamper_risk: Level,
}
impl Validate for Evidence {
	fn validate(&self) -> Result<()> {
		require("evidence_id", &self.evidence_id)
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
	pub outcome_id: String,
	pub outcome_description: String,
	pub outcome_type: String,
	pub timeline_months: u32,
	pub appeal_possible: bool,
	#[serde(default)]
	pub precedent_cases: Vec<String>,
}
impl Validate for Outcome {
	fn validate(&self) -> Result<()> {
		require("outcome_id", &self.outcome_id)
	}
}

/// `MAPS_TO_CASE_TYPE` attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseTypeMapping {
	pub relevance_score: f64,
	#[serde(default)]
	pub conditions: String,
	#[serde(default)]
	pub exceptions: String,
}
impl Validate for CaseTypeMapping {
	fn validate(&self) -> Result<()> {
		unit_interval("relevance_score", self.relevance_score)
	}
}

/// `HAS_ACTION` attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionLink {
	#[serde(deserialize_with = "ordinal::deserialize_sequence")]
	pub sequence: u32,
	#[serde(default)]
	pub conditions: String,
}
impl Validate for ActionLink {
	fn validate(&self) -> Result<()> {
		Ok(())
	}
}

/// `REQUIRES_EVIDENCE` attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceRequirement {
	pub necessity: Necessity,
	#[serde(default)]
	pub how_it_proves: String,
}
impl Validate for EvidenceRequirement {
	fn validate(&self) -> Result<()> {
		Ok(())
	}
}

/// `LEADS_TO_OUTCOME` attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeLink {
	pub probability_pct: f64,
	#[serde(default)]
	pub influencing_factors: String,
}
impl OutcomeLink {
	pub fn probability(&self) -> f64 {
		self.probability_pct / 100.0
	}
}
impl Validate for OutcomeLink {
	fn validate(&self) -> Result<()> {
		if !self.probability_pct.is_finite() || !(0.0..=100.0).contains(&self.probability_pct) {
			return Err(Error::OutOfRange {
				field: "probability_pct",
				value: self.probability_pct.to_string(),
			});
		}

		Ok(())
	}
}

/// `RELATED_TO` attributes between two sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionRelation {
	pub relationship_type: String,
	#[serde(default)]
	pub explanation: String,
}
impl Validate for SectionRelation {
	fn validate(&self) -> Result<()> {
		require("relationship_type", &self.relationship_type)
	}
}

pub fn unit_interval(field: &'static str, value: f64) -> Result<()> {
	if !value.is_finite() || !(0.0..=1.0).contains(&value) {
		return Err(Error::OutOfRange { field, value: value.to_string() });
	}

	Ok(())
}

fn require(field: &'static str, value: &str) -> Result<()> {
	if value.trim().is_empty() {
		return Err(Error::Missing { field });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn action_with_inverted_cost_range_is_invalid() {
		let action: LegalAction = serde_json::from_value(json!({
			"action_id": "A1",
			"action_name": "File FIR",
			"action_type": "Criminal",
			"authority_involved": "Police",
			"cost_min": 500,
			"cost_max": 100,
			"online_possible": true,
			"risk_level": "Low",
		}))
		.expect("Action payload must decode.");

		assert!(action.validate().is_err());
	}

	#[test]
	fn action_link_accepts_sequence_labels() {
		let link: ActionLink =
			serde_json::from_value(json!({ "sequence": "Secondary", "conditions": "" }))
				.expect("Link payload must decode.");

		assert_eq!(link.sequence, 2);
	}

	#[test]
	fn section_decoding_rejects_unknown_severity() {
		let result = serde_json::from_value::<LegalSection>(json!({
			"section_id": "IPC_420",
			"section_number": "420",
			"section_title": "Cheating",
			"category": "Criminal",
			"layman_explanation": "",
			"severity_level": "apocalyptic",
			"cognizable": true,
			"bailable": false,
			"punishment_summary": "",
			"max_punishment_years": 7,
		}));

		assert!(result.is_err());
	}

	#[test]
	fn outcome_probability_is_bounded() {
		let link = OutcomeLink { probability_pct: 120.0, influencing_factors: String::new() };

		assert!(link.validate().is_err());
		assert_eq!(OutcomeLink { probability_pct: 40.0, ..link }.probability(), 0.4);
	}
}
