//! Raw rows as stored. Columns are nullable because ingestion tolerates gaps; callers decide
//! which gaps are fatal.

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SectionRow {
	pub section_id: String,
	pub section_number: String,
	pub act_name: Option<String>,
	pub section_title: Option<String>,
	pub layman_explanation: Option<String>,
	pub category: Option<String>,
	pub severity_level: Option<String>,
	pub punishment_summary: Option<String>,
	pub max_punishment_years: Option<i32>,
	pub cognizable: Option<bool>,
	pub bailable: Option<bool>,
	pub applicable_states: Vec<String>,
	pub embedding_text: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ScoredSectionRow {
	#[sqlx(flatten)]
	pub section: SectionRow,
	pub score: f64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RelatedSectionRow {
	#[sqlx(flatten)]
	pub section: SectionRow,
	pub relationship_type: String,
	pub explanation: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ActionLinkRow {
	pub action_id: String,
	pub action_name: Option<String>,
	pub action_type: Option<String>,
	pub authority_involved: Option<String>,
	pub prerequisites: Option<String>,
	pub cost_estimate_min: Option<i64>,
	pub cost_estimate_max: Option<i64>,
	pub online_possible: Option<bool>,
	pub risk_level: Option<String>,
	pub procedure_steps: Vec<String>,
	pub action_sequence: Option<String>,
	pub conditions_required: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EvidenceLinkRow {
	pub evidence_id: String,
	pub evidence_name: Option<String>,
	pub evidence_type: Option<String>,
	pub description: Option<String>,
	pub legal_weight: Option<String>,
	pub evidence_source: Option<String>,
	pub storage_requirements: Option<String>,
	pub tamper_risk: Option<String>,
	pub necessity_level: Option<String>,
	pub how_it_proves: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CaseTypeLinkRow {
	pub case_type_id: String,
	pub case_category: Option<String>,
	pub scenario_description: Option<String>,
	pub typical_duration_months: Option<i32>,
	pub recommended_first_action: Option<String>,
	pub common_mistakes: Vec<String>,
	pub relevance_score: Option<f64>,
	pub conditions: Option<String>,
	pub exceptions: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OutcomeLinkRow {
	pub outcome_id: String,
	pub outcome_description: Option<String>,
	pub outcome_type: Option<String>,
	pub typical_timeline_months: Option<i32>,
	pub appeal_possible: Option<bool>,
	pub precedent_cases: Vec<String>,
	pub probability_percentage: Option<f64>,
	pub influencing_factors: Option<String>,
}

/// Section lookup criteria. `None` fields do not constrain the result.
#[derive(Debug, Clone, Default)]
pub struct SectionQuery<'a> {
	pub section_ids: Option<&'a [String]>,
	pub case_type_ids: Option<&'a [String]>,
	pub state: Option<&'a str>,
	pub category: Option<&'a str>,
	pub limit: Option<i64>,
}
