use serde::{Deserialize, Serialize};
use tracing::Instrument;

use lexgraph_domain::jurisdiction;

use crate::{
	Error, LexgraphService, Result,
	context::{self, CaseContext, CaseTypeEntry, EvidenceItem, RelatedSection},
	matcher::{self, MatchQuery, SectionMatch},
	outcomes::{self, OutcomeEstimate},
	planner::{self, PlannedAction},
	trace::{self, ReasoningStep, ReasoningTracer, StepKind},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
	pub case_description: String,
	#[serde(default)]
	pub state: Option<String>,
	#[serde(default)]
	pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
	pub case_description: String,
	pub state: String,
	pub category: Option<String>,
	pub matched_sections: Vec<SectionMatch>,
	pub case_types: Vec<CaseTypeEntry>,
	pub action_plan: Vec<PlannedAction>,
	pub evidence_checklist: Vec<EvidenceItem>,
	pub outcome_probabilities: Vec<OutcomeEstimate>,
	pub related_sections: Vec<RelatedSection>,
	pub reasoning_trace: Vec<ReasoningStep>,
	pub confidence_score: f64,
}

impl LexgraphService {
	/// Runs the full pipeline for one case description. Any stage failure fails the whole
	/// analysis; no partial result is returned.
	pub async fn analyze(&self, req: AnalyzeRequest) -> Result<AnalysisResult> {
		let state = jurisdiction::requested_state(req.state.as_deref()).to_string();
		let category = req
			.category
			.as_deref()
			.map(str::trim)
			.filter(|category| !category.is_empty())
			.map(str::to_string);
		let span = tracing::info_span!(
			"analyze",
			state = %state,
			category = category.as_deref().unwrap_or("")
		);

		self.run_analysis(req.case_description, state, category).instrument(span).await
	}

	async fn run_analysis(
		&self,
		case_description: String,
		state: String,
		category: Option<String>,
	) -> Result<AnalysisResult> {
		let store = self.store.as_ref();
		let query = MatchQuery {
			description: &case_description,
			state: &state,
			category: category.as_deref(),
		};
		let matches = matcher::match_sections(store, &self.cfg.matching, query).await?;

		tracing::debug!(matches = matches.len(), "Matched sections.");

		let max_outcomes = self.cfg.limits.max_outcomes as usize;
		let (context, (plan, outcomes)) = if matches.is_empty() {
			(CaseContext::default(), (Vec::new(), Vec::new()))
		} else {
			tokio::try_join!(context::aggregate(store, &self.cfg.limits, &matches), async {
				let plan = planner::plan_actions(store, &matches).await?;
				let outcomes = outcomes::synthesize(store, &plan, max_outcomes).await?;

				Ok::<_, Error>((plan, outcomes))
			})?
		};

		check_case_types(&matches, &context)?;

		tracing::debug!(
			case_types = context.case_types.len(),
			evidence = context.evidence_checklist.len(),
			actions = plan.len(),
			outcomes = outcomes.len(),
			"Aggregated analysis context."
		);

		let reasoning_trace = record_trace(&matches, &context, &plan, &outcomes);
		let confidence_score = trace::confidence_score(&reasoning_trace, &self.cfg.confidence);
		let CaseContext { case_types, evidence_checklist, related_sections } = context;

		Ok(AnalysisResult {
			case_description,
			state,
			category,
			matched_sections: matches,
			case_types,
			action_plan: plan,
			evidence_checklist,
			outcome_probabilities: outcomes,
			related_sections,
			reasoning_trace,
			confidence_score,
		})
	}
}

/// Every non-null `case_type_id` on a match must resolve to an aggregated case type.
fn check_case_types(matches: &[SectionMatch], context: &CaseContext) -> Result<()> {
	for matched in matches {
		if let Some(case_type_id) = &matched.case_type_id
			&& !context.contains_case_type(case_type_id)
		{
			tracing::error!(
				section_id = %matched.section.section_id,
				case_type_id = %case_type_id,
				"Matched section references a case type missing from the analysis."
			);

			return Err(Error::inconsistency(format!(
				"section {} references case type {case_type_id} which was not aggregated",
				matched.section.section_id
			)));
		}
	}

	Ok(())
}

fn record_trace(
	matches: &[SectionMatch],
	context: &CaseContext,
	plan: &[PlannedAction],
	outcomes: &[OutcomeEstimate],
) -> Vec<ReasoningStep> {
	let mut tracer = ReasoningTracer::new();

	tracer.record(
		StepKind::Match,
		"Matched legal sections against the case description using text relevance and keyword rules.",
		format!("Found {} relevant sections", matches.len()),
		matches.len(),
		matches.iter().map(|m| m.relevance_score).collect(),
	);
	tracer.record(
		StepKind::Aggregate,
		"Collected case types, evidence requirements and related sections for the matched sections.",
		format!(
			"Found {} case types and {} evidence items ({} must-have)",
			context.case_types.len(),
			context.evidence_checklist.len(),
			context.required_evidence()
		),
		context.case_types.len() + context.evidence_checklist.len(),
		Vec::new(),
	);
	tracer.record(
		StepKind::Plan,
		"Merged and ordered the actions available under the matched sections.",
		format!("Planned {} actions", plan.len()),
		plan.len(),
		Vec::new(),
	);
	tracer.record(
		StepKind::Synthesize,
		"Combined outcome probabilities across the planned actions.",
		format!("Estimated {} possible outcomes", outcomes.len()),
		outcomes.len(),
		Vec::new(),
	);

	tracer.finish()
}
