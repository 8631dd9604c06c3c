//! Reasoning trace and the confidence score derived from it.

use serde::Serialize;

use lexgraph_config::Confidence;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
	Match,
	Aggregate,
	Plan,
	Synthesize,
}
impl StepKind {
	pub const ALL: [Self; 4] = [Self::Match, Self::Aggregate, Self::Plan, Self::Synthesize];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReasoningStep {
	pub step: u32,
	#[serde(rename = "type")]
	pub kind: StepKind,
	pub description: String,
	pub result: String,
	pub output_count: usize,
	/// Relevance scores of the match step; empty for other stages.
	pub scores: Vec<f64>,
}

#[derive(Debug, Default)]
pub struct ReasoningTracer {
	steps: Vec<ReasoningStep>,
}
impl ReasoningTracer {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn record(
		&mut self,
		kind: StepKind,
		description: impl Into<String>,
		result: impl Into<String>,
		output_count: usize,
		scores: Vec<f64>,
	) {
		let step = self.steps.len() as u32 + 1;

		self.steps.push(ReasoningStep {
			step,
			kind,
			description: description.into(),
			result: result.into(),
			output_count,
			scores,
		});
	}

	pub fn finish(self) -> Vec<ReasoningStep> {
		self.steps
	}
}

/// Confidence in [0, 1], computed from the trace alone.
///
/// Zero when matching produced nothing. Otherwise a weighted blend of the top relevance score,
/// the share of stages that produced output and how clearly the top match stands out from the
/// rest, rounded to four decimal places.
pub fn confidence_score(steps: &[ReasoningStep], cfg: &Confidence) -> f64 {
	let Some(match_step) = steps.iter().find(|step| step.kind == StepKind::Match) else {
		return 0.0;
	};

	if match_step.output_count == 0 || match_step.scores.is_empty() {
		return 0.0;
	}

	let sum = cfg.weight_sum();

	if sum <= 0.0 {
		return 0.0;
	}

	let top = match_step.scores.iter().copied().fold(0.0_f64, f64::max).clamp(0.0, 1.0);
	let productive = StepKind::ALL
		.iter()
		.filter(|kind| steps.iter().any(|step| step.kind == **kind && step.output_count > 0))
		.count();
	let coverage = productive as f64 / StepKind::ALL.len() as f64;
	let tied = match_step.scores.iter().filter(|score| top - **score <= cfg.tie_margin).count();
	let clarity = 1.0 / tied.max(1) as f64;
	let raw = (cfg.top_score_weight * top
		+ cfg.coverage_weight * coverage
		+ cfg.clarity_weight * clarity)
		/ sum;

	round4(raw.clamp(0.0, 1.0))
}

fn round4(value: f64) -> f64 {
	(value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
	use super::*;

	fn trace(match_scores: Vec<f64>, counts: [usize; 3]) -> Vec<ReasoningStep> {
		let mut tracer = ReasoningTracer::new();

		tracer.record(StepKind::Match, "match", "", match_scores.len(), match_scores);
		tracer.record(StepKind::Aggregate, "aggregate", "", counts[0], Vec::new());
		tracer.record(StepKind::Plan, "plan", "", counts[1], Vec::new());
		tracer.record(StepKind::Synthesize, "synthesize", "", counts[2], Vec::new());

		tracer.finish()
	}

	#[test]
	fn steps_are_numbered_from_one() {
		let steps = trace(vec![0.5], [1, 1, 1]);

		assert_eq!(steps.iter().map(|s| s.step).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
	}

	#[test]
	fn empty_match_means_zero_confidence() {
		assert_eq!(confidence_score(&trace(Vec::new(), [0, 0, 0]), &Confidence::default()), 0.0);
	}

	#[test]
	fn full_clear_match_scores_highest() {
		let cfg = Confidence::default();
		let clear = confidence_score(&trace(vec![0.9, 0.4], [2, 3, 1]), &cfg);
		let tied = confidence_score(&trace(vec![0.9, 0.88], [2, 3, 1]), &cfg);
		let sparse = confidence_score(&trace(vec![0.9, 0.4], [2, 0, 0]), &cfg);

		// 0.5 * 0.9 + 0.3 * 1.0 + 0.2 * 1.0
		assert_eq!(clear, 0.95);
		assert!(tied < clear);
		assert!(sparse < clear);
	}

	#[test]
	fn confidence_stays_in_unit_interval() {
		let cfg = Confidence { top_score_weight: 3.0, ..Confidence::default() };
		let score = confidence_score(&trace(vec![1.0], [1, 1, 1]), &cfg);

		assert!((0.0..=1.0).contains(&score));
	}
}
