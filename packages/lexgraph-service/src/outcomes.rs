use std::collections::BTreeMap;

use serde::Serialize;

use lexgraph_domain::entity::{Outcome, OutcomeLink};

use crate::{Result, planner::PlannedAction, store};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeEstimate {
	#[serde(flatten)]
	pub outcome: Outcome,
	/// Probability that at least one contributing action leads here.
	pub probability: f64,
	/// Names of the contributing actions, in plan order.
	pub influencing_factors: Vec<String>,
	pub contributing_actions: Vec<String>,
}

/// One `LEADS_TO_OUTCOME` edge reached from a planned action.
#[derive(Debug, Clone)]
pub struct OutcomePath {
	pub action_id: String,
	pub action_name: String,
	pub outcome: Outcome,
	pub link: OutcomeLink,
}

pub async fn synthesize(
	store: &dyn store::GraphStore,
	plan: &[PlannedAction],
	max_outcomes: usize,
) -> Result<Vec<OutcomeEstimate>> {
	let mut paths = Vec::new();

	for planned in plan {
		let action = &planned.action;

		for (outcome, link) in store::outcome_links(store, &action.action_id).await? {
			paths.push(OutcomePath {
				action_id: action.action_id.clone(),
				action_name: action.action_name.clone(),
				outcome,
				link,
			});
		}
	}

	Ok(combine_paths(paths, max_outcomes))
}

/// Groups paths by outcome and combines their probabilities. `paths` must arrive in plan order.
pub fn combine_paths(paths: Vec<OutcomePath>, max_outcomes: usize) -> Vec<OutcomeEstimate> {
	let mut grouped: BTreeMap<String, (Outcome, Vec<f64>, Vec<String>, Vec<String>)> =
		BTreeMap::new();

	for OutcomePath { action_id, action_name, outcome, link } in paths {
		let (_, probabilities, names, actions) = grouped
			.entry(outcome.outcome_id.clone())
			.or_insert_with(|| (outcome, Vec::new(), Vec::new(), Vec::new()));

		// An action reaching the same outcome twice counts once, with its first edge.
		if actions.contains(&action_id) {
			continue;
		}

		probabilities.push(link.probability());
		actions.push(action_id);

		if !names.contains(&action_name) {
			names.push(action_name);
		}
	}

	let mut out = grouped
		.into_values()
		.filter(|(_, probabilities, _, _)| !probabilities.is_empty())
		.map(|(outcome, probabilities, names, actions)| OutcomeEstimate {
			outcome,
			probability: combine_probabilities(&probabilities),
			influencing_factors: names,
			contributing_actions: actions,
		})
		.collect::<Vec<_>>();

	out.sort_by(|a, b| {
		b.probability
			.total_cmp(&a.probability)
			.then_with(|| a.outcome.outcome_id.cmp(&b.outcome.outcome_id))
	});
	out.truncate(max_outcomes);

	out
}

/// `1 - Π(1 - p)`, clamped to [0, 1].
pub fn combine_probabilities(probabilities: &[f64]) -> f64 {
	let miss = probabilities.iter().fold(1.0, |acc, p| acc * (1.0 - p.clamp(0.0, 1.0)));

	(1.0 - miss).clamp(0.0, 1.0)
}
