//! Action planning: merge the actions reachable from every matched section into one linear
//! plan.

use std::{cmp::Ordering, collections::BTreeMap};

use serde::Serialize;

use lexgraph_domain::entity::{ActionLink, LegalAction};

use crate::{Result, matcher::SectionMatch, store};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedAction {
	/// Position in the plan, 1..=N.
	pub sequence: u32,
	#[serde(flatten)]
	pub action: LegalAction,
	/// Smallest `HAS_ACTION` sequence hint seen for this action.
	pub sequence_hint: u32,
	pub conditions: Vec<String>,
	pub source_sections: Vec<String>,
}

/// One `HAS_ACTION` edge as reached from a matched section.
#[derive(Debug, Clone)]
pub struct ActionSighting {
	pub section_id: String,
	pub action: LegalAction,
	pub link: ActionLink,
}

pub async fn plan_actions(
	store: &dyn store::GraphStore,
	matches: &[SectionMatch],
) -> Result<Vec<PlannedAction>> {
	let mut sightings = Vec::new();

	for matched in matches {
		let section_id = &matched.section.section_id;

		for (action, link) in store::action_links(store, section_id).await? {
			sightings.push(ActionSighting { section_id: section_id.clone(), action, link });
		}
	}

	Ok(merge_plan(sightings))
}

/// Merges sightings by action id and orders the result by sequence hint, then risk, then id.
///
/// Duplicates widen the cost range to the loosest bounds seen, keep the smallest hint and union
/// their conditions in first-seen order.
pub fn merge_plan(sightings: Vec<ActionSighting>) -> Vec<PlannedAction> {
	let mut merged: BTreeMap<String, PlannedAction> = BTreeMap::new();

	for ActionSighting { section_id, action, link } in sightings {
		let condition = link.conditions.trim().to_string();

		match merged.get_mut(&action.action_id) {
			Some(entry) => {
				entry.action.cost_min = entry.action.cost_min.min(action.cost_min);
				entry.action.cost_max = entry.action.cost_max.max(action.cost_max);
				entry.sequence_hint = entry.sequence_hint.min(link.sequence);

				if !condition.is_empty() && !entry.conditions.contains(&condition) {
					entry.conditions.push(condition);
				}
				if !entry.source_sections.contains(&section_id) {
					entry.source_sections.push(section_id);
				}
			},
			None => {
				let conditions = if condition.is_empty() { Vec::new() } else { vec![condition] };

				merged.insert(
					action.action_id.clone(),
					PlannedAction {
						sequence: 0,
						action,
						sequence_hint: link.sequence,
						conditions,
						source_sections: vec![section_id],
					},
				);
			},
		}
	}

	let mut plan = merged.into_values().collect::<Vec<_>>();

	plan.sort_by(compare_planned);

	for (idx, planned) in plan.iter_mut().enumerate() {
		planned.sequence = idx as u32 + 1;
	}

	plan
}

fn compare_planned(a: &PlannedAction, b: &PlannedAction) -> Ordering {
	a.sequence_hint
		.cmp(&b.sequence_hint)
		.then_with(|| a.action.risk_level.cmp(&b.action.risk_level))
		.then_with(|| a.action.action_id.cmp(&b.action.action_id))
}
