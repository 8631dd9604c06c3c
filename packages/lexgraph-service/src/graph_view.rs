//! Neighborhood of a single section, shaped for graph visualization.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;

use crate::{LexgraphService, Result, store};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
	pub id: String,
	pub label: String,
	#[serde(rename = "type")]
	pub kind: String,
	pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphEdge {
	pub from: String,
	pub to: String,
	pub label: String,
	pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphView {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
	pub root: String,
}

struct GraphBuilder {
	label_chars: usize,
	seen: HashSet<String>,
	nodes: Vec<GraphNode>,
	edges: Vec<GraphEdge>,
}
impl GraphBuilder {
	fn node<T: Serialize>(&mut self, id: &str, label: &str, kind: &str, entity: &T) -> Result<()> {
		if !self.seen.insert(id.to_string()) {
			return Ok(());
		}

		self.nodes.push(GraphNode {
			id: id.to_string(),
			label: truncate(label, self.label_chars),
			kind: kind.to_string(),
			data: to_value(entity)?,
		});

		Ok(())
	}

	fn edge<T: Serialize>(&mut self, from: &str, to: &str, label: &str, attrs: &T) -> Result<()> {
		self.edges.push(GraphEdge {
			from: from.to_string(),
			to: to.to_string(),
			label: label.to_string(),
			data: to_value(attrs)?,
		});

		Ok(())
	}
}

impl LexgraphService {
	/// The section plus its related sections, actions with their outcomes, evidence and case
	/// types. Fails with `NotFound` when the root section does not exist.
	pub async fn section_graph(&self, section_id: &str) -> Result<GraphView> {
		let store = self.store.as_ref();
		let root = store.get_section(section_id).await?;
		let (related, actions, evidence, case_types) = tokio::try_join!(
			store::related_links(store, section_id),
			store::action_links(store, section_id),
			store::evidence_links(store, section_id),
			store::case_type_links(store, section_id),
		)?;
		let mut graph = GraphBuilder {
			label_chars: self.cfg.limits.graph_label_chars as usize,
			seen: HashSet::new(),
			nodes: Vec::new(),
			edges: Vec::new(),
		};

		graph.node(&root.section_id, &root.section_number, "LegalSection", &root)?;

		for (section, relation) in related {
			graph.node(&section.section_id, &section.section_number, "LegalSection", &section)?;
			graph.edge(section_id, &section.section_id, &relation.relationship_type, &relation)?;
		}
		for (action, link) in actions {
			graph.node(&action.action_id, &action.action_name, "LegalAction", &action)?;
			graph.edge(section_id, &action.action_id, "HAS_ACTION", &link)?;

			for (outcome, outcome_link) in store::outcome_links(store, &action.action_id).await? {
				graph.node(
					&outcome.outcome_id,
					&outcome.outcome_description,
					"Outcome",
					&outcome,
				)?;
				graph.edge(&action.action_id, &outcome.outcome_id, "LEADS_TO", &outcome_link)?;
			}
		}
		for (item, requirement) in evidence {
			graph.node(&item.evidence_id, &item.evidence_name, "Evidence", &item)?;
			graph.edge(section_id, &item.evidence_id, "REQUIRES", &requirement)?;
		}
		for (case_type, mapping) in case_types {
			graph.node(&case_type.case_type_id, &case_type.case_type_id, "CaseType", &case_type)?;
			graph.edge(section_id, &case_type.case_type_id, "MAPS_TO", &mapping)?;
		}

		tracing::debug!(
			section_id,
			nodes = graph.nodes.len(),
			edges = graph.edges.len(),
			"Built section graph."
		);

		Ok(GraphView { nodes: graph.nodes, edges: graph.edges, root: root.section_id })
	}
}

fn truncate(label: &str, max_chars: usize) -> String {
	label.chars().take(max_chars).collect()
}

fn to_value<T: Serialize>(value: &T) -> Result<Value> {
	serde_json::to_value(value)
		.map_err(|err| crate::Error::inconsistency(format!("failed to encode graph data: {err}")))
}
