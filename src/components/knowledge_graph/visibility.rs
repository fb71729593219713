//! Which part of the graph is revealed for a given set of expanded nodes.

use std::collections::HashSet;

use super::index::GraphIndex;
use super::types::{NodeId, VisibleEdge, VisibleSubgraph};

/// Expanded node ids in the order they were expanded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpandedSet {
	ids: Vec<NodeId>,
}

impl ExpandedSet {
	/// Empty set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Set holding only `root`, if any.
	pub fn with_root(root: Option<&NodeId>) -> Self {
		Self {
			ids: root.into_iter().cloned().collect(),
		}
	}

	/// Whether `id` is expanded.
	pub fn contains(&self, id: &NodeId) -> bool {
		self.ids.contains(id)
	}

	/// Returns false if already present.
	pub fn insert(&mut self, id: NodeId) -> bool {
		if self.contains(&id) {
			return false;
		}
		self.ids.push(id);
		true
	}

	/// Returns false if absent.
	pub fn remove(&mut self, id: &NodeId) -> bool {
		let before = self.ids.len();
		self.ids.retain(|x| x != id);
		self.ids.len() != before
	}

	/// Ids in expansion order.
	pub fn iter(&self) -> impl Iterator<Item = &NodeId> {
		self.ids.iter()
	}

	/// Number of expanded nodes.
	pub fn len(&self) -> usize {
		self.ids.len()
	}

	/// Nothing expanded.
	pub fn is_empty(&self) -> bool {
		self.ids.is_empty()
	}
}

impl FromIterator<NodeId> for ExpandedSet {
	fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
		let mut set = ExpandedSet::new();
		for id in iter {
			set.insert(id);
		}
		set
	}
}

/// The root plus one hop out of every expanded node.
///
/// An edge whose reverse (same relation) is already present is skipped,
/// so a symmetric relation shows up once. Unknown root gives an empty
/// subgraph.
pub fn compute_visible(
	index: &GraphIndex,
	expanded: &ExpandedSet,
	root: Option<&NodeId>,
) -> VisibleSubgraph {
	let Some(root_node) = root.and_then(|id| index.node(id)) else {
		return VisibleSubgraph::default();
	};

	let mut visible = VisibleSubgraph::default();
	let mut added_nodes = HashSet::new();
	let mut added_edges = HashSet::new();

	visible.nodes.push(root_node.clone());
	added_nodes.insert(root_node.id.clone());

	for source in expanded.iter() {
		if !index.contains(source) {
			continue;
		}
		let Some(relations) = index.relations(source) else {
			continue;
		};

		for (relation, targets) in relations.iter() {
			for target in targets {
				if !added_nodes.contains(target) {
					if let Some(node) = index.node(target) {
						visible.nodes.push(node.clone());
						added_nodes.insert(target.clone());
					}
				}

				let edge_id = VisibleEdge::edge_id(source, relation, target);
				let reverse_id = VisibleEdge::edge_id(target, relation, source);
				if added_edges.contains(&edge_id) || added_edges.contains(&reverse_id) {
					continue;
				}
				added_edges.insert(edge_id.clone());
				visible.edges.push(VisibleEdge {
					id: edge_id,
					source: source.clone(),
					target: target.clone(),
					relation: relation.clone(),
				});
			}
		}
	}

	visible
}
