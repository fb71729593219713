//! Static lookup tables built once per extraction response.

use std::collections::HashMap;

use log::{debug, warn};

use super::error::IndexWarning;
use super::sanitize::IdMapping;
use super::types::{GraphNode, NodeId, RawEdge, RawNode, Relation};

/// Outgoing relations of one node, each with its target set.
///
/// Relations and targets keep first-insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RelationTargets {
	entries: Vec<(Relation, Vec<NodeId>)>,
}

impl RelationTargets {
	/// Returns false if the target was already present.
	fn insert(&mut self, relation: &Relation, target: &NodeId) -> bool {
		let slot = match self.entries.iter().position(|(r, _)| r == relation) {
			Some(i) => i,
			None => {
				self.entries.push((relation.clone(), Vec::new()));
				self.entries.len() - 1
			}
		};
		let targets = &mut self.entries[slot].1;
		if targets.contains(target) {
			return false;
		}
		targets.push(target.clone());
		true
	}

	/// Relations with their targets.
	pub fn iter(&self) -> impl Iterator<Item = (&Relation, &[NodeId])> {
		self.entries.iter().map(|(r, t)| (r, t.as_slice()))
	}

	/// Targets reached through `relation`.
	pub fn targets(&self, relation: &Relation) -> Option<&[NodeId]> {
		self.entries
			.iter()
			.find(|(r, _)| r == relation)
			.map(|(_, t)| t.as_slice())
	}

	/// Number of (relation, target) pairs.
	pub fn len(&self) -> usize {
		self.entries.iter().map(|(_, t)| t.len()).sum()
	}

	/// No outgoing relation.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// Node lookup and directed adjacency keyed by sanitized id.
///
/// Symmetric relations are stored in both directions. Immutable once
/// built; a new response builds a new index.
#[derive(Clone, Debug, Default)]
pub struct GraphIndex {
	mapping: IdMapping,
	nodes: HashMap<NodeId, GraphNode>,
	order: Vec<NodeId>,
	adjacency: HashMap<NodeId, RelationTargets>,
	sources: Vec<NodeId>,
	warnings: Vec<IndexWarning>,
}

impl GraphIndex {
	/// Index a response. Malformed edges and id clashes are recorded in
	/// [`GraphIndex::warnings`] instead of failing.
	pub fn build(nodes: &[RawNode], edges: &[RawEdge]) -> Self {
		let mut index = GraphIndex::default();

		for raw in nodes {
			let id = index.mapping.assign(&raw.id, &mut index.warnings);
			let node = GraphNode::from_raw(id.clone(), raw);
			if index.nodes.insert(id.clone(), node).is_some() {
				let warning = IndexWarning::DuplicateNode {
					original: raw.id.clone(),
				};
				warn!("{}", warning);
				index.warnings.push(warning);
			} else {
				index.order.push(id);
			}
		}

		for edge in edges {
			let (Some(source), Some(target)) = (
				index.mapping.get(&edge.source).cloned(),
				index.mapping.get(&edge.target).cloned(),
			) else {
				let warning = IndexWarning::MalformedEdge {
					from: edge.source.clone(),
					to: edge.target.clone(),
					relation: edge.relation.clone(),
				};
				warn!("{}", warning);
				index.warnings.push(warning);
				continue;
			};

			index.link(&source, &edge.relation, &target);
			if edge.relation.is_symmetric() {
				index.link(&target, &edge.relation, &source);
			}
		}

		debug!(
			"indexed {} nodes, {} sources, {} warnings",
			index.order.len(),
			index.sources.len(),
			index.warnings.len()
		);
		index
	}

	fn link(&mut self, source: &NodeId, relation: &Relation, target: &NodeId) {
		let relations = self.adjacency.entry(source.clone()).or_insert_with(|| {
			self.sources.push(source.clone());
			RelationTargets::default()
		});
		relations.insert(relation, target);
	}

	/// Node stored under a sanitized id.
	pub fn node(&self, id: &NodeId) -> Option<&GraphNode> {
		self.nodes.get(id)
	}

	/// Whether a node is stored under `id`.
	pub fn contains(&self, id: &NodeId) -> bool {
		self.nodes.contains_key(id)
	}

	/// Nodes in response order.
	pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
		self.order.iter().filter_map(|id| self.nodes.get(id))
	}

	/// Distinct nodes.
	pub fn node_count(&self) -> usize {
		self.order.len()
	}

	/// The response had no nodes.
	pub fn is_empty(&self) -> bool {
		self.order.is_empty()
	}

	/// Outgoing relations of a node.
	pub fn relations(&self, id: &NodeId) -> Option<&RelationTargets> {
		self.adjacency.get(id)
	}

	/// Nodes with at least one outgoing relation, in insertion order.
	pub fn sources(&self) -> &[NodeId] {
		&self.sources
	}

	/// Sanitized id assigned to a raw id.
	pub fn id_of(&self, raw: &str) -> Option<&NodeId> {
		self.mapping.get(raw)
	}

	/// Raw id a sanitized id came from.
	pub fn original_id(&self, id: &NodeId) -> Option<&str> {
		self.mapping.original(id)
	}

	/// Problems found while indexing, in discovery order.
	pub fn warnings(&self) -> &[IndexWarning] {
		&self.warnings
	}

	/// Edges skipped because an endpoint was missing.
	pub fn dropped_edges(&self) -> usize {
		self.warnings
			.iter()
			.filter(|w| matches!(w, IndexWarning::MalformedEdge { .. }))
			.count()
	}
}
