use super::index::GraphIndex;
use super::types::{NodeId, NodeType, RawNode};

/// Pick the node the exploration starts from.
///
/// First match wins: the source document, the best-scored identity
/// (earliest on ties, missing score counts as 0), the first node with an
/// outgoing relation, the first node. `None` only for an empty list.
pub fn select_root(nodes: &[RawNode], index: &GraphIndex) -> Option<NodeId> {
	let first = nodes.first()?;

	if let Some(letter) = nodes.iter().find(|n| n.node_type.is_document()) {
		return index.id_of(&letter.id).cloned();
	}

	let mut best: Option<&RawNode> = None;
	for node in nodes.iter().filter(|n| n.node_type == NodeType::Identity) {
		let score = node.score.unwrap_or(0.0);
		if best.is_none_or(|b| score > b.score.unwrap_or(0.0)) {
			best = Some(node);
		}
	}
	if let Some(identity) = best {
		return index.id_of(&identity.id).cloned();
	}

	if let Some(source) = index.sources().first() {
		return Some(source.clone());
	}

	index.id_of(&first.id).cloned()
}
