//! Layered layout: y by breadth-first depth from the root, x spread
//! evenly around 0 within each depth.

use std::collections::{HashMap, HashSet, VecDeque};

use super::types::{GraphNode, NodeId, Position, PositionedNode, VisibleEdge};

pub const NODE_WIDTH: f64 = 150.0;
pub const NODE_HEIGHT: f64 = 150.0;

/// Slot sizes of the layered layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayeredLayout {
	/// Horizontal distance between neighbouring slots in a row.
	pub node_width: f64,
	/// Vertical distance between rows.
	pub node_height: f64,
}

impl Default for LayeredLayout {
	fn default() -> Self {
		Self {
			node_width: NODE_WIDTH,
			node_height: NODE_HEIGHT,
		}
	}
}

impl LayeredLayout {
	/// Position every node. Nodes the root cannot reach through forward
	/// edges share row 0 with the root. With no root every node stays at
	/// the origin on row 0.
	pub fn layout(
		&self,
		nodes: &[GraphNode],
		edges: &[VisibleEdge],
		root: Option<&NodeId>,
	) -> Vec<PositionedNode> {
		let Some(root) = root.filter(|_| !nodes.is_empty()) else {
			return nodes
				.iter()
				.map(|node| PositionedNode {
					node: node.clone(),
					depth: 0,
					position: Position::default(),
				})
				.collect();
		};

		let depths = depths_from(root, edges);

		let mut rows: Vec<(usize, Vec<&GraphNode>)> = Vec::new();
		for node in nodes {
			let depth = depths.get(&node.id).copied().unwrap_or(0);
			match rows.iter_mut().find(|(d, _)| *d == depth) {
				Some((_, row)) => row.push(node),
				None => rows.push((depth, vec![node])),
			}
		}

		let mut positioned = Vec::with_capacity(nodes.len());
		for (depth, row) in rows {
			let y = depth as f64 * self.node_height;
			let start_x = -(row.len() as f64 * self.node_width) / 2.0;
			for (i, node) in row.into_iter().enumerate() {
				positioned.push(PositionedNode {
					node: node.clone(),
					depth,
					position: Position {
						x: start_x + (i as f64 + 0.5) * self.node_width,
						y,
					},
				});
			}
		}
		positioned
	}
}

fn depths_from(root: &NodeId, edges: &[VisibleEdge]) -> HashMap<NodeId, usize> {
	let mut children: HashMap<&NodeId, Vec<&NodeId>> = HashMap::new();
	for edge in edges {
		children.entry(&edge.source).or_default().push(&edge.target);
	}

	let mut depths = HashMap::new();
	let mut visited = HashSet::new();
	let mut queue = VecDeque::from([(root, 0usize)]);
	while let Some((id, depth)) = queue.pop_front() {
		if !visited.insert(id) {
			continue;
		}
		depths.insert(id.clone(), depth);
		for &child in children.get(id).into_iter().flatten() {
			if !visited.contains(child) {
				queue.push_back((child, depth + 1));
			}
		}
	}
	depths
}
