//! Turns positioned nodes and visible edges into draw records for the
//! canvas renderer.

use std::collections::HashMap;

use super::controller::ExpansionState;
use super::style::{EdgeStyle, edge_style, node_color};
use super::types::{NodeId, NodeType, PositionedNode, VisibleEdge};

const TRUNCATE_OVER: usize = 15;
const SHORT_LEN: usize = 12;
const ELIDED_LEN: usize = 9;
const IDENTITY_SUFFIX: &str = " (Identity)";

/// Node ready for drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderNode {
	/// Sanitized id; also the hit-test key.
	pub id: NodeId,
	/// Shortened label drawn inside the bubble.
	pub label: String,
	/// Untruncated label for the tooltip.
	pub full_label: String,
	/// Entity category.
	pub node_type: NodeType,
	/// Tooltip text.
	pub description: Option<String>,
	/// Confidence, shown in the tooltip.
	pub score: Option<f64>,
	/// Centre in graph space.
	pub x: f64,
	/// See `x`.
	pub y: f64,
	/// Bubble fill.
	pub color: &'static str,
	/// Last clicked node.
	pub selected: bool,
	/// Matches the current search.
	pub highlighted: bool,
	/// A search is active and this node does not match.
	pub dimmed: bool,
	/// Filtered out by type.
	pub hidden: bool,
	/// Its neighbours are revealed.
	pub expanded: bool,
}

/// Edge ready for drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderEdge {
	/// Same key as the visible edge.
	pub id: String,
	/// Node the edge leaves.
	pub source: NodeId,
	/// Node the edge enters; carries the marker.
	pub target: NodeId,
	/// Relation text drawn at the midpoint.
	pub caption: String,
	/// Stroke for the relation.
	pub style: EdgeStyle,
	/// An endpoint is hidden or absent.
	pub hidden: bool,
}

/// Monotonic token; a changed value asks the canvas to fit its view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FitRequest {
	/// Explorer session the request belongs to.
	pub session: u64,
	/// Bumped on every reset within a session.
	pub count: u64,
}

/// Everything the canvas needs for one frame of the explorer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphScene {
	/// Nodes in layout order.
	pub nodes: Vec<RenderNode>,
	/// Edges drawn beneath the nodes.
	pub edges: Vec<RenderEdge>,
	/// Latest fit request.
	pub fit: FitRequest,
}

impl GraphScene {
	/// Render node with the given id.
	pub fn node(&self, id: &NodeId) -> Option<&RenderNode> {
		self.nodes.iter().find(|n| &n.id == id)
	}
}

/// Shorten a label for display inside a bubble.
pub fn truncate_label(label: &str, node_type: &NodeType) -> String {
	if label.chars().count() <= TRUNCATE_OVER {
		return label.to_string();
	}

	match node_type {
		NodeType::Email if label.contains('@') => {
			let local = label.split('@').next().unwrap_or_default();
			if local.chars().count() > SHORT_LEN {
				elide(local, ELIDED_LEN)
			} else {
				format!("{local}@...")
			}
		}
		NodeType::Identity if label.ends_with(IDENTITY_SUFFIX) => {
			let name = label.strip_suffix(IDENTITY_SUFFIX).unwrap_or(label);
			if name.chars().count() > SHORT_LEN {
				elide(name, ELIDED_LEN)
			} else {
				name.to_string()
			}
		}
		_ => elide(label, SHORT_LEN),
	}
}

fn elide(text: &str, keep: usize) -> String {
	let mut out: String = text.chars().take(keep).collect();
	out.push_str("...");
	out
}

pub fn to_render_nodes(positioned: &[PositionedNode], state: &ExpansionState) -> Vec<RenderNode> {
	let searching = !state.search_term.is_empty();
	positioned
		.iter()
		.map(|p| {
			let node = &p.node;
			let full_label = node.display_label().to_string();
			let highlighted = state.highlighted.contains(&node.id);
			RenderNode {
				id: node.id.clone(),
				label: truncate_label(&full_label, &node.node_type),
				full_label,
				node_type: node.node_type.clone(),
				description: node.description.clone(),
				score: node.score,
				x: p.position.x,
				y: p.position.y,
				color: node_color(&node.node_type),
				selected: state.selected.as_ref() == Some(&node.id),
				highlighted,
				dimmed: searching && !highlighted,
				hidden: !state.filter.matches(&node.node_type),
				expanded: state.expanded.contains(&node.id),
			}
		})
		.collect()
}

/// Edges touching a hidden or absent node are hidden too.
pub fn to_render_edges(edges: &[VisibleEdge], nodes: &[RenderNode]) -> Vec<RenderEdge> {
	let hidden: HashMap<&NodeId, bool> = nodes.iter().map(|n| (&n.id, n.hidden)).collect();
	let is_hidden = |id: &NodeId| hidden.get(id).copied().unwrap_or(true);

	edges
		.iter()
		.map(|edge| RenderEdge {
			id: edge.id.clone(),
			source: edge.source.clone(),
			target: edge.target.clone(),
			caption: edge.relation.caption(),
			style: edge_style(&edge.relation),
			hidden: is_hidden(&edge.source) || is_hidden(&edge.target),
		})
		.collect()
}
