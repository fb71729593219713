use super::types::{NodeType, Relation};

pub const DEFAULT_NODE_COLOR: &str = "#374151";

/// Bubble fill for a node type.
pub fn node_color(node_type: &NodeType) -> &'static str {
	match node_type {
		NodeType::Identity => "#4f46e5",
		NodeType::Person => "#16a34a",
		NodeType::Address => "#ca8a04",
		NodeType::Cardinal => "#9ca3af",
		NodeType::Phone => "#9333ea",
		NodeType::Email => "#db2777",
		NodeType::Letter => "#2563eb",
		NodeType::Date => "#ea580c",
		NodeType::Location => "#0891b2",
		NodeType::FullAddress | NodeType::PhoneLocal | NodeType::Other(_) => DEFAULT_NODE_COLOR,
	}
}

/// Node types listed in the legend.
pub const LEGEND_NODE_TYPES: [NodeType; 9] = [
	NodeType::Identity,
	NodeType::Person,
	NodeType::Address,
	NodeType::Cardinal,
	NodeType::Phone,
	NodeType::Email,
	NodeType::Letter,
	NodeType::Date,
	NodeType::Location,
];

/// Arrow head at the target end of an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
	/// Open chevron.
	Arrow,
	/// Filled triangle.
	ArrowClosed,
}

/// Stroke settings for one relation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeStyle {
	/// CSS colour.
	pub stroke: &'static str,
	/// Line width in graph units.
	pub width: f64,
	/// Dash and gap lengths; `None` draws a solid line.
	pub dash: Option<(f64, f64)>,
	/// Head drawn at the target.
	pub marker: Marker,
	/// Dashes flow from source to target.
	pub animated: bool,
}

impl EdgeStyle {
	const fn plain(stroke: &'static str, width: f64) -> Self {
		Self {
			stroke,
			width,
			dash: None,
			marker: Marker::Arrow,
			animated: false,
		}
	}
}

pub const DEFAULT_EDGE_STYLE: EdgeStyle = EdgeStyle::plain("#6b7280", 1.0);

pub fn edge_style(relation: &Relation) -> EdgeStyle {
	match relation {
		Relation::MentionedTogether => EdgeStyle {
			animated: true,
			..EdgeStyle::plain("#60a5fa", 2.0)
		},
		Relation::IsName => EdgeStyle {
			dash: Some((5.0, 5.0)),
			marker: Marker::ArrowClosed,
			..EdgeStyle::plain("#a78bfa", 2.0)
		},
		Relation::HasAddress => EdgeStyle::plain("#fbbf24", 1.5),
		Relation::HasPhone => EdgeStyle::plain("#c084fc", 1.5),
		Relation::HasEmail => EdgeStyle::plain("#f472b6", 1.5),
		Relation::Wrote => EdgeStyle::plain("#10b981", 2.0),
		Relation::SentTo => EdgeStyle::plain("#3b82f6", 2.0),
		Relation::Other(_) => DEFAULT_EDGE_STYLE,
	}
}
