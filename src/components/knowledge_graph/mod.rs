//! Knowledge graph explorer: index, expansion and layout core plus the
//! canvas view and panels that present it.

mod adapter;
mod api;
mod component;
mod config;
mod controller;
mod error;
mod index;
mod layout;
mod panels;
mod render;
mod root;
mod sanitize;
mod state;
mod style;
mod types;
mod visibility;

pub use adapter::{FitRequest, GraphScene, RenderEdge, RenderNode};
pub use api::{ExtractionClient, RequestTicket, RequestTracker};
pub use component::KnowledgeGraphCanvas;
pub use config::ExplorerConfig;
pub use controller::{ExpansionState, ExplorerAction, GraphExplorer, GraphStats, TypeFilter};
pub use error::{ExplorerError, IndexWarning};
pub use index::{GraphIndex, RelationTargets};
pub use layout::LayeredLayout;
pub use panels::{GraphPanel, LegendPanel, StatsPanel};
pub use style::{EdgeStyle, Marker};
pub use types::{
	GraphNode, GraphResponse, NodeId, NodeType, Position, PositionedNode, RawEdge, RawNode, Relation,
	VisibleEdge, VisibleSubgraph,
};
pub use visibility::ExpandedSet;
