//! Explorer session: static index plus the user-driven expansion state,
//! with the derived visible subgraph and layout kept in step after every
//! transition.

use std::collections::HashSet;

use log::{debug, info};

use super::adapter::{FitRequest, GraphScene, to_render_edges, to_render_nodes};
use super::index::GraphIndex;
use super::layout::LayeredLayout;
use super::root::select_root;
use super::types::{GraphResponse, NodeId, NodeType, PositionedNode, VisibleSubgraph};
use super::visibility::{ExpandedSet, compute_visible};

/// Node type filter; `All` shows everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TypeFilter {
	/// Show every type.
	#[default]
	All,
	/// Show only nodes of this type.
	Only(NodeType),
}

impl TypeFilter {
	/// Whether a node of `node_type` passes the filter.
	pub fn matches(&self, node_type: &NodeType) -> bool {
		match self {
			TypeFilter::All => true,
			TypeFilter::Only(ty) => ty == node_type,
		}
	}

	/// Form value: `all` or the node type tag.
	pub fn as_str(&self) -> &str {
		match self {
			TypeFilter::All => "all",
			TypeFilter::Only(ty) => ty.as_str(),
		}
	}
}

impl From<&str> for TypeFilter {
	fn from(value: &str) -> Self {
		match value {
			"all" | "" => TypeFilter::All,
			tag => TypeFilter::Only(NodeType::from(tag)),
		}
	}
}

/// UI-facing state of one graph session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpansionState {
	/// Never empty while the session has a root.
	pub expanded: ExpandedSet,
	/// Last clicked node.
	pub selected: Option<NodeId>,
	/// Search input as typed.
	pub search_term: String,
	/// Type filter in effect.
	pub filter: TypeFilter,
	/// Search matches among the visible nodes.
	pub highlighted: HashSet<NodeId>,
}

impl ExpansionState {
	/// Fresh state: only the root expanded.
	pub fn new(root: Option<&NodeId>) -> Self {
		Self {
			expanded: ExpandedSet::with_root(root),
			..Self::default()
		}
	}
}

/// User input the explorer reacts to.
#[derive(Clone, Debug, PartialEq)]
pub enum ExplorerAction {
	/// Select a node and toggle its expansion.
	NodeClick(NodeId),
	/// Highlight nodes matching the term.
	Search(String),
	/// Show only one node type, or all.
	Filter(TypeFilter),
	/// Back to the initial view.
	Reset,
}

/// Counts shown in the stats panel, over the visible subgraph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GraphStats {
	/// Visible nodes.
	pub total_nodes: usize,
	/// Visible edges.
	pub total_edges: usize,
	/// Visible node count per type, in first-seen order.
	pub by_type: Vec<(NodeType, usize)>,
}

/// One explorer session over a single extraction response.
#[derive(Clone, Debug)]
pub struct GraphExplorer {
	index: GraphIndex,
	root: Option<NodeId>,
	state: ExpansionState,
	layout: LayeredLayout,
	visible: VisibleSubgraph,
	positioned: Vec<PositionedNode>,
	fit: FitRequest,
}

impl GraphExplorer {
	/// Index `response` and reveal the root's neighbourhood. `session`
	/// tags the fit requests of this explorer.
	pub fn new(response: &GraphResponse, session: u64, layout: LayeredLayout) -> Self {
		let index = GraphIndex::build(&response.nodes, &response.edges);
		let root = select_root(&response.nodes, &index);
		info!(
			"session {}: {} nodes, {} edges, root {:?}",
			session,
			response.nodes.len(),
			response.edges.len(),
			root.as_ref().map(NodeId::as_str)
		);

		let mut explorer = Self {
			state: ExpansionState::new(root.as_ref()),
			index,
			root,
			layout,
			visible: VisibleSubgraph::default(),
			positioned: Vec::new(),
			fit: FitRequest { session, count: 0 },
		};
		explorer.refresh();
		explorer
	}

	/// Dispatch one action.
	pub fn apply(&mut self, action: ExplorerAction) {
		match action {
			ExplorerAction::NodeClick(id) => self.node_click(&id),
			ExplorerAction::Search(term) => self.search(&term),
			ExplorerAction::Filter(filter) => self.filter(filter),
			ExplorerAction::Reset => self.reset(),
		}
	}

	/// Select the node and toggle its expansion. The last expanded node
	/// cannot be collapsed.
	pub fn node_click(&mut self, id: &NodeId) {
		if !self.index.contains(id) {
			debug!("ignoring click on unknown node {}", id);
			return;
		}

		self.state.selected = Some(id.clone());
		if self.state.expanded.contains(id) {
			if self.state.expanded.len() > 1 {
				self.state.expanded.remove(id);
			}
		} else {
			self.state.expanded.insert(id.clone());
		}
		self.refresh();
	}

	/// Highlight visible nodes whose label, original id or description
	/// contains `term`, ignoring case. An empty term clears highlights.
	pub fn search(&mut self, term: &str) {
		self.state.search_term = term.to_string();
		self.state.highlighted.clear();
		if term.is_empty() {
			return;
		}

		let needle = term.to_lowercase();
		let hit = |text: &str| text.to_lowercase().contains(&needle);
		self.state.highlighted = self
			.visible
			.nodes
			.iter()
			.filter(|n| {
				hit(&n.label) || hit(&n.original_id) || n.description.as_deref().is_some_and(hit)
			})
			.map(|n| n.id.clone())
			.collect();
	}

	/// Hide visible nodes that fail `filter`.
	pub fn filter(&mut self, filter: TypeFilter) {
		self.state.filter = filter;
	}

	/// Back to the root alone, clear search, filter and selection, and
	/// ask the view to re-fit.
	pub fn reset(&mut self) {
		self.state = ExpansionState::new(self.root.as_ref());
		self.fit.count += 1;
		self.refresh();
	}

	fn refresh(&mut self) {
		self.visible = compute_visible(&self.index, &self.state.expanded, self.root.as_ref());
		self.positioned =
			self.layout
				.layout(&self.visible.nodes, &self.visible.edges, self.root.as_ref());
	}

	/// No nodes in the response.
	pub fn is_empty(&self) -> bool {
		self.index.is_empty()
	}

	/// Index over the full response.
	pub fn index(&self) -> &GraphIndex {
		&self.index
	}

	/// Node the exploration starts from; `None` for an empty response.
	pub fn root(&self) -> Option<&NodeId> {
		self.root.as_ref()
	}

	/// Current expansion, selection, search and filter.
	pub fn state(&self) -> &ExpansionState {
		&self.state
	}

	/// Nodes and edges revealed so far.
	pub fn visible(&self) -> &VisibleSubgraph {
		&self.visible
	}

	/// Visible nodes with their layout positions.
	pub fn positioned(&self) -> &[PositionedNode] {
		&self.positioned
	}

	/// Render data for the canvas.
	pub fn scene(&self) -> GraphScene {
		let nodes = to_render_nodes(&self.positioned, &self.state);
		let edges = to_render_edges(&self.visible.edges, &nodes);
		GraphScene {
			nodes,
			edges,
			fit: self.fit,
		}
	}

	/// Totals and per-type counts of the visible subgraph.
	pub fn stats(&self) -> GraphStats {
		let mut by_type: Vec<(NodeType, usize)> = Vec::new();
		for node in &self.visible.nodes {
			match by_type.iter_mut().find(|(ty, _)| ty == &node.node_type) {
				Some((_, count)) => *count += 1,
				None => by_type.push((node.node_type.clone(), 1)),
			}
		}
		GraphStats {
			total_nodes: self.visible.nodes.len(),
			total_edges: self.visible.edges.len(),
			by_type,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::knowledge_graph::types::{RawEdge, RawNode};

	fn response() -> GraphResponse {
		GraphResponse {
			nodes: vec![
				RawNode::new("Letter-1", "Letter", "Letter"),
				RawNode::new("alice@x.com", "EMAIL", "alice@x.com"),
				RawNode::new("Alice Smith", "PERSON", "Alice Smith")
					.with_description("Sender of the letter"),
				RawNode::new("Bob", "PERSON", "Bob"),
			],
			edges: vec![
				RawEdge::new("Letter-1", "alice@x.com", "sent_to"),
				RawEdge::new("Letter-1", "Alice Smith", "wrote"),
				RawEdge::new("Alice Smith", "Bob", "mentioned_together"),
			],
		}
	}

	fn explorer() -> GraphExplorer {
		GraphExplorer::new(&response(), 1, LayeredLayout::default())
	}

	fn id(explorer: &GraphExplorer, raw: &str) -> NodeId {
		explorer.index().id_of(raw).cloned().unwrap()
	}

	#[test]
	fn starts_with_root_expanded() {
		let explorer = explorer();
		let root = id(&explorer, "Letter-1");
		assert_eq!(explorer.root(), Some(&root));
		assert_eq!(explorer.state().expanded.iter().collect::<Vec<_>>(), [&root]);
		assert_eq!(explorer.visible().nodes.len(), 3);
		assert_eq!(explorer.positioned().len(), 3);
	}

	#[test]
	fn click_toggles_expansion_and_selects() {
		let mut explorer = explorer();
		let alice = id(&explorer, "Alice Smith");

		explorer.node_click(&alice);
		assert_eq!(explorer.state().selected.as_ref(), Some(&alice));
		assert!(explorer.state().expanded.contains(&alice));
		assert_eq!(explorer.visible().nodes.len(), 4);

		explorer.node_click(&alice);
		assert!(!explorer.state().expanded.contains(&alice));
		assert_eq!(explorer.visible().nodes.len(), 3);
	}

	#[test]
	fn last_expanded_node_cannot_collapse() {
		let mut explorer = explorer();
		let root = id(&explorer, "Letter-1");
		explorer.node_click(&root);
		explorer.node_click(&root);
		assert_eq!(explorer.state().expanded.len(), 1);
		assert!(explorer.state().expanded.contains(&root));
		assert_eq!(explorer.state().selected.as_ref(), Some(&root));
	}

	#[test]
	fn expanded_set_never_empties() {
		let mut explorer = explorer();
		let ids: Vec<NodeId> = explorer.index().nodes().map(|n| n.id.clone()).collect();
		// fixed pseudo-random click sequence over every node
		let mut seed = 7usize;
		for _ in 0..200 {
			seed = (seed * 9301 + 49297) % 233280;
			explorer.node_click(&ids[seed % ids.len()]);
			assert!(!explorer.state().expanded.is_empty());
		}
	}

	#[test]
	fn unknown_click_is_ignored() {
		let mut explorer = explorer();
		let before = explorer.state().clone();
		explorer.node_click(&NodeId::new_unchecked("ghost".into()));
		assert_eq!(explorer.state(), &before);
	}

	#[test]
	fn search_highlights_visible_matches() {
		let mut explorer = explorer();
		explorer.search("ALICE");
		let alice_email = id(&explorer, "alice@x.com");
		let alice = id(&explorer, "Alice Smith");
		assert_eq!(explorer.state().highlighted, HashSet::from([alice_email, alice.clone()]));

		explorer.search("sender");
		assert_eq!(explorer.state().highlighted, HashSet::from([alice]));

		// Bob is not visible yet
		explorer.search("bob");
		assert!(explorer.state().highlighted.is_empty());

		explorer.search("");
		assert!(explorer.state().highlighted.is_empty());
		assert_eq!(explorer.state().search_term, "");
	}

	#[test]
	fn filter_hides_other_types_in_scene() {
		let mut explorer = explorer();
		explorer.apply(ExplorerAction::Filter(TypeFilter::from("EMAIL")));
		let scene = explorer.scene();
		let shown: Vec<_> = scene.nodes.iter().filter(|n| !n.hidden).collect();
		assert_eq!(shown.len(), 1);
		assert_eq!(shown[0].full_label, "alice@x.com");
		assert!(scene.edges.iter().all(|e| e.hidden));
	}

	#[test]
	fn reset_restores_initial_state_and_requests_fit() {
		let mut explorer = explorer();
		let initial_fit = explorer.scene().fit;
		let alice = id(&explorer, "Alice Smith");
		explorer.apply(ExplorerAction::NodeClick(alice));
		explorer.apply(ExplorerAction::Search("bob".into()));
		explorer.apply(ExplorerAction::Filter(TypeFilter::Only(NodeType::Person)));

		explorer.apply(ExplorerAction::Reset);
		let root = id(&explorer, "Letter-1");
		assert_eq!(explorer.state(), &ExpansionState::new(Some(&root)));
		assert_eq!(explorer.visible().nodes.len(), 3);
		assert_ne!(explorer.scene().fit, initial_fit);
	}

	#[test]
	fn stats_count_visible_by_type() {
		let explorer = explorer();
		let stats = explorer.stats();
		assert_eq!(stats.total_nodes, 3);
		assert_eq!(stats.total_edges, 2);
		assert_eq!(
			stats.by_type,
			[(NodeType::Letter, 1), (NodeType::Email, 1), (NodeType::Person, 1)]
		);
	}

	#[test]
	fn empty_response_is_an_empty_session() {
		let mut explorer = GraphExplorer::new(&GraphResponse::default(), 2, LayeredLayout::default());
		assert!(explorer.is_empty());
		assert!(explorer.root().is_none());
		assert!(explorer.visible().is_empty());
		explorer.reset();
		assert!(explorer.state().expanded.is_empty());
		assert!(explorer.scene().nodes.is_empty());
	}

	#[test]
	fn type_filter_round_trips_form_values() {
		assert_eq!(TypeFilter::from("all"), TypeFilter::All);
		assert_eq!(TypeFilter::from("Letter"), TypeFilter::Only(NodeType::Letter));
		assert_eq!(TypeFilter::Only(NodeType::PhoneLocal).as_str(), "PHONE_LOCAL");
		assert!(TypeFilter::All.matches(&NodeType::Other("x".into())));
	}
}
