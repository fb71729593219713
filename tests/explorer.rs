use knowledge_graph_explorer::components::knowledge_graph::{
	ExplorerAction, GraphExplorer, GraphResponse, LayeredLayout, NodeId, NodeType, TypeFilter,
};

const LETTER: &str = r#"{
	"nodes": [
		{"id": "Letter-1", "type": "Letter", "label": "Letter"},
		{"id": "Jane Doe (Identity)", "type": "IDENTITY", "label": "Jane Doe (Identity)", "score": 0.9},
		{"id": "Jane Doe", "type": "PERSON", "label": "Jane Doe", "description": "Author"},
		{"id": "jane@example.com", "type": "EMAIL", "label": "jane@example.com"},
		{"id": "Bob", "type": "PERSON", "label": "Bob"},
		{"id": "12 Main St", "type": "ADDRESS", "label": "12 Main St"}
	],
	"edges": [
		{"source": "Letter-1", "target": "Bob", "relation": "sent_to"},
		{"source": "Letter-1", "target": "Jane Doe", "relation": "mentioned_together"},
		{"source": "Jane Doe (Identity)", "target": "Jane Doe", "relation": "IS_NAME"},
		{"source": "Jane Doe (Identity)", "target": "jane@example.com", "relation": "HAS_EMAIL"},
		{"source": "Jane Doe", "target": "12 Main St", "relation": "HAS_ADDRESS"},
		{"source": "Letter-1", "target": "Ghost", "relation": "sent_to"}
	]
}"#;

fn session(json: &str) -> GraphExplorer {
	let response: GraphResponse = serde_json::from_str(json).unwrap();
	GraphExplorer::new(&response, 1, LayeredLayout::default())
}

fn id(explorer: &GraphExplorer, raw: &str) -> NodeId {
	explorer.index().id_of(raw).cloned().unwrap()
}

fn visible_ids(explorer: &GraphExplorer) -> Vec<&str> {
	explorer.visible().nodes.iter().map(|n| n.id.as_str()).collect()
}

#[test]
fn letter_roots_the_initial_view() {
	let explorer = session(LETTER);

	assert_eq!(explorer.root().map(NodeId::as_str), Some("Letter-1"));
	assert_eq!(visible_ids(&explorer), ["Letter-1", "Bob", "Jane_Doe"]);
	assert_eq!(explorer.visible().edges.len(), 2);
	assert_eq!(explorer.index().dropped_edges(), 1);

	let stats = explorer.stats();
	assert_eq!((stats.total_nodes, stats.total_edges), (3, 2));
	assert_eq!(stats.by_type, vec![(NodeType::Letter, 1), (NodeType::Person, 2)]);
}

#[test]
fn clicking_expands_then_collapses() {
	let mut explorer = session(LETTER);
	let jane = id(&explorer, "Jane Doe");
	let street = id(&explorer, "12 Main St");

	explorer.apply(ExplorerAction::NodeClick(jane.clone()));
	assert_eq!(explorer.state().selected.as_ref(), Some(&jane));
	assert_eq!(visible_ids(&explorer), ["Letter-1", "Bob", "Jane_Doe", "12_Main_St"]);
	// the symmetric edge back to the letter is not drawn twice
	assert_eq!(explorer.visible().edges.len(), 3);

	let placed = explorer.positioned().iter().find(|p| p.node.id == street).unwrap();
	assert_eq!(placed.depth, 2);
	assert_eq!((placed.position.x, placed.position.y), (0.0, 300.0));

	explorer.apply(ExplorerAction::NodeClick(jane));
	assert_eq!(visible_ids(&explorer), ["Letter-1", "Bob", "Jane_Doe"]);
}

#[test]
fn expansion_never_empties() {
	let mut explorer = session(LETTER);
	let root = explorer.root().cloned().unwrap();
	let bob = id(&explorer, "Bob");

	for target in [&root, &bob, &root, &bob, &bob, &root] {
		explorer.apply(ExplorerAction::NodeClick(target.clone()));
		assert!(!explorer.state().expanded.is_empty());
	}

	// an id from another session is not part of this index
	let other = session(r#"{"nodes": [{"id": "Carol", "type": "PERSON"}], "edges": []}"#);
	let before = explorer.state().expanded.clone();
	explorer.apply(ExplorerAction::NodeClick(id(&other, "Carol")));
	assert_eq!(explorer.state().expanded, before);
}

#[test]
fn search_filter_and_reset_flow_into_the_scene() {
	let mut explorer = session(LETTER);
	let jane = id(&explorer, "Jane Doe");
	let bob = id(&explorer, "Bob");
	let first_fit = explorer.scene().fit;

	explorer.apply(ExplorerAction::Search("JANE".into()));
	let scene = explorer.scene();
	let jane_node = scene.node(&jane).unwrap();
	assert!(jane_node.highlighted && !jane_node.dimmed);
	assert!(scene.node(&bob).unwrap().dimmed);

	explorer.apply(ExplorerAction::Filter(TypeFilter::from("PERSON")));
	let scene = explorer.scene();
	let root = explorer.root().cloned().unwrap();
	assert!(scene.node(&root).unwrap().hidden);
	assert!(scene.edges.iter().all(|e| e.hidden));
	assert!(!scene.node(&bob).unwrap().hidden);

	explorer.apply(ExplorerAction::Reset);
	let scene = explorer.scene();
	assert!(scene.nodes.iter().all(|n| !n.hidden && !n.dimmed && !n.highlighted));
	assert_eq!(explorer.state().filter, TypeFilter::All);
	assert!(explorer.state().search_term.is_empty());
	assert_eq!(scene.fit.session, first_fit.session);
	assert!(scene.fit.count > first_fit.count);
}

#[test]
fn single_edge_scenario_lays_out_on_the_axis() {
	let explorer = session(
		r#"{
			"nodes": [{"id": "Letter-1", "type": "Letter"}, {"id": "alice@x.com", "type": "EMAIL"}],
			"edges": [{"source": "Letter-1", "target": "alice@x.com", "relation": "sent_to"}]
		}"#,
	);

	let positions: Vec<(f64, f64)> = explorer
		.positioned()
		.iter()
		.map(|p| (p.position.x, p.position.y))
		.collect();
	assert_eq!(positions, [(0.0, 0.0), (0.0, 150.0)]);

	let scene = explorer.scene();
	assert_eq!(scene.edges[0].caption, "sent to");
	// missing labels fall back to the original id
	assert_eq!(scene.nodes[1].label, "alice@x.com");
}

#[test]
fn empty_response_is_an_empty_session() {
	let explorer = session(r#"{"nodes": [], "edges": []}"#);
	assert!(explorer.is_empty());
	assert!(explorer.root().is_none());
	assert!(explorer.scene().nodes.is_empty());
}
