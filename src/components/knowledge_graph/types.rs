use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Entity category reported by the extraction backend.
///
/// Unrecognised tags land in [`NodeType::Other`], which keeps the raw
/// string for display and falls back to the default style.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeType {
	/// Resolved identity grouping a person's names and contacts.
	Identity,
	/// Named person.
	Person,
	/// Address part, e.g. a street or city.
	Address,
	/// Street address in one string.
	FullAddress,
	/// Email address.
	Email,
	/// Phone number with a country code.
	Phone,
	/// Phone number without a country code.
	PhoneLocal,
	/// The source document.
	Letter,
	/// Date or time expression.
	Date,
	/// Place that is not a postal address.
	Location,
	/// Bare number.
	Cardinal,
	/// Any other tag, kept verbatim.
	Other(String),
}

impl NodeType {
	/// Types offered by the type filter, in menu order.
	pub const FILTERABLE: [NodeType; 8] = [
		NodeType::Identity,
		NodeType::Person,
		NodeType::Address,
		NodeType::FullAddress,
		NodeType::Email,
		NodeType::Phone,
		NodeType::PhoneLocal,
		NodeType::Letter,
	];

	/// Wire tag, e.g. `PERSON`.
	pub fn as_str(&self) -> &str {
		match self {
			NodeType::Identity => "IDENTITY",
			NodeType::Person => "PERSON",
			NodeType::Address => "ADDRESS",
			NodeType::FullAddress => "FULL_ADDRESS",
			NodeType::Email => "EMAIL",
			NodeType::Phone => "PHONE",
			NodeType::PhoneLocal => "PHONE_LOCAL",
			NodeType::Letter => "Letter",
			NodeType::Date => "DATE",
			NodeType::Location => "LOCATION",
			NodeType::Cardinal => "CARDINAL",
			NodeType::Other(tag) => tag,
		}
	}

	/// Human readable name for menus.
	pub fn menu_label(&self) -> &str {
		match self {
			NodeType::Identity => "Identity",
			NodeType::Person => "Person",
			NodeType::Address => "Address",
			NodeType::FullAddress => "Full Address",
			NodeType::Email => "Email",
			NodeType::Phone => "Phone",
			NodeType::PhoneLocal => "Local Phone",
			NodeType::Letter => "Letter",
			NodeType::Date => "Date",
			NodeType::Location => "Location",
			NodeType::Cardinal => "Cardinal",
			NodeType::Other(tag) => tag,
		}
	}

	/// The source document a graph is extracted from.
	pub fn is_document(&self) -> bool {
		matches!(self, NodeType::Letter)
	}
}

impl From<String> for NodeType {
	fn from(tag: String) -> Self {
		match tag.as_str() {
			"IDENTITY" => NodeType::Identity,
			"PERSON" => NodeType::Person,
			"ADDRESS" => NodeType::Address,
			"FULL_ADDRESS" => NodeType::FullAddress,
			"EMAIL" => NodeType::Email,
			"PHONE" => NodeType::Phone,
			"PHONE_LOCAL" => NodeType::PhoneLocal,
			"Letter" => NodeType::Letter,
			"DATE" => NodeType::Date,
			"LOCATION" => NodeType::Location,
			"CARDINAL" => NodeType::Cardinal,
			_ => NodeType::Other(tag),
		}
	}
}

/// A node without a type tag lands in the default category.
impl Default for NodeType {
	fn default() -> Self {
		NodeType::Other(String::new())
	}
}

impl From<&str> for NodeType {
	fn from(tag: &str) -> Self {
		NodeType::from(tag.to_string())
	}
}

impl From<NodeType> for String {
	fn from(ty: NodeType) -> Self {
		match ty {
			NodeType::Other(tag) => tag,
			known => known.as_str().to_string(),
		}
	}
}

impl fmt::Display for NodeType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Typed relationship tag carried by an edge.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Relation {
	/// Co-occurrence in the same passage; symmetric.
	MentionedTogether,
	/// Identity to one of its names.
	IsName,
	/// Identity or person to an address.
	HasAddress,
	/// Identity or person to a phone number.
	HasPhone,
	/// Identity or person to an email address.
	HasEmail,
	/// Author to the document.
	Wrote,
	/// Document to its recipient.
	SentTo,
	/// Any other tag, kept verbatim.
	Other(String),
}

impl Relation {
	/// Relations with a dedicated style, in legend order.
	pub const STYLED: [Relation; 7] = [
		Relation::MentionedTogether,
		Relation::IsName,
		Relation::HasAddress,
		Relation::HasPhone,
		Relation::HasEmail,
		Relation::Wrote,
		Relation::SentTo,
	];

	/// Wire tag, e.g. `HAS_EMAIL`.
	pub fn as_str(&self) -> &str {
		match self {
			Relation::MentionedTogether => "mentioned_together",
			Relation::IsName => "IS_NAME",
			Relation::HasAddress => "HAS_ADDRESS",
			Relation::HasPhone => "HAS_PHONE",
			Relation::HasEmail => "HAS_EMAIL",
			Relation::Wrote => "wrote",
			Relation::SentTo => "sent_to",
			Relation::Other(tag) => tag,
		}
	}

	/// A symmetric relation implies its own reverse.
	pub fn is_symmetric(&self) -> bool {
		matches!(self, Relation::MentionedTogether)
	}

	/// Edge caption: the tag with underscores shown as spaces.
	pub fn caption(&self) -> String {
		self.as_str().replace('_', " ")
	}
}

impl From<String> for Relation {
	fn from(tag: String) -> Self {
		match tag.as_str() {
			"mentioned_together" => Relation::MentionedTogether,
			"IS_NAME" => Relation::IsName,
			"HAS_ADDRESS" => Relation::HasAddress,
			"HAS_PHONE" => Relation::HasPhone,
			"HAS_EMAIL" => Relation::HasEmail,
			"wrote" => Relation::Wrote,
			"sent_to" => Relation::SentTo,
			_ => Relation::Other(tag),
		}
	}
}

impl Default for Relation {
	fn default() -> Self {
		Relation::Other(String::new())
	}
}

impl From<&str> for Relation {
	fn from(tag: &str) -> Self {
		Relation::from(tag.to_string())
	}
}

impl From<Relation> for String {
	fn from(relation: Relation) -> Self {
		match relation {
			Relation::Other(tag) => tag,
			known => known.as_str().to_string(),
		}
	}
}

impl fmt::Display for Relation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

// Missing and `null` both read as the empty string.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
	Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_tag<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: From<String>,
{
	lenient_string(deserializer).map(T::from)
}

/// Node as delivered by the extraction backend.
///
/// Decoding never fails on a missing or `null` id, type or label: they
/// become empty, so the id sanitizes to `unknown` and the type falls into
/// [`NodeType::Other`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
	/// Raw id as extracted; may hold any characters.
	#[serde(default, deserialize_with = "lenient_string")]
	pub id: String,
	/// Entity category tag.
	#[serde(rename = "type", default, deserialize_with = "lenient_tag")]
	pub node_type: NodeType,
	/// Display text; blank means "show the id".
	#[serde(default, deserialize_with = "lenient_string")]
	pub label: String,
	/// Free text shown in the tooltip.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Confidence; only identities carry one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub score: Option<f64>,
}

impl RawNode {
	/// Node with no description or score.
	pub fn new(id: impl Into<String>, node_type: impl Into<NodeType>, label: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			node_type: node_type.into(),
			label: label.into(),
			description: None,
			score: None,
		}
	}

	/// Set the description.
	#[must_use]
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	/// Set the score.
	#[must_use]
	pub fn with_score(mut self, score: f64) -> Self {
		self.score = Some(score);
		self
	}
}

/// Edge as delivered by the extraction backend. Endpoints are raw ids.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEdge {
	/// Raw id of the source node.
	#[serde(default, deserialize_with = "lenient_string")]
	pub source: String,
	/// Raw id of the target node.
	#[serde(default, deserialize_with = "lenient_string")]
	pub target: String,
	/// Relationship tag.
	#[serde(default, deserialize_with = "lenient_tag")]
	pub relation: Relation,
}

impl RawEdge {
	/// Edge between two raw ids.
	pub fn new(
		source: impl Into<String>,
		target: impl Into<String>,
		relation: impl Into<Relation>,
	) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			relation: relation.into(),
		}
	}
}

/// Body returned by the extraction endpoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphResponse {
	/// Entities; an absent list reads as empty.
	#[serde(default)]
	pub nodes: Vec<RawNode>,
	/// Relations between raw ids; an absent list reads as empty.
	#[serde(default)]
	pub edges: Vec<RawEdge>,
}

/// Sanitized node id: only `[A-Za-z0-9_-]`, safe as a render key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
	pub(crate) fn new_unchecked(id: String) -> Self {
		Self(id)
	}

	/// The id as a string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Borrow<str> for NodeId {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Indexed node: raw fields under the sanitized id, plus the raw id.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	/// Sanitized id.
	pub id: NodeId,
	/// Id as it arrived in the response.
	pub original_id: String,
	/// Entity category.
	pub node_type: NodeType,
	/// Raw label, possibly blank.
	pub label: String,
	/// Free text from the response.
	pub description: Option<String>,
	/// Confidence from the response.
	pub score: Option<f64>,
}

impl GraphNode {
	pub(crate) fn from_raw(id: NodeId, raw: &RawNode) -> Self {
		Self {
			id,
			original_id: raw.id.clone(),
			node_type: raw.node_type.clone(),
			label: raw.label.clone(),
			description: raw.description.clone(),
			score: raw.score,
		}
	}

	/// Label shown for the node: its label, or the raw id when blank.
	pub fn display_label(&self) -> &str {
		if self.label.is_empty() {
			&self.original_id
		} else {
			&self.label
		}
	}
}

/// Edge of the visible subgraph, keyed `<source>-<relation>-<target>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VisibleEdge {
	/// Stable key, see [`VisibleEdge::edge_id`].
	pub id: String,
	/// Node the edge leaves.
	pub source: NodeId,
	/// Node the edge enters.
	pub target: NodeId,
	/// Relationship tag.
	pub relation: Relation,
}

impl VisibleEdge {
	/// Key for an edge: `<source>-<relation>-<target>`.
	pub fn edge_id(source: &NodeId, relation: &Relation, target: &NodeId) -> String {
		format!("{}-{}-{}", source, relation, target)
	}
}

/// Nodes and edges currently revealed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisibleSubgraph {
	/// Root first, then newly reached nodes in discovery order.
	pub nodes: Vec<GraphNode>,
	/// Edges between revealed nodes, each drawn once.
	pub edges: Vec<VisibleEdge>,
}

impl VisibleSubgraph {
	/// No node is revealed.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Whether `id` is among the revealed nodes.
	pub fn contains(&self, id: &NodeId) -> bool {
		self.nodes.iter().any(|n| &n.id == id)
	}
}

/// Point in graph space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
	/// Horizontal offset; rows are centred on 0.
	pub x: f64,
	/// Grows with depth.
	pub y: f64,
}

/// Visible node with its layered position (node centre).
#[derive(Clone, Debug, PartialEq)]
pub struct PositionedNode {
	/// The placed node.
	pub node: GraphNode,
	/// Breadth-first distance from the root.
	pub depth: usize,
	/// Slot centre.
	pub position: Position,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn response_decodes_known_and_unknown_tags() {
		let body = r#"{
			"nodes": [
				{"id": "Letter-1", "type": "Letter", "label": "Letter 1"},
				{"id": "x", "type": "ORG", "label": "Acme", "score": 0.5}
			],
			"edges": [
				{"source": "Letter-1", "target": "x", "relation": "mentions"}
			]
		}"#;
		let response: GraphResponse = serde_json::from_str(body).unwrap();
		assert_eq!(response.nodes[0].node_type, NodeType::Letter);
		assert_eq!(response.nodes[1].node_type, NodeType::Other("ORG".into()));
		assert_eq!(response.nodes[1].score, Some(0.5));
		assert_eq!(response.edges[0].relation, Relation::Other("mentions".into()));
	}

	#[test]
	fn missing_or_null_fields_still_decode() {
		let body = r#"{
			"nodes": [
				{"id": "Letter-1", "type": "Letter", "label": "Letter"},
				{"type": "PERSON", "label": "Anon"},
				{"id": null, "type": "PERSON"},
				{"id": "x", "label": null},
				{"id": "y", "type": null}
			],
			"edges": [{"source": "Letter-1", "relation": null}]
		}"#;
		let response: GraphResponse = serde_json::from_str(body).unwrap();
		assert_eq!(response.nodes.len(), 5);
		assert_eq!(response.nodes[1].id, "");
		assert_eq!(response.nodes[2].id, "");
		assert_eq!(response.nodes[3].node_type, NodeType::default());
		assert_eq!(response.nodes[3].label, "");
		assert_eq!(response.nodes[4].node_type, NodeType::Other(String::new()));
		assert_eq!(response.edges[0].target, "");
		assert_eq!(response.edges[0].relation, Relation::default());
	}

	#[test]
	fn tags_serialize_back_to_wire_strings() {
		let edge = RawEdge::new("a", "b", "mentioned_together");
		let json = serde_json::to_value(&edge).unwrap();
		assert_eq!(json["relation"], "mentioned_together");

		let node = RawNode::new("a", "FULL_ADDRESS", "1 Main St");
		let json = serde_json::to_value(&node).unwrap();
		assert_eq!(json["type"], "FULL_ADDRESS");
	}

	#[test]
	fn only_mentioned_together_is_symmetric() {
		assert!(Relation::MentionedTogether.is_symmetric());
		assert!(!Relation::SentTo.is_symmetric());
		assert!(!Relation::Other("mentioned together".into()).is_symmetric());
	}

	#[test]
	fn blank_label_falls_back_to_original_id() {
		let node = GraphNode::from_raw(
			NodeId::new_unchecked("a_at_b".into()),
			&RawNode::new("a@b", "EMAIL", ""),
		);
		assert_eq!(node.display_label(), "a@b");
	}
}
