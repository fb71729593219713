//! Client for the text-extraction backend.
//!
//! Uses web-sys fetch on wasm32, reqwest elsewhere.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;
use serde::Serialize;

use super::error::ExplorerError;
use super::types::GraphResponse;

#[derive(Serialize)]
struct ExtractRequest<'a> {
	text: &'a str,
}

/// Posts `{"text": ...}` to the extraction endpoint.
#[derive(Clone, Debug)]
pub struct ExtractionClient {
	endpoint: String,
}

impl ExtractionClient {
	/// Client for the given URL.
	pub fn new(endpoint: &str) -> Self {
		Self {
			endpoint: endpoint.to_string(),
		}
	}

	/// URL requests go to.
	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}

	/// Extract a graph from `text`.
	#[cfg(target_arch = "wasm32")]
	pub async fn extract(&self, text: &str) -> Result<GraphResponse, ExplorerError> {
		use wasm_bindgen::{JsCast, JsValue};
		use wasm_bindgen_futures::JsFuture;
		use web_sys::{Request, RequestInit, RequestMode, Response};

		let body = serde_json::to_string(&ExtractRequest { text })
			.map_err(|e| ExplorerError::Request(e.to_string()))?;

		let opts = RequestInit::new();
		opts.set_method("POST");
		opts.set_mode(RequestMode::Cors);
		opts.set_body(&JsValue::from_str(&body));

		let request = Request::new_with_str_and_init(&self.endpoint, &opts)
			.map_err(|e| ExplorerError::Request(format!("{:?}", e)))?;
		request
			.headers()
			.set("Content-Type", "application/json")
			.map_err(|e| ExplorerError::Request(format!("{:?}", e)))?;

		let window = web_sys::window().ok_or_else(|| ExplorerError::Request("no window".into()))?;
		debug!("POST {} ({} bytes)", self.endpoint, body.len());
		let resp_value = JsFuture::from(window.fetch_with_request(&request))
			.await
			.map_err(|e| ExplorerError::Network(format!("{:?}", e)))?;
		let resp: Response = resp_value
			.dyn_into()
			.map_err(|_| ExplorerError::Network("response is not a Response".into()))?;

		let text_promise = resp
			.text()
			.map_err(|e| ExplorerError::Network(format!("{:?}", e)))?;
		let text = JsFuture::from(text_promise)
			.await
			.map_err(|e| ExplorerError::Network(format!("{:?}", e)))?
			.as_string()
			.unwrap_or_default();

		decode_response(resp.status(), &text)
	}

	/// Extract a graph from `text`.
	#[cfg(not(target_arch = "wasm32"))]
	pub async fn extract(&self, text: &str) -> Result<GraphResponse, ExplorerError> {
		debug!("POST {}", self.endpoint);
		let response = reqwest::Client::new()
			.post(&self.endpoint)
			.json(&ExtractRequest { text })
			.send()
			.await
			.map_err(|e| ExplorerError::Network(e.to_string()))?;

		let status = response.status().as_u16();
		let body = response
			.text()
			.await
			.map_err(|e| ExplorerError::Network(e.to_string()))?;
		decode_response(status, &body)
	}
}

/// Map a finished HTTP exchange onto a graph or an error.
pub fn decode_response(status: u16, body: &str) -> Result<GraphResponse, ExplorerError> {
	if !(200..300).contains(&status) {
		return Err(ExplorerError::Http {
			status,
			body: body.trim().to_string(),
		});
	}
	Ok(serde_json::from_str(body)?)
}

/// Ticket handed out per submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestTicket(u64);

impl RequestTicket {
	/// Generation number, also used as the session id.
	pub fn generation(self) -> u64 {
		self.0
	}
}

/// Generation counter so only the latest submission's response applies.
#[derive(Clone, Debug, Default)]
pub struct RequestTracker {
	latest: Arc<AtomicU64>,
}

impl RequestTracker {
	/// Start a submission; any earlier ticket becomes stale.
	pub fn begin(&self) -> RequestTicket {
		RequestTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
	}

	/// No submission was started after `ticket`.
	pub fn is_current(&self, ticket: RequestTicket) -> bool {
		self.latest.load(Ordering::SeqCst) == ticket.0
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::knowledge_graph::index::GraphIndex;
	use crate::components::knowledge_graph::types::NodeType;

	#[test]
	fn later_request_supersedes_earlier() {
		let tracker = RequestTracker::default();
		let first = tracker.begin();
		assert!(tracker.is_current(first));

		let second = tracker.clone().begin();
		assert!(!tracker.is_current(first));
		assert!(tracker.is_current(second));
		assert!(second.generation() > first.generation());
	}

	#[test]
	fn success_body_decodes() {
		let body = r#"{"nodes":[{"id":"a","type":"PERSON","label":"A"}],"edges":[]}"#;
		let graph = decode_response(200, body).unwrap();
		assert_eq!(graph.nodes.len(), 1);
		assert!(graph.edges.is_empty());
	}

	#[test]
	fn node_without_id_still_yields_a_graph() {
		let body = r#"{
			"nodes": [
				{"id": "Letter-1", "type": "Letter", "label": "Letter"},
				{"type": "PERSON", "label": "Anon"},
				{"id": "Bob"}
			],
			"edges": [{"source": "Letter-1", "target": "Bob", "relation": "sent_to"}]
		}"#;
		let graph = decode_response(200, body).unwrap();
		let index = GraphIndex::build(&graph.nodes, &graph.edges);

		let anon = index.id_of("").cloned().unwrap();
		assert_eq!(anon.as_str(), "unknown");
		assert_eq!(index.node(&anon).unwrap().label, "Anon");
		let bob = index.id_of("Bob").cloned().unwrap();
		assert_eq!(index.node(&bob).unwrap().node_type, NodeType::default());
		assert_eq!(index.node_count(), 3);
	}

	#[test]
	fn null_id_decodes_as_blank() {
		let body = r#"{"nodes": [{"id": null, "type": "PERSON"}], "edges": []}"#;
		let graph = decode_response(200, body).unwrap();
		assert_eq!(graph.nodes[0].id, "");
	}

	#[test]
	fn non_success_status_is_http_error() {
		let err = decode_response(500, "  internal error\n").unwrap_err();
		assert_eq!(
			err,
			ExplorerError::Http {
				status: 500,
				body: "internal error".into()
			}
		);
	}

	#[test]
	fn malformed_body_is_decode_error() {
		assert!(matches!(
			decode_response(200, "<html>"),
			Err(ExplorerError::Decode(_))
		));
	}

	#[test]
	fn request_body_shape() {
		let json = serde_json::to_value(ExtractRequest { text: "Dear Bob" }).unwrap();
		assert_eq!(json, serde_json::json!({ "text": "Dear Bob" }));
	}
}
