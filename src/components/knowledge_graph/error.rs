use thiserror::Error;

use super::types::Relation;

/// Failure while asking the extraction backend for a graph.
///
/// None of these touch the current session; the user can resubmit.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ExplorerError {
	/// The request could not be built or sent.
	#[error("could not build request: {0}")]
	Request(String),
	/// No response arrived.
	#[error("network error: {0}")]
	Network(String),
	/// Non-2xx status.
	#[error("HTTP error! status: {status}{}", body_suffix(.body))]
	Http {
		/// HTTP status code.
		status: u16,
		/// Response body, possibly empty.
		body: String,
	},
	/// The body is not a graph.
	#[error("invalid graph response: {0}")]
	Decode(String),
}

fn body_suffix(body: &str) -> String {
	if body.is_empty() {
		String::new()
	} else {
		format!(" ({body})")
	}
}

impl From<serde_json::Error> for ExplorerError {
	fn from(err: serde_json::Error) -> Self {
		ExplorerError::Decode(err.to_string())
	}
}

/// Non-fatal problems found while indexing a response.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum IndexWarning {
	/// An edge endpoint is not in the node list; the edge is skipped.
	#[error("dropping edge {from} -[{relation}]-> {to}: endpoint not in node list")]
	MalformedEdge {
		/// Raw source id.
		from: String,
		/// Raw target id.
		to: String,
		/// Relation of the skipped edge.
		relation: Relation,
	},
	/// Two raw ids sanitize alike; the later one got a suffix.
	#[error("id {original:?} sanitizes to {sanitized:?}, already taken; using {assigned:?}")]
	SanitizationCollision {
		/// Raw id of the later node.
		original: String,
		/// Id both raw ids sanitize to.
		sanitized: String,
		/// Id handed out instead.
		assigned: String,
	},
	/// The same raw id appears twice.
	#[error("duplicate node id {original:?}; keeping the later entry")]
	DuplicateNode {
		/// The repeated raw id.
		original: String,
	},
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn http_error_mentions_status_and_body() {
		let err = ExplorerError::Http {
			status: 502,
			body: "bad gateway".into(),
		};
		assert_eq!(err.to_string(), "HTTP error! status: 502 (bad gateway)");

		let err = ExplorerError::Http {
			status: 500,
			body: String::new(),
		};
		assert_eq!(err.to_string(), "HTTP error! status: 500");
	}

	#[test]
	fn json_errors_become_decode_errors() {
		let err: ExplorerError = serde_json::from_str::<serde_json::Value>("{")
			.unwrap_err()
			.into();
		assert!(matches!(err, ExplorerError::Decode(_)));
	}
}
