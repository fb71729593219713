//! Render-safe node identifiers.
//!
//! Extracted ids are emails, free text and the like. The renderer keys
//! nodes by id, so every raw id is rewritten to `[A-Za-z0-9_-]+` and a
//! reverse table keeps the original for display.

use std::collections::HashMap;

use log::warn;

use super::error::IndexWarning;
use super::types::NodeId;

const FALLBACK_ID: &str = "unknown";

/// Rewrite `raw` into the restricted id charset.
pub fn sanitize(raw: &str) -> String {
	if raw.is_empty() {
		return FALLBACK_ID.to_string();
	}

	let mut out = String::with_capacity(raw.len());
	let mut in_whitespace = false;
	for c in raw.chars() {
		if c.is_whitespace() {
			if !in_whitespace {
				out.push('_');
			}
			in_whitespace = true;
			continue;
		}
		in_whitespace = false;
		match c {
			'@' => out.push_str("_at_"),
			'.' => out.push_str("_dot_"),
			':' => out.push_str("_colon_"),
			'/' => out.push_str("_slash_"),
			c if c.is_ascii_alphanumeric() || c == '_' || c == '-' => out.push(c),
			_ => out.push('_'),
		}
	}
	out
}

/// Session-scoped mapping between raw ids and sanitized ids.
///
/// Two raw ids that sanitize to the same string get distinct ids: the
/// later one receives a `-2`, `-3`, ... suffix.
#[derive(Clone, Debug, Default)]
pub struct IdMapping {
	forward: HashMap<String, NodeId>,
	reverse: HashMap<NodeId, String>,
}

impl IdMapping {
	/// Assign (or return the existing) id for `raw`.
	pub fn assign(&mut self, raw: &str, warnings: &mut Vec<IndexWarning>) -> NodeId {
		if let Some(id) = self.forward.get(raw) {
			return id.clone();
		}

		let base = sanitize(raw);
		let mut candidate = base.clone();
		let mut suffix = 2;
		while self.reverse.contains_key(candidate.as_str()) {
			candidate = format!("{}-{}", base, suffix);
			suffix += 1;
		}

		if candidate != base {
			let warning = IndexWarning::SanitizationCollision {
				original: raw.to_string(),
				sanitized: base,
				assigned: candidate.clone(),
			};
			warn!("{}", warning);
			warnings.push(warning);
		}

		let id = NodeId::new_unchecked(candidate);
		self.forward.insert(raw.to_string(), id.clone());
		self.reverse.insert(id.clone(), raw.to_string());
		id
	}

	pub fn get(&self, raw: &str) -> Option<&NodeId> {
		self.forward.get(raw)
	}

	/// Original raw id for a sanitized id.
	pub fn original(&self, id: &NodeId) -> Option<&str> {
		self.reverse.get(id).map(String::as_str)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn is_safe(id: &str) -> bool {
		!id.is_empty()
			&& id
				.chars()
				.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
	}

	#[test]
	fn replaces_reserved_characters() {
		assert_eq!(sanitize("alice@x.com"), "alice_at_x_dot_com");
		assert_eq!(sanitize("urn:a/b"), "urn_colon_a_slash_b");
		assert_eq!(sanitize("John   Smith"), "John_Smith");
		assert_eq!(sanitize("a\t\nb"), "a_b");
		assert_eq!(sanitize("(555) 123-4567"), "_555__123-4567");
		assert_eq!(sanitize("Letter-1"), "Letter-1");
	}

	#[test]
	fn empty_input_uses_fallback() {
		assert_eq!(sanitize(""), "unknown");
	}

	#[test]
	fn output_is_always_in_charset() {
		for raw in ["", " ", "ünïcödé", "a.b@c:d/e f", "#$%^&*", "日本語", "x_y-z"] {
			assert!(is_safe(&sanitize(raw)), "{raw:?} -> {:?}", sanitize(raw));
		}
	}

	#[test]
	fn sanitize_is_deterministic() {
		assert_eq!(sanitize("bob@y.org"), sanitize("bob@y.org"));
	}

	#[test]
	fn mapping_round_trips() {
		let mut warnings = Vec::new();
		let mut mapping = IdMapping::default();
		for raw in ["alice@x.com", "Letter-1", "12 Main St.", ""] {
			let id = mapping.assign(raw, &mut warnings);
			assert_eq!(mapping.original(&id), Some(raw));
		}
		assert!(warnings.is_empty());
	}

	#[test]
	fn repeated_raw_id_reuses_assignment() {
		let mut warnings = Vec::new();
		let mut mapping = IdMapping::default();
		let first = mapping.assign("a@b", &mut warnings);
		let second = mapping.assign("a@b", &mut warnings);
		assert_eq!(first, second);
		assert!(warnings.is_empty());
	}

	#[test]
	fn collisions_get_numeric_suffix() {
		let mut warnings = Vec::new();
		let mut mapping = IdMapping::default();
		let a = mapping.assign("a b", &mut warnings);
		let b = mapping.assign("a\tb", &mut warnings);
		let c = mapping.assign("a,b", &mut warnings);

		assert_eq!(a.as_str(), "a_b");
		assert_eq!(b.as_str(), "a_b-2");
		assert_eq!(c.as_str(), "a_b-3");
		assert_eq!(mapping.original(&b), Some("a\tb"));
		assert_eq!(warnings.len(), 2);
		assert!(matches!(
			&warnings[0],
			IndexWarning::SanitizationCollision { assigned, .. } if assigned == "a_b-2"
		));
	}
}
