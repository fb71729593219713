use super::layout::LayeredLayout;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8001/process";

/// Settings of the explorer page.
#[derive(Clone, Debug, PartialEq)]
pub struct ExplorerConfig {
	/// Extraction endpoint receiving `{"text": ...}`.
	pub endpoint: String,
	/// Slot sizes for the layered layout.
	pub layout: LayeredLayout,
}

impl Default for ExplorerConfig {
	fn default() -> Self {
		Self {
			endpoint: DEFAULT_ENDPOINT.to_string(),
			layout: LayeredLayout::default(),
		}
	}
}

impl ExplorerConfig {
	/// Build-time configuration; `GRAPH_API_URL` overrides the endpoint.
	pub fn from_env() -> Self {
		Self::with_endpoint(option_env!("GRAPH_API_URL"))
	}

	fn with_endpoint(endpoint: Option<&str>) -> Self {
		match endpoint.map(str::trim).filter(|e| !e.is_empty()) {
			Some(endpoint) => Self {
				endpoint: endpoint.to_string(),
				..Self::default()
			},
			None => Self::default(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn blank_override_keeps_default() {
		assert_eq!(ExplorerConfig::with_endpoint(None).endpoint, DEFAULT_ENDPOINT);
		assert_eq!(ExplorerConfig::with_endpoint(Some("  ")).endpoint, DEFAULT_ENDPOINT);
	}

	#[test]
	fn override_replaces_endpoint_only() {
		let config = ExplorerConfig::with_endpoint(Some("https://api.example.com/process "));
		assert_eq!(config.endpoint, "https://api.example.com/process");
		assert_eq!(config.layout, LayeredLayout::default());
	}
}
