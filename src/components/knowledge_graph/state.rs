use std::collections::HashSet;

use super::adapter::{FitRequest, GraphScene};
use super::render::ease_out_cubic;
use super::types::NodeId;

pub const NODE_RADIUS: f64 = 44.0;
pub const HIT_RADIUS: f64 = NODE_RADIUS;
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 4.0;
/// Screen pixels a press may travel and still count as a click.
pub const CLICK_SLOP: f64 = 4.0;

const FIT_PADDING: f64 = 0.2;
const FIT_DURATION: f64 = 0.8;
const INITIAL_ZOOM: f64 = 0.8;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl ViewTransform {
	fn lerp(&self, to: &ViewTransform, t: f64) -> ViewTransform {
		ViewTransform {
			x: self.x + (to.x - self.x) * t,
			y: self.y + (to.y - self.y) * t,
			k: self.k + (to.k - self.k) * t,
		}
	}
}

#[derive(Clone, Debug, Default)]
pub struct PressState {
	pub active: bool,
	pub node: Option<NodeId>,
	pub start_x: f64,
	pub start_y: f64,
	pub moved: bool,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<NodeId>,
	pub neighbors: HashSet<NodeId>,
	pub highlight_t: f64,
	pub prev_node: Option<NodeId>,
	pub prev_neighbors: HashSet<NodeId>,
	delay_t: f64,
}

#[derive(Clone, Debug)]
struct FitAnimation {
	from: ViewTransform,
	to: ViewTransform,
	t: f64,
}

/// Canvas-side view of the explorer: the current scene plus pan, zoom,
/// hover and pending-click state.
pub struct CanvasState {
	pub scene: GraphScene,
	pub transform: ViewTransform,
	pub press: PressState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
	fit: Option<FitAnimation>,
	last_fit: Option<FitRequest>,
}

impl CanvasState {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			scene: GraphScene::default(),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: INITIAL_ZOOM,
			},
			press: PressState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			flow_time: 0.0,
			fit: None,
			last_fit: None,
		}
	}

	/// Swap in a new scene; a fit request not seen before starts a fit.
	pub fn set_scene(&mut self, scene: GraphScene) {
		let fit = scene.fit;
		self.scene = scene;

		if let Some(hovered) = self.hover.node.clone() {
			if self.visible_node(&hovered) {
				self.hover.neighbors = self.neighbors_of(&hovered);
			} else {
				self.set_hover(None);
			}
		}

		if self.last_fit != Some(fit) && !self.scene.nodes.is_empty() {
			self.last_fit = Some(fit);
			self.start_fit();
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	fn visible_node(&self, id: &NodeId) -> bool {
		self.scene.node(id).is_some_and(|n| !n.hidden)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<NodeId> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		// topmost first: nodes are drawn in scene order
		self.scene
			.nodes
			.iter()
			.rev()
			.filter(|n| !n.hidden)
			.find(|n| {
				let (dx, dy) = (n.x - gx, n.y - gy);
				(dx * dx + dy * dy).sqrt() < HIT_RADIUS
			})
			.map(|n| n.id.clone())
	}

	fn neighbors_of(&self, id: &NodeId) -> HashSet<NodeId> {
		let mut neighbors = HashSet::new();
		for edge in self.scene.edges.iter().filter(|e| !e.hidden) {
			if &edge.source == id {
				neighbors.insert(edge.target.clone());
			} else if &edge.target == id {
				neighbors.insert(edge.source.clone());
			}
		}
		neighbors
	}

	pub fn set_hover(&mut self, node: Option<NodeId>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// keep the old highlight around while it fades out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.neighbors.clear();
		if let Some(id) = &node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			self.hover.neighbors = self.neighbors_of(id);
		}
		self.hover.node = node;
	}

	pub fn is_highlighted(&self, id: &NodeId) -> bool {
		self.hover.node.as_ref() == Some(id)
			|| self.hover.neighbors.contains(id)
			|| self.hover.prev_node.as_ref() == Some(id)
			|| self.hover.prev_neighbors.contains(id)
	}

	pub fn is_hovered(&self, id: &NodeId) -> bool {
		self.hover.node.as_ref() == Some(id) || self.hover.prev_node.as_ref() == Some(id)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	/// Transform that frames every shown node with some padding.
	pub fn fit_transform(&self) -> ViewTransform {
		let mut shown = self.scene.nodes.iter().filter(|n| !n.hidden).peekable();
		if shown.peek().is_none() {
			return ViewTransform {
				x: self.width / 2.0,
				y: self.height / 2.0,
				k: INITIAL_ZOOM,
			};
		}

		let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
		let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
		for n in shown {
			min_x = min_x.min(n.x - NODE_RADIUS);
			min_y = min_y.min(n.y - NODE_RADIUS);
			max_x = max_x.max(n.x + NODE_RADIUS);
			max_y = max_y.max(n.y + NODE_RADIUS);
		}

		let (w, h) = (max_x - min_x, max_y - min_y);
		let k = (self.width / (w * (1.0 + FIT_PADDING)))
			.min(self.height / (h * (1.0 + FIT_PADDING)))
			.clamp(MIN_ZOOM, MAX_ZOOM);
		let (cx, cy) = ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);
		ViewTransform {
			x: self.width / 2.0 - cx * k,
			y: self.height / 2.0 - cy * k,
			k,
		}
	}

	pub fn start_fit(&mut self) {
		self.fit = Some(FitAnimation {
			from: self.transform,
			to: self.fit_transform(),
			t: 0.0,
		});
	}

	#[cfg(test)]
	fn is_fitting(&self) -> bool {
		self.fit.is_some()
	}

	/// Zoom by `factor` keeping the screen point under the cursor fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		self.fit = None;
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn begin_pan(&mut self, sx: f64, sy: f64) {
		self.fit = None;
		self.pan = PanState {
			active: true,
			start_x: sx,
			start_y: sy,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	pub fn tick(&mut self, dt: f64) {
		self.flow_time += dt;

		if let Some(fit) = &mut self.fit {
			fit.t = (fit.t + dt / FIT_DURATION).min(1.0);
			if fit.t >= 1.0 {
				self.transform = fit.to;
				self.fit = None;
			} else {
				self.transform = fit.from.lerp(&fit.to, ease_out_cubic(fit.t));
			}
		}

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}
