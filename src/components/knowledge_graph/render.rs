use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::adapter::{RenderEdge, RenderNode};
use super::state::{CanvasState, NODE_RADIUS};
use super::style::Marker;

const BACKGROUND: &str = "#111827";
const CAPTION_BACKGROUND: &str = "#1f2937";
const SELECTED_RING: &str = "#6366f1";
const HIGHLIGHT_RING: &str = "#facc15";
const DIMMED_ALPHA: f64 = 0.3;
const SELECTED_SCALE: f64 = 1.1;
const FLOW_SPEED: f64 = 30.0;

pub(crate) fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

fn set_dash(ctx: &CanvasRenderingContext2d, dash: Option<(f64, f64)>) {
	let pattern = match dash {
		Some((on, off)) => js_sys::Array::of2(&JsValue::from_f64(on), &JsValue::from_f64(off)),
		None => js_sys::Array::new(),
	};
	let _ = ctx.set_line_dash(&pattern);
}

pub fn render(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
	draw_tooltip(state, ctx);
}

fn draw_edges(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	let t = ease_out_cubic(state.hover.highlight_t);
	let has_highlight = state.has_active_highlight();

	for edge in state.scene.edges.iter().filter(|e| !e.hidden) {
		let (Some(from), Some(to)) = (state.scene.node(&edge.source), state.scene.node(&edge.target))
		else {
			continue;
		};
		let (dx, dy) = (to.x - from.x, to.y - from.y);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}

		let lit = state.is_highlighted(&from.id) && state.is_highlighted(&to.id);
		let alpha = match (has_highlight, lit) {
			(false, _) => 0.85,
			(true, true) => 0.85 + 0.15 * t,
			(true, false) => 0.85 - 0.6 * t,
		};
		draw_edge(state, ctx, edge, from, to, alpha);
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_edge(
	state: &CanvasState,
	ctx: &CanvasRenderingContext2d,
	edge: &RenderEdge,
	from: &RenderNode,
	to: &RenderNode,
	alpha: f64,
) {
	let style = edge.style;
	let arrow_size = 8.0 + style.width * 2.0;
	let (dx, dy) = (to.x - from.x, to.y - from.y);
	let dist = (dx * dx + dy * dy).sqrt();
	let (ux, uy) = (dx / dist, dy / dist);

	ctx.set_global_alpha(alpha);
	ctx.set_stroke_style_str(style.stroke);
	ctx.set_line_width(style.width);

	// animated edges crawl along a short dash regardless of their own pattern
	let dash = match (style.dash, style.animated) {
		(_, true) => Some(style.dash.unwrap_or((8.0, 4.0))),
		(dash, false) => dash,
	};
	set_dash(ctx, dash);
	if style.animated {
		let period = dash.map(|(on, off)| on + off).unwrap_or(12.0);
		ctx.set_line_dash_offset(-(state.flow_time * FLOW_SPEED) % period);
	} else {
		ctx.set_line_dash_offset(0.0);
	}

	ctx.begin_path();
	ctx.move_to(from.x + ux * NODE_RADIUS, from.y + uy * NODE_RADIUS);
	ctx.line_to(
		to.x - ux * (NODE_RADIUS + arrow_size * 0.5),
		to.y - uy * (NODE_RADIUS + arrow_size * 0.5),
	);
	ctx.stroke();

	set_dash(ctx, None);
	let (tip_x, tip_y) = (to.x - ux * NODE_RADIUS, to.y - uy * NODE_RADIUS);
	let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
	let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
	ctx.begin_path();
	ctx.move_to(back_x + px, back_y + py);
	ctx.line_to(tip_x, tip_y);
	ctx.line_to(back_x - px, back_y - py);
	match style.marker {
		Marker::ArrowClosed => {
			ctx.close_path();
			ctx.set_fill_style_str(style.stroke);
			ctx.fill();
		}
		Marker::Arrow => ctx.stroke(),
	}

	draw_caption(ctx, &edge.caption, (from.x + to.x) / 2.0, (from.y + to.y) / 2.0);
	ctx.set_global_alpha(1.0);
}

fn draw_caption(ctx: &CanvasRenderingContext2d, caption: &str, x: f64, y: f64) {
	ctx.set_font("10px sans-serif");
	let width = ctx
		.measure_text(caption)
		.map(|m| m.width())
		.unwrap_or(caption.len() as f64 * 6.0);
	ctx.set_fill_style_str(CAPTION_BACKGROUND);
	ctx.fill_rect(x - width / 2.0 - 3.0, y - 8.0, width + 6.0, 14.0);
	ctx.set_fill_style_str("#e5e7eb");
	ctx.set_text_align("center");
	let _ = ctx.fill_text(caption, x, y + 3.0);
	ctx.set_text_align("start");
}

fn draw_nodes(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	let t = ease_out_cubic(state.hover.highlight_t);
	let has_highlight = state.has_active_highlight();

	for node in state.scene.nodes.iter().filter(|n| !n.hidden) {
		let hovered = state.is_hovered(&node.id);
		let lit = state.is_highlighted(&node.id);

		let mut radius = NODE_RADIUS;
		if node.selected {
			radius *= SELECTED_SCALE;
		}
		if hovered {
			radius *= 1.0 + 0.1 * t;
		}

		let mut alpha = if node.dimmed { DIMMED_ALPHA } else { 1.0 };
		if has_highlight && !lit {
			alpha *= 1.0 - 0.6 * t;
		}
		ctx.set_global_alpha(alpha);

		if hovered && t > 0.01 {
			draw_glow(ctx, node.x, node.y, radius, t);
		}

		ctx.begin_path();
		let _ = ctx.arc(node.x, node.y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(node.color);
		ctx.fill();

		if node.selected {
			ring(ctx, node.x, node.y, radius + 3.0, SELECTED_RING, 3.0);
		}
		if node.highlighted {
			ring(ctx, node.x, node.y, radius + if node.selected { 8.0 } else { 3.0 }, HIGHLIGHT_RING, 3.0);
		}

		ctx.set_fill_style_str("white");
		ctx.set_font(if node.expanded { "bold 12px sans-serif" } else { "12px sans-serif" });
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");
		let _ = ctx.fill_text(&node.label, node.x, node.y);
		ctx.set_text_align("start");
		ctx.set_text_baseline("alphabetic");
		ctx.set_global_alpha(1.0);
	}
}

fn ring(ctx: &CanvasRenderingContext2d, x: f64, y: f64, radius: f64, color: &str, width: f64) {
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.set_stroke_style_str(color);
	ctx.set_line_width(width);
	ctx.stroke();
}

fn draw_glow(ctx: &CanvasRenderingContext2d, x: f64, y: f64, radius: f64, t: f64) {
	let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.5, x, y, radius * 1.6) else {
		return;
	};
	let stops = [
		(0.0, format!("rgba(255, 255, 255, {})", 0.3 * t)),
		(1.0, "rgba(255, 255, 255, 0)".to_string()),
	];
	if stops
		.iter()
		.any(|(offset, color)| gradient.add_color_stop(*offset as f32, color).is_err())
	{
		return;
	}
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius * 1.6, 0.0, 2.0 * PI);
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill();
}

/// Lines shown when hovering a node.
pub fn tooltip_lines(node: &RenderNode) -> Vec<String> {
	let mut lines = vec![node.full_label.clone(), format!("Type: {}", node.node_type)];
	if let Some(description) = node.description.as_deref().filter(|d| !d.is_empty()) {
		lines.push(description.to_string());
	}
	if let Some(score) = node.score {
		lines.push(format!("Score: {:.0}%", score * 100.0));
	}
	lines
}

fn draw_tooltip(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	let Some(node) = state.hover.node.as_ref().and_then(|id| state.scene.node(id)) else {
		return;
	};
	let lines = tooltip_lines(node);

	let (sx, sy) = (
		node.x * state.transform.k + state.transform.x,
		node.y * state.transform.k + state.transform.y,
	);
	ctx.set_font("12px sans-serif");
	let width = lines
		.iter()
		.filter_map(|l| ctx.measure_text(l).ok().map(|m| m.width()))
		.fold(0.0, f64::max)
		+ 16.0;
	let height = lines.len() as f64 * 16.0 + 10.0;
	let x = (sx + NODE_RADIUS * state.transform.k + 8.0).min(state.width - width - 4.0).max(4.0);
	let y = (sy - height / 2.0).clamp(4.0, (state.height - height - 4.0).max(4.0));

	ctx.set_global_alpha(0.95);
	ctx.set_fill_style_str(CAPTION_BACKGROUND);
	ctx.fill_rect(x, y, width, height);
	ctx.set_stroke_style_str("#4b5563");
	ctx.set_line_width(1.0);
	ctx.stroke_rect(x, y, width, height);
	ctx.set_global_alpha(1.0);

	ctx.set_fill_style_str("#f9fafb");
	for (i, line) in lines.iter().enumerate() {
		let _ = ctx.fill_text(line, x + 8.0, y + 18.0 + i as f64 * 16.0);
	}
}
