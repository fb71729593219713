use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use leptos::prelude::*;
use log::{debug, error};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, MouseEvent, WheelEvent};

use super::adapter::GraphScene;
use super::render;
use super::state::{CLICK_SLOP, CanvasState};
use super::types::NodeId;

type SharedState = Rc<RefCell<Option<CanvasState>>>;
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

const FALLBACK_SIZE: (f64, f64) = (800.0, 600.0);

/// Run flag and pending request id shared by the frame callback and the
/// unmount cleanup.
#[derive(Clone, Default)]
struct FrameLoop {
	stopped: Arc<AtomicBool>,
	pending: Arc<AtomicI32>,
}

impl FrameLoop {
	fn running(&self) -> bool {
		!self.stopped.load(Ordering::Relaxed)
	}

	fn queued(&self, id: i32) {
		self.pending.store(id, Ordering::Relaxed);
	}

	/// Stops the loop; returns the frame request still to cancel.
	fn stop(&self) -> i32 {
		self.stopped.store(true, Ordering::Relaxed);
		self.pending.load(Ordering::Relaxed)
	}
}

/// Size of the element the canvas fills.
fn parent_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|&(w, h)| w > 0.0 && h > 0.0)
		.unwrap_or(FALLBACK_SIZE)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok()??.dyn_into().ok()
}

/// Pointer position relative to the canvas' top-left corner.
fn canvas_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn set_cursor(canvas_ref: NodeRef<leptos::html::Canvas>, cursor: &str) {
	if let Some(canvas) = canvas_ref.get() {
		let canvas: HtmlCanvasElement = canvas.into();
		let _ = HtmlElement::style(&canvas).set_property("cursor", cursor);
	}
}

/// Canvas view of a [`GraphScene`], sized to its parent element.
///
/// Pan by dragging the background, zoom with the wheel. A click on a node
/// (press and release without dragging) calls `on_node_activated`.
/// Whenever the scene carries a new fit request the view eases to frame
/// every shown node. Unmounting stops the frame loop and the resize
/// listener.
#[component]
pub fn KnowledgeGraphCanvas(
	/// Scene to draw; replaced wholesale on every explorer transition.
	#[prop(into)]
	scene: Signal<GraphScene>,
	/// Called with the id of a clicked node.
	#[prop(into)]
	on_node_activated: Callback<NodeId>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let state_init = state.clone();

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			error!("no window; canvas not started");
			return;
		};

		let (w, h) = parent_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = context_2d(&canvas) else {
			error!("2d canvas context unavailable");
			return;
		};
		let mut initial = CanvasState::new(w, h);
		initial.set_scene(scene.get_untracked());
		*state_init.borrow_mut() = Some(initial);

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		let resize = window_event_listener(leptos::ev::resize, move |_| {
			let (nw, nh) = parent_size(&canvas_resize);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		});

		// The loop only holds a weak handle to itself; the strong one is
		// owned by this effect and dropped with it.
		let frame_loop = FrameLoop::default();
		let frame: FrameCallback = Rc::new(RefCell::new(None));
		let (state_anim, frame_weak) = (state_init.clone(), Rc::downgrade(&frame));
		let loop_anim = frame_loop.clone();
		*frame.borrow_mut() = Some(Closure::new(move || {
			if !loop_anim.running() {
				return;
			}
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(0.016);
				render::render(s, &ctx);
			}
			let Some(frame) = frame_weak.upgrade() else {
				return;
			};
			if let (Some(cb), Some(win)) = (&*frame.borrow(), web_sys::window()) {
				if let Ok(id) = win.request_animation_frame(cb.as_ref().unchecked_ref()) {
					loop_anim.queued(id);
				}
			}
		}));
		if let Some(ref cb) = *frame.borrow() {
			if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
				frame_loop.queued(id);
			}
		}
		StoredValue::new_local(frame);

		on_cleanup(move || {
			let pending = frame_loop.stop();
			if let Some(win) = web_sys::window() {
				let _ = win.cancel_animation_frame(pending);
			}
			resize.remove();
			debug!("canvas unmounted; frame loop stopped");
		});
	});

	let state_scene = state.clone();
	Effect::new(move |_| {
		let next = scene.get();
		if let Some(ref mut s) = *state_scene.borrow_mut() {
			s.set_scene(next);
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.press.active = true;
			s.press.node = s.node_at_position(x, y);
			s.press.start_x = x;
			s.press.start_y = y;
			s.press.moved = false;
			s.begin_pan(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		let over_node = {
			let mut guard = state_mm.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			if s.press.active && !s.press.moved {
				let (dx, dy) = (x - s.press.start_x, y - s.press.start_y);
				s.press.moved = (dx * dx + dy * dy).sqrt() > CLICK_SLOP;
			}

			if s.pan.active && s.press.moved {
				s.transform.x = s.pan.transform_start_x + (x - s.pan.start_x);
				s.transform.y = s.pan.transform_start_y + (y - s.pan.start_y);
			} else if !s.pan.active {
				let hovered = s.node_at_position(x, y);
				s.set_hover(hovered);
			}
			s.hover.node.is_some()
		};
		set_cursor(canvas_ref, if over_node { "pointer" } else { "grab" });
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		let clicked = {
			let mut guard = state_mu.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			let clicked = if s.press.active && !s.press.moved {
				s.press.node.take()
			} else {
				None
			};
			s.press.active = false;
			s.press.node = None;
			s.pan.active = false;
			clicked
		};
		// borrow released: the callback may push a new scene synchronously
		if let Some(id) = clicked {
			debug!("node activated: {}", id);
			on_node_activated.run(id);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.press.active = false;
			s.press.node = None;
			s.pan.active = false;
			s.set_hover(None);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			s.zoom_at(x, y, factor);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="knowledge-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn stopping_the_loop_is_seen_by_every_handle() {
		let frame_loop = FrameLoop::default();
		let in_callback = frame_loop.clone();
		assert!(in_callback.running());

		in_callback.queued(7);
		in_callback.queued(8);
		assert_eq!(frame_loop.stop(), 8);
		assert!(!in_callback.running());
	}

	#[test]
	fn separate_mounts_do_not_share_a_loop() {
		let first = FrameLoop::default();
		let second = FrameLoop::default();
		first.stop();
		assert!(second.running());
	}
}
