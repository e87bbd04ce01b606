//! Leptos component mounting a [`GraphCanvas`] on an HTML canvas element.
//!
//! The component forwards mouse and wheel input to the engine and drives it
//! from a `requestAnimationFrame` loop. New values of the `data` signal are
//! pushed with [`GraphCanvas::set_data`]; rejected snapshots are logged and the
//! previous graph stays on screen.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::canvas::GraphCanvas;
use super::config::{ConfigPatch, PointerEvent};
use super::theme::ThemeMode;
use super::types::{GraphData, TextPriority};

/// Upper bound for one frame step, so a backgrounded tab does not jump.
const MAX_FRAME_MS: f64 = 100.0;
const FALLBACK_SIZE: (f64, f64) = (800.0, 600.0);

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn prefers_dark(window: &Window) -> bool {
	window
		.match_media("(prefers-color-scheme: dark)")
		.ok()
		.flatten()
		.is_some_and(|query| query.matches())
}

/// Pointer position relative to the canvas' top-left corner.
fn pointer_event(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> PointerEvent {
	let rect = canvas.get_bounding_client_rect();
	PointerEvent {
		x: ev.client_x() as f64 - rect.left(),
		y: ev.client_y() as f64 - rect.top(),
		ctrl_key: ev.ctrl_key(),
	}
}

/// Renders an interactive graph on a canvas element.
///
/// The canvas sizes itself to its parent unless `width`/`height` are given;
/// `fullscreen = true` fills the window and follows resizes. Callbacks and
/// selection predicates are passed through `config`.
#[component]
pub fn GraphCanvasView(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(default = ThemeMode::System)] theme: ThemeMode,
	#[prop(default = Vec::new())] display_text_priority: Vec<TextPriority>,
	#[prop(default = None)] cooldown_ticks: Option<u32>,
	#[prop(default = ConfigPatch::default())] config: ConfigPatch,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let engine = Rc::new(RefCell::new(GraphCanvas::new(ConfigPatch {
		theme: Some(theme),
		display_text_priority: Some(display_text_priority),
		cooldown_ticks: Some(cooldown_ticks),
		..config
	})));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

	let engine_data = engine.clone();
	Effect::new(move |_| {
		let snapshot = data.get();
		if let Err(err) = engine_data.borrow_mut().set_data(snapshot) {
			warn!("graph-canvas: keeping previous graph: {err}");
		}
	});

	let (engine_init, animate_init, resize_cb_init) =
		(engine.clone(), animate.clone(), resize_cb.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or(FALLBACK_SIZE)
		} else {
			let parent = canvas.parent_element();
			(
				width.unwrap_or_else(|| {
					parent
						.as_ref()
						.map_or(FALLBACK_SIZE.0, |p| p.client_width() as f64)
				}),
				height.unwrap_or_else(|| {
					parent
						.as_ref()
						.map_or(FALLBACK_SIZE.1, |p| p.client_height() as f64)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("graph-canvas: 2d context unavailable");
			return;
		};

		engine_init.borrow_mut().set_config(ConfigPatch {
			prefers_dark: Some(prefers_dark(&window)),
			..ConfigPatch::new().size(w, h)
		});

		if fullscreen {
			let (engine_resize, canvas_resize) = (engine_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				engine_resize
					.borrow_mut()
					.set_config(ConfigPatch::new().size(nw, nh));
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (engine_anim, animate_inner) = (engine_init.clone(), animate_init.clone());
		let mut last_frame = js_sys::Date::now();
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			let now = js_sys::Date::now();
			let dt = (now - last_frame).clamp(0.0, MAX_FRAME_MS);
			last_frame = now;
			engine_anim.borrow_mut().frame(&ctx, dt);
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let with_pointer = move |ev: &MouseEvent, f: &dyn Fn(PointerEvent)| {
		if let Some(canvas) = canvas_ref.get() {
			let canvas: HtmlCanvasElement = canvas.into();
			f(pointer_event(&canvas, ev));
		}
	};

	let engine_md = engine.clone();
	let on_mousedown = move |ev: MouseEvent| {
		with_pointer(&ev, &|p| engine_md.borrow_mut().pointer_down(p));
	};

	let engine_mm = engine.clone();
	let on_mousemove = move |ev: MouseEvent| {
		with_pointer(&ev, &|p| engine_mm.borrow_mut().pointer_move(p));
	};

	let engine_mu = engine.clone();
	let on_mouseup = move |ev: MouseEvent| {
		with_pointer(&ev, &|p| engine_mu.borrow_mut().pointer_up(p));
	};

	let engine_ml = engine.clone();
	let on_mouseleave = move |_: MouseEvent| {
		engine_ml.borrow_mut().pointer_leave();
	};

	let engine_click = engine.clone();
	let on_click = move |ev: MouseEvent| {
		with_pointer(&ev, &|p| engine_click.borrow_mut().click(p));
	};

	let engine_ctx = engine.clone();
	let on_contextmenu = move |ev: MouseEvent| {
		ev.prevent_default();
		with_pointer(&ev, &|p| engine_ctx.borrow_mut().right_click(p));
	};

	let engine_wh = engine.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let delta = ev.delta_y();
		let mouse: &MouseEvent = ev.as_ref();
		with_pointer(mouse, &|p| engine_wh.borrow_mut().wheel(p, delta));
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:click=on_click
			on:contextmenu=on_contextmenu
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
