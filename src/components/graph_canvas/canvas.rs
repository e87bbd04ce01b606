//! The `GraphCanvas` facade: one engine per mounted drawing surface.
//!
//! Hosts configure it with [`ConfigPatch`]es, push snapshots with
//! [`GraphCanvas::set_data`], forward pointer input and call
//! [`GraphCanvas::frame`] once per animation frame.

use log::{debug, info, warn};

use super::adapter::NodeHandle;
use super::config::{CanvasConfig, ConfigPatch, PointerEvent};
use super::error::Result;
use super::forces::ForceConstants;
use super::render::{RenderStyle, Renderer, Scene};
use super::simulation::TickOutcome;
use super::state::{Element, FIT_DURATION_MS, GraphState};
use super::surface::Surface;
use super::types::{GraphData, GraphNode};

/// Fraction of the smaller surface side used as zoom-to-fit padding.
const FIT_PADDING_RATIO: f64 = 0.1;
/// Padding multiplier for graphs with fewer than two nodes.
const SPARSE_FIT_MULTIPLIER: f64 = 4.0;
/// Host padding values are relative to this base.
const FIT_PADDING_BASE: f64 = 50.0;
const WHEEL_ZOOM_IN: f64 = 1.1;
const WHEEL_ZOOM_OUT: f64 = 0.9;

/// Interactive graph engine bound to one drawing surface.
pub struct GraphCanvas {
	config: CanvasConfig,
	constants: ForceConstants,
	style: RenderStyle,
	state: GraphState,
	renderer: Renderer,
}

impl Default for GraphCanvas {
	fn default() -> Self {
		Self::new(ConfigPatch::default())
	}
}

impl GraphCanvas {
	/// Engine with an empty graph and `patch` applied over the defaults.
	pub fn new(patch: ConfigPatch) -> Self {
		let mut config = CanvasConfig::default();
		config.apply(patch);
		let constants = ForceConstants::default();
		let style = config.render_style(&constants);
		let state = GraphState::empty(config.width, config.height);
		Self {
			config,
			constants,
			style,
			state,
			renderer: Renderer::new(),
		}
	}

	/// Resolved configuration.
	pub fn config(&self) -> &CanvasConfig {
		&self.config
	}

	/// Resolved colors and sizes.
	pub fn style(&self) -> &RenderStyle {
		&self.style
	}

	/// Renderer with its caption and metric caches.
	pub fn renderer(&self) -> &Renderer {
		&self.renderer
	}

	/// Merge a partial configuration and rebuild what depends on it.
	pub fn set_config(&mut self, patch: ConfigPatch) {
		let changes = self.config.apply(patch);
		debug!("config updated: {changes:?}");

		if changes.size {
			self.state
				.viewport_mut()
				.resize(self.config.width, self.config.height);
		}
		if changes.priorities {
			self.renderer.invalidate_labels();
		}
		if changes.cooldown {
			self.apply_cooldown();
		}
		if changes.style {
			self.style = self.config.render_style(&self.constants);
		}
		self.state.set_constants(self.constants.clone());
	}

	fn apply_cooldown(&mut self) {
		let simulation = self.state.simulation_mut();
		simulation.set_cooldown_ticks(self.config.cooldown_ticks);
		simulation.set_cooldown_time_ms(self.config.cooldown_time_ms);
	}

	/// Replace the graph. On error the previous graph stays in place.
	///
	/// The new snapshot gets a fresh layout run under the configured budgets,
	/// so it is fitted again when that run settles.
	pub fn set_data(&mut self, data: GraphData) -> Result<()> {
		let viewport = self.state.viewport().clone();
		let state = GraphState::build(
			data,
			self.constants.clone(),
			self.config.cooldown_ticks,
			viewport,
		)
		.inspect_err(|err| warn!("rejected graph data: {err}"))?;

		info!(
			"graph loaded: {} nodes, {} links",
			state.graph().node_count(),
			state.graph().link_count()
		);
		self.state = state;
		self.apply_cooldown();
		self.renderer.invalidate_labels();
		Ok(())
	}

	/// Snapshot of the current graph, including `expand` toggles.
	pub fn get_data(&self) -> GraphData {
		self.state.snapshot()
	}

	/// Direct access to the engine state. Not part of the stable surface.
	pub fn get_graph(&mut self) -> &mut GraphState {
		&mut self.state
	}

	/// Zoom to `k` around the current center.
	pub fn zoom(&mut self, k: f64, duration_ms: f64) {
		self.state.viewport_mut().zoom(k, duration_ms);
	}

	/// Current zoom factor.
	pub fn zoom_level(&self) -> f64 {
		self.state.viewport().zoom_level()
	}

	/// Move the camera to a graph-space point.
	pub fn center_at(&mut self, x: f64, y: f64, duration_ms: f64) {
		self.state.viewport_mut().center_at(x, y, duration_ms);
	}

	/// Graph-space point in the middle of the surface.
	pub fn center(&self) -> (f64, f64) {
		self.state.viewport().center()
	}

	/// Fit nodes accepted by `filter` (all visible nodes by default).
	///
	/// `padding` scales the default margin of 10% of the smaller surface side,
	/// with 50 meaning 1x.
	pub fn zoom_to_fit(
		&mut self,
		padding: Option<f64>,
		filter: Option<&dyn Fn(&GraphNode) -> bool>,
	) -> bool {
		let multiplier = padding.map_or(1.0, |p| p / FIT_PADDING_BASE);
		self.fit(multiplier, filter)
	}

	fn fit(&mut self, multiplier: f64, filter: Option<&dyn Fn(&GraphNode) -> bool>) -> bool {
		let viewport = self.state.viewport();
		let padding = viewport.width().min(viewport.height()) * FIT_PADDING_RATIO * multiplier;
		self.state.zoom_to_fit(padding, filter, FIT_DURATION_MS)
	}

	/// Restart the layout from full energy.
	pub fn reheat(&mut self) {
		self.state.reheat();
	}

	/// Button pressed.
	pub fn pointer_down(&mut self, event: PointerEvent) {
		self.state.pointer_down(event.x, event.y);
	}

	/// Drag, pan or hover, depending on the gesture.
	pub fn pointer_move(&mut self, event: PointerEvent) {
		if self.state.pointer_drag(event.x, event.y) {
			return;
		}
		let hit = self.state.element_at(event.x, event.y);
		self.update_hover(hit);
	}

	/// Button released. A dragged node stays pinned.
	pub fn pointer_up(&mut self, _event: PointerEvent) {
		self.state.pointer_up();
	}

	/// Pointer left the surface: ends the gesture and clears hover.
	pub fn pointer_leave(&mut self) {
		self.state.pointer_up();
		self.update_hover(None);
	}

	fn update_hover(&mut self, hit: Option<Element>) {
		let previous = self.state.hovered();
		if !self.state.set_hovered(hit) {
			return;
		}

		let node_of = |e: Option<Element>| match e {
			Some(Element::Node(handle)) => Some(handle),
			_ => None,
		};
		let link_of = |e: Option<Element>| match e {
			Some(Element::Link(index)) => Some(index),
			_ => None,
		};
		let graph = self.state.graph();

		if node_of(previous) != node_of(hit) {
			if let Some(callback) = &self.config.on_node_hover {
				callback(node_of(hit).map(|handle| graph.node(handle)));
			}
		}
		if link_of(previous) != link_of(hit) {
			if let Some(callback) = &self.config.on_link_hover {
				callback(link_of(hit).map(|index| &graph.links()[index]));
			}
		}
	}

	/// Primary click. Ignored when it ends a drag.
	pub fn click(&mut self, event: PointerEvent) {
		if self.state.take_click_suppression() {
			return;
		}
		match self.state.element_at(event.x, event.y) {
			Some(Element::Node(handle)) => {
				if let Some(callback) = &self.config.on_node_click {
					callback(self.state.graph().node(handle), &event);
				}
				if let Some(expanded) = self.state.register_click(handle) {
					debug!("node {} expand = {expanded}", self.state.graph().node(handle).id);
					if let Some(callback) = &self.config.on_node_toggle {
						callback(self.state.graph().node(handle), expanded);
					}
				}
			}
			Some(Element::Link(_)) => {}
			None => {
				if self.state.clear_selection(event.ctrl_key) {
					self.selection_changed();
				}
				if let Some(callback) = &self.config.on_background_click {
					callback(&event);
				}
			}
		}
	}

	/// Secondary click: selects the element under the pointer. With Ctrl held
	/// the element is toggled in the selection instead of replacing it.
	pub fn right_click(&mut self, event: PointerEvent) {
		match self.state.element_at(event.x, event.y) {
			Some(element @ Element::Node(handle)) => {
				if self.state.select(element, event.ctrl_key) {
					self.selection_changed();
				}
				if let Some(callback) = &self.config.on_node_right_click {
					callback(self.state.graph().node(handle), &event);
				}
			}
			Some(element @ Element::Link(index)) => {
				if self.state.select(element, event.ctrl_key) {
					self.selection_changed();
				}
				if let Some(callback) = &self.config.on_link_right_click {
					callback(&self.state.graph().links()[index], &event);
				}
			}
			None => {
				if self.state.clear_selection(event.ctrl_key) {
					self.selection_changed();
				}
				if let Some(callback) = &self.config.on_background_right_click {
					callback(&event);
				}
			}
		}
	}

	fn selection_changed(&self) {
		if let Some(callback) = &self.config.on_selection_change {
			callback(self.state.selection());
		}
	}

	/// Zoom around the pointer; positive `delta_y` zooms out.
	pub fn wheel(&mut self, event: PointerEvent, delta_y: f64) {
		let factor = if delta_y > 0.0 {
			WHEEL_ZOOM_OUT
		} else {
			WHEEL_ZOOM_IN
		};
		self.state.viewport_mut().zoom_at(event.x, event.y, factor);
	}

	/// Run one animation frame: step the layout, react to it settling,
	/// advance camera transitions and draw.
	pub fn frame<S: Surface + ?Sized>(&mut self, surface: &S, dt_ms: f64) -> TickOutcome {
		let outcome = self.state.step(dt_ms);
		if outcome == TickOutcome::Stopped {
			self.engine_stopped();
		}
		self.state.viewport_mut().advance(dt_ms);
		self.render(surface);
		outcome
	}

	/// Fit and notify once per snapshot, then freeze the layout with a zero
	/// tick budget so later drags do not move the camera. An expand toggle
	/// grants a new budget and with it one more fit.
	fn engine_stopped(&mut self) {
		debug!("layout settled after {} ticks", self.state.simulation().ticks());
		if self.state.simulation().cooldown_ticks() == Some(0) {
			return;
		}
		self.state.simulation_mut().set_cooldown_ticks(Some(0));
		if self.config.zoom_to_fit_on_stop {
			let multiplier = if self.state.graph().node_count() < 2 {
				SPARSE_FIT_MULTIPLIER
			} else {
				1.0
			};
			self.fit(multiplier, None);
		}
		if let Some(callback) = &self.config.on_engine_stop {
			callback();
		}
	}

	/// Draw the current state without stepping.
	pub fn render<S: Surface + ?Sized>(&mut self, surface: &S) {
		let state = &self.state;
		let config = &self.config;
		let graph = state.graph();

		let node_selected = |handle: NodeHandle| {
			state.is_node_highlighted(handle)
				|| config
					.is_node_selected
					.as_ref()
					.is_some_and(|f| f(graph.node(handle)))
		};
		let link_selected = |index: usize| {
			state.is_link_highlighted(index)
				|| config
					.is_link_selected
					.as_ref()
					.is_some_and(|f| f(&graph.links()[index]))
		};
		let viewport = state.viewport();
		let scene = Scene {
			graph,
			bodies: state.simulation().bodies(),
			transform: viewport.transform(),
			width: viewport.width(),
			height: viewport.height(),
			style: &self.style,
			priorities: &config.display_text_priority,
			node_selected: &node_selected,
			link_selected: &link_selected,
		};
		self.renderer.render(surface, &scene);
	}
}

#[cfg(test)]
mod tests {
	use std::cell::{Cell, RefCell};
	use std::rc::Rc;

	use super::super::adapter::RuntimeLink;
	use super::super::error::GraphError;
	use super::super::text::{MonospaceMetrics, TextMeasure, TextMetrics};
	use super::super::theme::ThemeMode;
	use super::super::types::TextPriority;
	use super::*;

	/// Discards drawing but keeps the stroke widths in call order.
	#[derive(Default)]
	struct NullSurface {
		widths: RefCell<Vec<f64>>,
	}

	impl TextMeasure for NullSurface {
		fn measure_text(&self, text: &str) -> TextMetrics {
			MonospaceMetrics::default().measure_text(text)
		}
	}

	impl Surface for NullSurface {
		fn save(&self) {}
		fn restore(&self) {}
		fn translate(&self, _: f64, _: f64) {}
		fn scale(&self, _: f64) {}
		fn rotate(&self, _: f64) {}
		fn set_fill_style(&self, _: &str) {}
		fn set_stroke_style(&self, _: &str) {}
		fn set_line_width(&self, width: f64) {
			self.widths.borrow_mut().push(width);
		}
		fn set_font(&self, _: &str) {}
		fn set_text_align(&self, _: &str) {}
		fn set_text_baseline(&self, _: &str) {}
		fn fill_rect(&self, _: f64, _: f64, _: f64, _: f64) {}
		fn fill_text(&self, _: &str, _: f64, _: f64) {}
		fn begin_path(&self) {}
		fn close_path(&self) {}
		fn move_to(&self, _: f64, _: f64) {}
		fn line_to(&self, _: f64, _: f64) {}
		fn quadratic_curve_to(&self, _: f64, _: f64, _: f64, _: f64) {}
		fn bezier_curve_to(&self, _: f64, _: f64, _: f64, _: f64, _: f64, _: f64) {}
		fn arc(&self, _: f64, _: f64, _: f64, _: f64, _: f64) {}
		fn fill(&self) {}
		fn stroke(&self) {}
	}

	const PAIR: &str = r#"{"nodes":[{"id":1,"data":{"name":"Alice"}},{"id":2}],
		"links":[{"id":7,"source":1,"target":2,"relationship":"KNOWS"}]}"#;

	fn canvas_with(json: &str) -> GraphCanvas {
		let mut canvas = GraphCanvas::default();
		canvas.set_data(GraphData::from_json(json).unwrap()).unwrap();
		canvas
	}

	#[test]
	fn data_round_trips_through_the_facade() {
		let data = GraphData::from_json(PAIR).unwrap();
		let canvas = canvas_with(PAIR);
		assert_eq!(canvas.get_data(), data);
	}

	#[test]
	fn failed_data_keeps_previous_graph() {
		let mut canvas = canvas_with(PAIR);
		let bad = GraphData::from_json(
			r#"{"nodes":[{"id":1}],"links":[{"id":5,"source":1,"target":99}]}"#,
		)
		.unwrap();
		let err = canvas.set_data(bad).unwrap_err();
		assert!(matches!(err, GraphError::MissingEndpoint { link: 5, node: 99 }));
		assert_eq!(canvas.get_data(), GraphData::from_json(PAIR).unwrap());
	}

	#[test]
	fn engine_stop_fits_and_notifies_once() {
		let stops = Rc::new(Cell::new(0));
		let counter = Rc::clone(&stops);
		let mut canvas = GraphCanvas::new(
			ConfigPatch::new()
				.cooldown_ticks(Some(5))
				.on_engine_stop(move || counter.set(counter.get() + 1)),
		);
		canvas.set_data(GraphData::from_json(PAIR).unwrap()).unwrap();

		let outcomes: Vec<_> = (0..8).map(|_| canvas.frame(&NullSurface::default(), 16.0)).collect();
		assert_eq!(outcomes[4], TickOutcome::Stepped);
		assert_eq!(outcomes[5], TickOutcome::Stopped);
		assert_eq!(outcomes[6], TickOutcome::Idle);
		assert_eq!(stops.get(), 1);
		assert!(canvas.get_graph().viewport().is_animating());
	}

	#[test]
	fn zero_cooldown_stops_silently() {
		let stops = Rc::new(Cell::new(0));
		let counter = Rc::clone(&stops);
		let mut canvas = GraphCanvas::new(
			ConfigPatch::new()
				.cooldown_ticks(Some(0))
				.on_engine_stop(move || counter.set(counter.get() + 1)),
		);
		canvas.set_data(GraphData::from_json(PAIR).unwrap()).unwrap();
		assert_eq!(canvas.frame(&NullSurface::default(), 16.0), TickOutcome::Stopped);
		assert_eq!(stops.get(), 0);
		assert!(!canvas.get_graph().viewport().is_animating());
	}

	#[test]
	fn priority_change_invalidates_captions() {
		let mut canvas = canvas_with(PAIR);
		canvas.render(&NullSurface::default());
		assert_eq!(canvas.renderer().cached_label(1).map(|l| l[0].as_str()), Some("1"));

		canvas.set_config(
			ConfigPatch::new().display_text_priority(vec![TextPriority::new("name", false)]),
		);
		assert!(canvas.renderer().cached_label(1).is_none());
		canvas.render(&NullSurface::default());
		assert_eq!(
			canvas.renderer().cached_label(1).map(|l| l[0].as_str()),
			Some("Alice")
		);
	}

	fn pin(canvas: &mut GraphCanvas, index: usize, x: f64, y: f64) {
		canvas
			.get_graph()
			.simulation_mut()
			.pin(NodeHandle(index), x, y);
	}

	#[test]
	fn clicks_dispatch_to_callbacks() {
		let clicked = Rc::new(RefCell::new(Vec::new()));
		let backgrounds = Rc::new(Cell::new(0));
		let (c, b) = (Rc::clone(&clicked), Rc::clone(&backgrounds));
		let mut canvas = GraphCanvas::new(ConfigPatch {
			on_node_click: Some(Rc::new(move |node: &GraphNode, _: &PointerEvent| {
				c.borrow_mut().push(node.id)
			})),
			on_background_click: Some(Rc::new(move |_: &PointerEvent| b.set(b.get() + 1))),
			..ConfigPatch::default()
		});
		canvas.set_data(GraphData::from_json(PAIR).unwrap()).unwrap();
		pin(&mut canvas, 0, 0.0, 0.0);
		pin(&mut canvas, 1, 100.0, 0.0);

		canvas.click(PointerEvent::new(400.0, 300.0));
		canvas.click(PointerEvent::new(10.0, 10.0));
		assert_eq!(*clicked.borrow(), vec![1]);
		assert_eq!(backgrounds.get(), 1);
	}

	#[test]
	fn double_click_reports_toggle() {
		let toggles = Rc::new(RefCell::new(Vec::new()));
		let t = Rc::clone(&toggles);
		let mut canvas = GraphCanvas::new(ConfigPatch {
			on_node_toggle: Some(Rc::new(move |node: &GraphNode, expanded| {
				t.borrow_mut().push((node.id, expanded))
			})),
			..ConfigPatch::default()
		});
		canvas.set_data(GraphData::from_json(PAIR).unwrap()).unwrap();
		pin(&mut canvas, 0, 0.0, 0.0);

		canvas.click(PointerEvent::new(400.0, 300.0));
		canvas.click(PointerEvent::new(400.0, 300.0));
		assert_eq!(*toggles.borrow(), vec![(1, true)]);
		assert!(canvas.get_data().nodes[0].expand);
	}

	#[test]
	fn right_click_selects_and_ctrl_toggles() {
		let links = Rc::new(RefCell::new(Vec::new()));
		let l = Rc::clone(&links);
		let mut canvas = GraphCanvas::new(ConfigPatch {
			on_link_right_click: Some(Rc::new(move |link: &RuntimeLink, _: &PointerEvent| {
				l.borrow_mut().push(link.id)
			})),
			..ConfigPatch::default()
		});
		canvas.set_data(GraphData::from_json(PAIR).unwrap()).unwrap();
		pin(&mut canvas, 0, -50.0, 0.0);
		pin(&mut canvas, 1, 50.0, 0.0);

		canvas.right_click(PointerEvent::new(350.0, 300.0));
		canvas.right_click(PointerEvent::new(400.0, 300.0).with_ctrl());
		assert_eq!(*links.borrow(), vec![7]);
		assert_eq!(canvas.get_graph().selection().len(), 2);

		canvas.right_click(PointerEvent::new(10.0, 10.0).with_ctrl());
		assert_eq!(canvas.get_graph().selection().len(), 2);
		canvas.right_click(PointerEvent::new(10.0, 10.0));
		assert!(canvas.get_graph().selection().is_empty());
	}

	#[test]
	fn hover_fires_only_on_change() {
		let hovers = Rc::new(RefCell::new(Vec::new()));
		let h = Rc::clone(&hovers);
		let mut canvas = GraphCanvas::new(ConfigPatch {
			on_node_hover: Some(Rc::new(move |node: Option<&GraphNode>| {
				h.borrow_mut().push(node.map(|n| n.id))
			})),
			..ConfigPatch::default()
		});
		canvas.set_data(GraphData::from_json(PAIR).unwrap()).unwrap();
		pin(&mut canvas, 0, 0.0, 0.0);
		pin(&mut canvas, 1, 100.0, 0.0);

		canvas.pointer_move(PointerEvent::new(400.0, 300.0));
		canvas.pointer_move(PointerEvent::new(401.0, 300.0));
		canvas.pointer_leave();
		assert_eq!(*hovers.borrow(), vec![Some(1), None]);
	}

	#[test]
	fn host_predicates_drive_stroke_widths() {
		let mut canvas = canvas_with(PAIR);
		canvas.set_config(ConfigPatch {
			is_node_selected: Some(Rc::new(|node: &GraphNode| node.id == 2)),
			..ConfigPatch::default()
		});
		// The link stroke comes first, then one stroke per node.
		let surface = NullSurface::default();
		canvas.render(&surface);
		assert_eq!(*surface.widths.borrow(), vec![1.0, 0.75, 1.5]);

		canvas.set_config(ConfigPatch {
			is_link_selected: Some(Rc::new(|link: &RuntimeLink| link.id == 7)),
			..ConfigPatch::default()
		});
		let surface = NullSurface::default();
		canvas.render(&surface);
		assert_eq!(*surface.widths.borrow(), vec![2.0, 0.75, 1.5]);
	}

	#[test]
	fn selection_changes_reach_the_host() {
		let seen = Rc::new(RefCell::new(Vec::new()));
		let s = Rc::clone(&seen);
		let mut canvas = GraphCanvas::new(
			ConfigPatch::new()
				.on_selection_change(move |selection: &[Element]| s.borrow_mut().push(selection.to_vec())),
		);
		canvas.set_data(GraphData::from_json(PAIR).unwrap()).unwrap();
		pin(&mut canvas, 0, -50.0, 0.0);
		pin(&mut canvas, 1, 50.0, 0.0);

		canvas.right_click(PointerEvent::new(350.0, 300.0));
		canvas.right_click(PointerEvent::new(350.0, 300.0));
		canvas.right_click(PointerEvent::new(400.0, 300.0).with_ctrl());
		canvas.click(PointerEvent::new(10.0, 10.0).with_ctrl());
		canvas.click(PointerEvent::new(10.0, 10.0));
		canvas.right_click(PointerEvent::new(10.0, 10.0));

		let node = Element::Node(NodeHandle(0));
		assert_eq!(
			*seen.borrow(),
			vec![vec![node], vec![node, Element::Link(0)], vec![]]
		);
	}

	const CHAIN: &str = r#"{"nodes":[{"id":1},{"id":2},{"id":3}],
		"links":[{"id":1,"source":1,"target":2},{"id":2,"source":2,"target":3}]}"#;

	/// Run frames until the layout is idle and the camera has stopped moving.
	fn settle(canvas: &mut GraphCanvas) {
		let surface = NullSurface::default();
		for _ in 0..1000 {
			let outcome = canvas.frame(&surface, 16.0);
			if outcome == TickOutcome::Idle && !canvas.get_graph().viewport().is_animating() {
				return;
			}
		}
		panic!("layout never settled");
	}

	fn counting_canvas(json: &str) -> (GraphCanvas, Rc<Cell<u32>>) {
		let stops = Rc::new(Cell::new(0));
		let counter = Rc::clone(&stops);
		let mut canvas =
			GraphCanvas::new(ConfigPatch::new().on_engine_stop(move || counter.set(counter.get() + 1)));
		canvas.set_data(GraphData::from_json(json).unwrap()).unwrap();
		(canvas, stops)
	}

	#[test]
	fn drag_after_first_settle_keeps_the_camera() {
		let (mut canvas, stops) = counting_canvas(CHAIN);
		settle(&mut canvas);
		assert_eq!(stops.get(), 1);

		canvas.zoom(3.0, 0.0);
		let camera = (canvas.zoom_level(), canvas.center());
		let (gx, gy) = canvas.get_graph().simulation().position(NodeHandle(0));
		let (sx, sy) = canvas.get_graph().viewport().graph_to_screen(gx, gy);
		canvas.pointer_down(PointerEvent::new(sx, sy));
		canvas.pointer_move(PointerEvent::new(sx + 30.0, sy));
		canvas.pointer_up(PointerEvent::new(sx + 30.0, sy));
		settle(&mut canvas);

		assert_eq!((canvas.zoom_level(), canvas.center()), camera);
		assert_eq!(stops.get(), 1);
		let body = &canvas.get_graph().simulation().bodies()[0];
		assert!((body.x - (gx + 10.0)).abs() < 1e-9);
	}

	#[test]
	fn expand_toggle_earns_one_more_fit() {
		let (mut canvas, stops) = counting_canvas(CHAIN);
		settle(&mut canvas);
		assert_eq!(canvas.get_graph().simulation().cooldown_ticks(), Some(0));

		let (gx, gy) = canvas.get_graph().simulation().position(NodeHandle(1));
		let (sx, sy) = canvas.get_graph().viewport().graph_to_screen(gx, gy);
		canvas.click(PointerEvent::new(sx, sy));
		canvas.click(PointerEvent::new(sx, sy));
		assert!(canvas.get_graph().simulation().is_running());
		settle(&mut canvas);
		assert_eq!(stops.get(), 2);
	}

	#[test]
	fn time_budget_follows_config() {
		let mut canvas = GraphCanvas::new(ConfigPatch::new().cooldown_time_ms(Some(160.0)));
		canvas.set_data(GraphData::from_json(CHAIN).unwrap()).unwrap();
		let outcomes: Vec<_> = (0..12)
			.map(|_| canvas.frame(&NullSurface::default(), 16.0))
			.collect();
		assert_eq!(outcomes[9], TickOutcome::Stepped);
		assert_eq!(outcomes[10], TickOutcome::Stopped);

		canvas.set_config(ConfigPatch::new().cooldown_time_ms(None));
		assert_eq!(canvas.get_graph().simulation().cooldown_time_ms(), None);
	}

	#[test]
	fn style_follows_theme_and_overrides() {
		let mut canvas = GraphCanvas::default();
		canvas.set_config(ConfigPatch::new().theme(ThemeMode::Dark));
		assert_eq!(canvas.style().background, "#1a1a1a");
		canvas.set_config(ConfigPatch {
			background_color: Some("#102030".into()),
			..ConfigPatch::default()
		});
		canvas.set_config(ConfigPatch::new().size(320.0, 200.0));
		assert_eq!(canvas.style().background, "#102030");
	}

	#[test]
	fn wheel_zooms_around_pointer() {
		let mut canvas = GraphCanvas::default();
		canvas.wheel(PointerEvent::new(400.0, 300.0), -1.0);
		assert!((canvas.zoom_level() - 1.1).abs() < 1e-12);
		canvas.wheel(PointerEvent::new(400.0, 300.0), 1.0);
		assert!((canvas.zoom_level() - 0.99).abs() < 1e-12);
		assert_eq!(canvas.center(), (0.0, 0.0));
	}

	#[test]
	fn resize_moves_the_surface_center() {
		let mut canvas = GraphCanvas::default();
		canvas.set_config(ConfigPatch::new().size(200.0, 100.0));
		assert_eq!(canvas.get_graph().viewport().width(), 200.0);
		assert_eq!(
			canvas.get_graph().viewport().graph_to_screen(0.0, 0.0),
			(100.0, 50.0)
		);
	}
}
