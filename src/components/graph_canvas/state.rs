//! Engine state for one mounted graph: runtime graph, layout and interaction.
//!
//! A [`GraphState`] is built wholesale from a snapshot by [`GraphState::build`]
//! and only swapped in once construction succeeded. Besides the layout it
//! tracks the pointer gesture in progress, the hovered element and the
//! internal selection.

use super::adapter::{NodeHandle, RuntimeGraph, RuntimeLink, to_runtime, to_serializable};
use super::degree::DegreeIndex;
use super::error::Result;
use super::forces::{ForceConstants, Forces};
use super::render::LinkGeometry;
use super::simulation::{Simulation, TickOutcome};
use super::types::{GraphData, GraphNode, NodeId};
use super::viewport::Viewport;

/// Screen pixels a press may travel before it counts as a drag.
const DRAG_THRESHOLD: f64 = 3.0;
/// Screen-pixel tolerance around a link curve for hit testing.
const LINK_HIT_TOLERANCE: f64 = 4.0;
const LINK_HIT_SAMPLES: usize = 16;
/// Two clicks on the same node within this window toggle its expansion.
const DOUBLE_CLICK_MS: f64 = 1000.0;
/// Tick budget of the layout run that follows an expand toggle.
pub const EXPAND_COOLDOWN_TICKS: u32 = 100;
/// Camera transition used by zoom-to-fit.
pub const FIT_DURATION_MS: f64 = 500.0;

/// A graph element under the pointer or in the selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Element {
	/// Node by arena handle.
	Node(NodeHandle),
	/// Position in [`RuntimeGraph::links`].
	Link(usize),
}

/// Tracks an in-progress node drag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragState {
	/// Node being dragged.
	pub node: NodeHandle,
	/// Offset from the pointer to the node center, in graph units.
	pub offset_x: f64,
	/// Vertical counterpart of `offset_x`.
	pub offset_y: f64,
}

/// Tracks an in-progress canvas pan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanState {
	/// Pointer position at the previous move, screen pixels.
	pub last_x: f64,
	/// See `last_x`.
	pub last_y: f64,
}

/// Pointer gesture between press and release.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Gesture {
	/// No button held.
	#[default]
	Idle,
	/// Pressed but not yet moved past the drag threshold.
	Pressed {
		/// Press x, screen pixels.
		x: f64,
		/// Press y, screen pixels.
		y: f64,
		/// Node under the press, if any.
		node: Option<NodeHandle>,
	},
	/// Moving a node.
	Dragging(DragState),
	/// Moving the camera.
	Panning(PanState),
}

#[derive(Clone, Copy, Debug)]
struct LastClick {
	node: NodeId,
	at_ms: f64,
}

/// Layout and interaction state for one snapshot.
#[derive(Clone, Debug)]
pub struct GraphState {
	graph: RuntimeGraph,
	degrees: DegreeIndex,
	constants: ForceConstants,
	forces: Forces,
	simulation: Simulation,
	viewport: Viewport,
	gesture: Gesture,
	/// Set when the last press turned into a drag, so the following click is
	/// not treated as a click.
	suppress_click: bool,
	hovered: Option<Element>,
	selection: Vec<Element>,
	last_click: Option<LastClick>,
	clock_ms: f64,
}

impl GraphState {
	/// Adopt `data`, compute degrees and forces, and seed a fresh simulation.
	///
	/// The camera is taken over from `viewport` so replacing data does not
	/// jump the view.
	pub fn build(
		data: GraphData,
		constants: ForceConstants,
		cooldown_ticks: Option<u32>,
		viewport: Viewport,
	) -> Result<Self> {
		let graph = to_runtime(data)?;
		let degrees = DegreeIndex::recompute(&graph);
		let forces = Forces::build(&graph, &degrees, &constants);
		let simulation = Simulation::new(graph.node_count(), cooldown_ticks);

		Ok(Self {
			graph,
			degrees,
			constants,
			forces,
			simulation,
			viewport,
			gesture: Gesture::Idle,
			suppress_click: false,
			hovered: None,
			selection: Vec::new(),
			last_click: None,
			clock_ms: 0.0,
		})
	}

	/// An empty graph on a surface of the given size.
	pub fn empty(width: f64, height: f64) -> Self {
		let graph = RuntimeGraph::default();
		let degrees = DegreeIndex::default();
		let constants = ForceConstants::default();
		let forces = Forces::build(&graph, &degrees, &constants);
		Self {
			graph,
			degrees,
			constants,
			forces,
			simulation: Simulation::new(0, None),
			viewport: Viewport::new(width, height),
			gesture: Gesture::Idle,
			suppress_click: false,
			hovered: None,
			selection: Vec::new(),
			last_click: None,
			clock_ms: 0.0,
		}
	}

	/// Adopted graph.
	pub fn graph(&self) -> &RuntimeGraph {
		&self.graph
	}

	/// Degree per node.
	pub fn degrees(&self) -> &DegreeIndex {
		&self.degrees
	}

	/// Tuning constants the forces were built from.
	pub fn constants(&self) -> &ForceConstants {
		&self.constants
	}

	/// Forces for the current snapshot.
	pub fn forces(&self) -> &Forces {
		&self.forces
	}

	/// Layout integrator and body positions.
	pub fn simulation(&self) -> &Simulation {
		&self.simulation
	}

	/// Mutable layout access, for pinning from the host.
	pub fn simulation_mut(&mut self) -> &mut Simulation {
		&mut self.simulation
	}

	/// Camera.
	pub fn viewport(&self) -> &Viewport {
		&self.viewport
	}

	/// Mutable camera access.
	pub fn viewport_mut(&mut self) -> &mut Viewport {
		&mut self.viewport
	}

	/// Gesture in progress.
	pub fn gesture(&self) -> Gesture {
		self.gesture
	}

	/// Element under the pointer, if any.
	pub fn hovered(&self) -> Option<Element> {
		self.hovered
	}

	/// Internal selection in the order elements were added.
	pub fn selection(&self) -> &[Element] {
		&self.selection
	}

	/// Serializable snapshot of the current graph.
	pub fn snapshot(&self) -> GraphData {
		to_serializable(&self.graph)
	}

	/// Replace the tuning constants and rebuild the forces from them.
	pub fn set_constants(&mut self, constants: ForceConstants) {
		self.constants = constants;
		self.forces = Forces::build(&self.graph, &self.degrees, &self.constants);
	}

	/// Advance the layout by one frame and the interaction clock by `dt_ms`.
	pub fn step(&mut self, dt_ms: f64) -> TickOutcome {
		self.clock_ms += dt_ms.max(0.0);
		self.simulation.step(&self.graph, &self.forces, dt_ms)
	}

	/// Restart the layout from full energy.
	pub fn reheat(&mut self) {
		self.simulation.reheat();
	}

	/// Topmost visible node under a screen point.
	pub fn node_at(&self, sx: f64, sy: f64) -> Option<NodeHandle> {
		let (gx, gy) = self.viewport.screen_to_graph(sx, sy);
		let radius = self.constants.node_size;
		self.graph
			.handles()
			.rev()
			.filter(|(_, node)| node.visible)
			.map(|(handle, _)| handle)
			.find(|&handle| {
				let (x, y) = self.simulation.position(handle);
				(x - gx).powi(2) + (y - gy).powi(2) <= radius * radius
			})
	}

	/// Topmost visible link whose curve passes near a screen point.
	pub fn link_at(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.viewport.screen_to_graph(sx, sy);
		let tolerance = LINK_HIT_TOLERANCE / self.viewport.zoom_level();
		self.graph
			.links()
			.iter()
			.enumerate()
			.rev()
			.filter(|(_, link)| self.graph.link_visible(link))
			.find(|(_, link)| self.link_distance(link, gx, gy) <= tolerance)
			.map(|(index, _)| index)
	}

	/// Nodes win over links when both are under the pointer.
	pub fn element_at(&self, sx: f64, sy: f64) -> Option<Element> {
		self.node_at(sx, sy)
			.map(Element::Node)
			.or_else(|| self.link_at(sx, sy).map(Element::Link))
	}

	fn link_distance(&self, link: &RuntimeLink, gx: f64, gy: f64) -> f64 {
		let geometry = LinkGeometry::compute(
			self.simulation.position(link.source),
			self.simulation.position(link.target),
			link.curve,
			link.is_self_loop(),
			self.constants.node_size,
		);
		let points: Vec<(f64, f64)> = (0..=LINK_HIT_SAMPLES)
			.map(|i| geometry.point_at(i as f64 / LINK_HIT_SAMPLES as f64))
			.collect();
		points
			.windows(2)
			.map(|pair| segment_distance((gx, gy), pair[0], pair[1]))
			.fold(f64::INFINITY, f64::min)
	}

	/// Record a hover change. Returns `true` when the hovered element changed.
	pub fn set_hovered(&mut self, element: Option<Element>) -> bool {
		let changed = self.hovered != element;
		self.hovered = element;
		changed
	}

	/// Select `element`; with `additive` it toggles membership instead.
	/// Returns `true` when the selection changed.
	pub fn select(&mut self, element: Element, additive: bool) -> bool {
		if !additive {
			if self.selection == [element] {
				return false;
			}
			self.selection = vec![element];
		} else if let Some(pos) = self.selection.iter().position(|&e| e == element) {
			self.selection.remove(pos);
		} else {
			self.selection.push(element);
		}
		true
	}

	/// Clear the selection unless `keep` is set. Returns `true` if anything
	/// was deselected.
	pub fn clear_selection(&mut self, keep: bool) -> bool {
		if keep || self.selection.is_empty() {
			return false;
		}
		self.selection.clear();
		true
	}

	/// Highlighted by selection or hover.
	pub fn is_node_highlighted(&self, handle: NodeHandle) -> bool {
		let element = Element::Node(handle);
		self.hovered == Some(element) || self.selection.contains(&element)
	}

	/// Link counterpart of [`GraphState::is_node_highlighted`].
	pub fn is_link_highlighted(&self, index: usize) -> bool {
		let element = Element::Link(index);
		self.hovered == Some(element) || self.selection.contains(&element)
	}

	/// Register a click on `handle`. Returns the node's new `expand` flag when
	/// this click completes a double click; the layout then gets a fresh run
	/// of [`EXPAND_COOLDOWN_TICKS`].
	pub fn register_click(&mut self, handle: NodeHandle) -> Option<bool> {
		let id = self.graph.node(handle).id;
		let now = self.clock_ms;
		let double = self
			.last_click
			.is_some_and(|last| last.node == id && now - last.at_ms < DOUBLE_CLICK_MS);

		if double {
			self.last_click = None;
			let node = self.graph.node_mut(handle);
			node.expand = !node.expand;
			let expanded = node.expand;
			self.simulation
				.set_cooldown_ticks(Some(EXPAND_COOLDOWN_TICKS));
			self.simulation.reheat();
			Some(expanded)
		} else {
			self.last_click = Some(LastClick { node: id, at_ms: now });
			None
		}
	}

	/// Start a press at a screen point.
	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		self.suppress_click = false;
		self.gesture = Gesture::Pressed {
			x: sx,
			y: sy,
			node: self.node_at(sx, sy),
		};
	}

	/// Continue the current gesture. Returns `true` if it moved anything.
	pub fn pointer_drag(&mut self, sx: f64, sy: f64) -> bool {
		match self.gesture {
			Gesture::Idle => false,
			Gesture::Pressed { x, y, node } => {
				if (sx - x).hypot(sy - y) < DRAG_THRESHOLD {
					return false;
				}
				self.suppress_click = true;
				self.gesture = match node {
					Some(handle) => {
						let (gx, gy) = self.viewport.screen_to_graph(x, y);
						let (nx, ny) = self.simulation.position(handle);
						self.simulation.reheat();
						Gesture::Dragging(DragState {
							node: handle,
							offset_x: nx - gx,
							offset_y: ny - gy,
						})
					}
					None => Gesture::Panning(PanState { last_x: x, last_y: y }),
				};
				self.pointer_drag(sx, sy)
			}
			Gesture::Dragging(drag) => {
				let (gx, gy) = self.viewport.screen_to_graph(sx, sy);
				self.simulation
					.pin(drag.node, gx + drag.offset_x, gy + drag.offset_y);
				if !self.simulation.is_running() {
					self.simulation.reheat();
				}
				true
			}
			Gesture::Panning(pan) => {
				self.viewport.pan_by(sx - pan.last_x, sy - pan.last_y);
				self.gesture = Gesture::Panning(PanState {
					last_x: sx,
					last_y: sy,
				});
				true
			}
		}
	}

	/// End the gesture. A dragged node stays pinned where it was dropped.
	pub fn pointer_up(&mut self) {
		self.gesture = Gesture::Idle;
	}

	/// Consume the drag marker. `true` means the click ends a drag.
	pub fn take_click_suppression(&mut self) -> bool {
		std::mem::take(&mut self.suppress_click)
	}

	/// Fit visible nodes accepted by `filter` into view.
	pub fn zoom_to_fit(
		&mut self,
		padding: f64,
		filter: Option<&dyn Fn(&GraphNode) -> bool>,
		duration_ms: f64,
	) -> bool {
		let points: Vec<(f64, f64)> = self
			.graph
			.handles()
			.filter(|(_, node)| node.visible && filter.is_none_or(|f| f(node)))
			.map(|(handle, _)| self.simulation.position(handle))
			.collect();
		self.viewport
			.zoom_to_fit(points, self.constants.node_size, padding, duration_ms)
	}
}

fn segment_distance(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
	let (abx, aby) = (b.0 - a.0, b.1 - a.1);
	let len_sq = abx * abx + aby * aby;
	let t = if len_sq > 0.0 {
		(((p.0 - a.0) * abx + (p.1 - a.1) * aby) / len_sq).clamp(0.0, 1.0)
	} else {
		0.0
	};
	let (cx, cy) = (a.0 + abx * t, a.1 + aby * t);
	(p.0 - cx).hypot(p.1 - cy)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_canvas::error::GraphError;

	fn state(json: &str) -> GraphState {
		let data = GraphData::from_json(json).unwrap();
		GraphState::build(data, ForceConstants::default(), None, Viewport::new(800.0, 600.0))
			.unwrap()
	}

	const PAIR: &str = r#"{"nodes":[{"id":1},{"id":2}],
		"links":[{"id":7,"source":1,"target":2,"relationship":"KNOWS"}]}"#;

	fn place(state: &mut GraphState, handle: usize, x: f64, y: f64) {
		state.simulation.pin(NodeHandle(handle), x, y);
	}

	#[test]
	fn build_computes_degrees_and_springs() {
		let s = state(PAIR);
		assert_eq!(s.degrees().as_slice(), &[1, 1]);
		assert_eq!(s.forces().link.springs.len(), 1);
		assert_eq!(s.simulation().bodies().len(), 2);
	}

	#[test]
	fn build_rejects_dangling_links() {
		let data = GraphData::from_json(
			r#"{"nodes":[{"id":1}],"links":[{"id":5,"source":1,"target":99}]}"#,
		)
		.unwrap();
		let err = GraphState::build(data, ForceConstants::default(), None, Viewport::new(1.0, 1.0))
			.unwrap_err();
		assert!(matches!(err, GraphError::MissingEndpoint { link: 5, node: 99 }));
	}

	#[test]
	fn node_hit_testing_prefers_topmost() {
		let mut s = state(PAIR);
		place(&mut s, 0, 0.0, 0.0);
		place(&mut s, 1, 3.0, 0.0);
		// Screen center maps to graph origin.
		assert_eq!(s.node_at(401.0, 300.0), Some(NodeHandle(1)));
		assert_eq!(s.node_at(396.0, 300.0), Some(NodeHandle(0)));
		assert_eq!(s.node_at(450.0, 300.0), None);
	}

	#[test]
	fn link_hit_testing_follows_the_segment() {
		let mut s = state(PAIR);
		place(&mut s, 0, -50.0, 0.0);
		place(&mut s, 1, 50.0, 0.0);
		assert_eq!(s.link_at(420.0, 302.0), Some(0));
		assert_eq!(s.link_at(420.0, 320.0), None);
		assert_eq!(s.element_at(350.0, 300.0), Some(Element::Node(NodeHandle(0))));
		assert_eq!(s.element_at(400.0, 300.0), Some(Element::Link(0)));
	}

	#[test]
	fn ctrl_selection_toggles_membership() {
		let mut s = state(PAIR);
		assert!(s.select(Element::Node(NodeHandle(0)), false));
		assert!(!s.select(Element::Node(NodeHandle(0)), false));
		assert!(s.select(Element::Link(0), true));
		assert_eq!(s.selection().len(), 2);
		assert!(s.select(Element::Node(NodeHandle(0)), true));
		assert_eq!(s.selection(), &[Element::Link(0)]);
		assert!(!s.clear_selection(true));
		assert!(s.clear_selection(false));
		assert!(s.selection().is_empty());
	}

	#[test]
	fn hover_highlights_and_reports_changes() {
		let mut s = state(PAIR);
		assert!(s.set_hovered(Some(Element::Link(0))));
		assert!(!s.set_hovered(Some(Element::Link(0))));
		assert!(s.is_link_highlighted(0));
		assert!(!s.is_node_highlighted(NodeHandle(0)));
	}

	#[test]
	fn dragging_pins_the_node() {
		let mut s = state(PAIR);
		place(&mut s, 0, 0.0, 0.0);
		s.simulation.unpin(NodeHandle(0));
		s.pointer_down(400.0, 300.0);
		assert!(!s.pointer_drag(401.0, 300.0));
		assert!(s.pointer_drag(420.0, 310.0));
		assert!(matches!(s.gesture(), Gesture::Dragging(_)));
		s.pointer_up();

		let body = &s.simulation().bodies()[0];
		assert_eq!((body.fx, body.fy), (Some(20.0), Some(10.0)));
		assert!(s.simulation().is_running());
		assert!(s.take_click_suppression());
		assert!(!s.take_click_suppression());
	}

	#[test]
	fn dragging_background_pans() {
		let mut s = state(PAIR);
		place(&mut s, 0, 0.0, 0.0);
		place(&mut s, 1, 100.0, 100.0);
		s.pointer_down(10.0, 10.0);
		s.pointer_drag(30.0, 10.0);
		s.pointer_up();
		assert_eq!(s.viewport().center(), (-20.0, 0.0));
	}

	#[test]
	fn double_click_toggles_expand() {
		let mut s = state(PAIR);
		s.simulation.set_cooldown_ticks(Some(0));
		assert_eq!(s.register_click(NodeHandle(0)), None);
		s.step(200.0);
		assert!(!s.simulation().is_running());
		assert_eq!(s.register_click(NodeHandle(0)), Some(true));
		assert!(s.graph().node(NodeHandle(0)).expand);
		assert_eq!(s.simulation().cooldown_ticks(), Some(EXPAND_COOLDOWN_TICKS));
		assert!(s.simulation().is_running());

		assert_eq!(s.register_click(NodeHandle(1)), None);
		s.step(1500.0);
		assert_eq!(s.register_click(NodeHandle(1)), None);
	}

	#[test]
	fn fit_respects_filter() {
		let mut s = state(PAIR);
		place(&mut s, 0, 0.0, 0.0);
		place(&mut s, 1, 200.0, 0.0);
		let only_first = |node: &GraphNode| node.id == 1;
		assert!(s.zoom_to_fit(0.0, Some(&only_first), 0.0));
		assert_eq!(s.viewport().center(), (0.0, 0.0));
	}
}
