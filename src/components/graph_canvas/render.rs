//! Frame rendering for the graph canvas.
//!
//! Draws in two passes after clearing the background:
//! 1. Links (world space): curve or self-loop, arrowhead, rotated label
//! 2. Nodes on top: filled circle with border, then the wrapped caption
//!
//! Captions are cached per node id until the data or priority list changes.
//! Relationship label metrics are measured once per relationship type and kept
//! for the renderer's lifetime.

use std::collections::HashMap;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, FRAC_PI_6, PI};

use super::adapter::{NodeHandle, RuntimeGraph, RuntimeLink};
use super::simulation::Body;
use super::surface::Surface;
use super::text::{TextMetrics, node_display_text, wrap_text_for_circular_node};
use super::theme::NodePalette;
use super::types::{NodeId, TextPriority};
use super::viewport::ViewTransform;

/// Font for node captions and link labels.
pub const LABEL_FONT: &str = "400 2px SofiaSans, sans-serif";
const NODE_LABEL_COLOR: &str = "black";
const NODE_STROKE_WIDTH: f64 = 0.75;
const LINK_WIDTH: f64 = 1.0;
const ARROW_LENGTH: f64 = 2.0;
/// Line gap factor between the two caption lines.
const LINE_SPACING: f64 = 1.5;
/// Link label background relative to the measured text box.
const LABEL_BACKGROUND_SCALE: f64 = 0.7;
/// Self-loop label distance in units of `node radius * curve`.
const SELF_LOOP_LABEL_SCALE: f64 = 6.2;
/// Half the angular spread of a self-loop's control points.
const SELF_LOOP_SPREAD: f64 = FRAC_PI_6;

/// Resolved colors and sizes for drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderStyle {
	/// CSS canvas fill.
	pub background: String,
	/// CSS stroke and label color.
	pub foreground: String,
	/// Stroke for links without their own color.
	pub link_color: String,
	/// Fills for nodes without their own color.
	pub palette: NodePalette,
	/// Circle radius in graph units.
	pub node_radius: f64,
	/// Radius available to the caption inside the node circle.
	pub text_radius: f64,
}

/// Everything the renderer reads for one frame.
pub struct Scene<'a> {
	/// Graph to draw.
	pub graph: &'a RuntimeGraph,
	/// Positions, indexed by node handle.
	pub bodies: &'a [Body],
	/// Camera transform.
	pub transform: ViewTransform,
	/// Surface size in screen pixels.
	pub width: f64,
	/// Surface height in screen pixels.
	pub height: f64,
	/// Colors and sizes.
	pub style: &'a RenderStyle,
	/// Caption priority list.
	pub priorities: &'a [TextPriority],
	/// Draws the node with a doubled stroke.
	pub node_selected: &'a dyn Fn(NodeHandle) -> bool,
	/// Called with the link's position in [`RuntimeGraph::links`].
	pub link_selected: &'a dyn Fn(usize) -> bool,
}

impl Scene<'_> {
	fn position(&self, handle: NodeHandle) -> (f64, f64) {
		self.bodies
			.get(handle.index())
			.map(Body::position)
			.filter(|(x, y)| x.is_finite() && y.is_finite())
			.unwrap_or((0.0, 0.0))
	}
}

/// Where and how a link is drawn, in graph space.
#[derive(Clone, Debug, PartialEq)]
pub enum LinkGeometry {
	/// Cubic loop leaving and re-entering the node.
	SelfLoop {
		/// Center of the node.
		node: (f64, f64),
		/// First control point.
		control1: (f64, f64),
		/// Second control point.
		control2: (f64, f64),
		/// Label anchor at the loop apex.
		label: (f64, f64),
		/// Label rotation.
		angle: f64,
	},
	/// Quadratic Bézier between two distinct nodes.
	Curve {
		/// Source center.
		start: (f64, f64),
		/// Control point of the quadratic.
		control: (f64, f64),
		/// Target center.
		end: (f64, f64),
		/// Label anchor at the curve midpoint.
		label: (f64, f64),
		/// Label rotation.
		angle: f64,
	},
}

impl LinkGeometry {
	/// Lay out a link from its endpoint positions and curvature.
	pub fn compute(
		start: (f64, f64),
		end: (f64, f64),
		curve: f64,
		self_loop: bool,
		node_radius: f64,
	) -> Self {
		let curve = if curve.is_finite() { curve } else { 0.0 };

		if self_loop {
			let radius = node_radius * curve * SELF_LOOP_LABEL_SCALE;
			let offset = -FRAC_PI_4;
			// A cubic with both ends on the node peaks at 0.75 * d * cos(spread).
			let reach = radius / (0.75 * SELF_LOOP_SPREAD.cos());
			let at = |a: f64, r: f64| (start.0 + r * a.cos(), start.1 + r * a.sin());
			return Self::SelfLoop {
				node: start,
				control1: at(offset - SELF_LOOP_SPREAD, reach),
				control2: at(offset + SELF_LOOP_SPREAD, reach),
				label: at(offset, radius),
				angle: -offset,
			};
		}

		let (dx, dy) = (end.0 - start.0, end.1 - start.1);
		let distance = (dx * dx + dy * dy).sqrt();
		let (perp_x, perp_y) = if distance > 0.0 {
			(dy / distance, -dx / distance)
		} else {
			(0.0, 0.0)
		};
		let control = (
			(start.0 + end.0) / 2.0 + perp_x * curve * distance,
			(start.1 + end.1) / 2.0 + perp_y * curve * distance,
		);

		let label = quadratic_point(start, control, end, 0.5);
		let (tx, ty) = quadratic_tangent(start, control, end, 0.5);
		Self::Curve {
			start,
			control,
			end,
			label,
			angle: upright_angle(ty.atan2(tx)),
		}
	}

	/// Point on the drawn curve at parameter `t` in `[0, 1]`.
	pub fn point_at(&self, t: f64) -> (f64, f64) {
		match *self {
			Self::SelfLoop {
				node,
				control1,
				control2,
				..
			} => cubic_point(node, control1, control2, node, t),
			Self::Curve {
				start,
				control,
				end,
				..
			} => quadratic_point(start, control, end, t),
		}
	}

	/// Anchor of the relationship label.
	pub fn label_position(&self) -> (f64, f64) {
		match self {
			Self::SelfLoop { label, .. } | Self::Curve { label, .. } => *label,
		}
	}

	/// Label rotation, kept upright.
	pub fn label_angle(&self) -> f64 {
		match self {
			Self::SelfLoop { angle, .. } | Self::Curve { angle, .. } => *angle,
		}
	}
}

/// Keep text readable: fold angles into [-90°, 90°].
pub fn upright_angle(angle: f64) -> f64 {
	if angle > FRAC_PI_2 {
		angle - PI
	} else if angle < -FRAC_PI_2 {
		angle + PI
	} else {
		angle
	}
}

/// Arrowhead length; self-loops never get one.
pub fn arrow_length(link: &RuntimeLink, selected: bool) -> f64 {
	if link.is_self_loop() {
		0.0
	} else if selected {
		ARROW_LENGTH * 2.0
	} else {
		ARROW_LENGTH
	}
}

fn quadratic_point(p0: (f64, f64), c: (f64, f64), p1: (f64, f64), t: f64) -> (f64, f64) {
	let u = 1.0 - t;
	(
		u * u * p0.0 + 2.0 * u * t * c.0 + t * t * p1.0,
		u * u * p0.1 + 2.0 * u * t * c.1 + t * t * p1.1,
	)
}

fn cubic_point(
	p0: (f64, f64),
	c1: (f64, f64),
	c2: (f64, f64),
	p1: (f64, f64),
	t: f64,
) -> (f64, f64) {
	let u = 1.0 - t;
	let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
	(
		a * p0.0 + b * c1.0 + c * c2.0 + d * p1.0,
		a * p0.1 + b * c1.1 + c * c2.1 + d * p1.1,
	)
}

fn quadratic_tangent(p0: (f64, f64), c: (f64, f64), p1: (f64, f64), t: f64) -> (f64, f64) {
	let u = 1.0 - t;
	(
		2.0 * u * (c.0 - p0.0) + 2.0 * t * (p1.0 - c.0),
		2.0 * u * (c.1 - p0.1) + 2.0 * t * (p1.1 - c.1),
	)
}

/// Parameter where the curve enters the target circle, by bisection.
fn boundary_parameter(p0: (f64, f64), c: (f64, f64), p1: (f64, f64), radius: f64) -> f64 {
	let (mut inside, mut outside) = (1.0, 0.0);
	for _ in 0..24 {
		let mid = (inside + outside) / 2.0;
		let (x, y) = quadratic_point(p0, c, p1, mid);
		if ((x - p1.0).powi(2) + (y - p1.1).powi(2)).sqrt() < radius {
			inside = mid;
		} else {
			outside = mid;
		}
	}
	inside
}

/// Per-surface render caches.
#[derive(Debug, Default)]
pub struct Renderer {
	labels: HashMap<NodeId, [String; 2]>,
	relationship_metrics: HashMap<String, TextMetrics>,
}

impl Renderer {
	/// Empty caches.
	pub fn new() -> Self {
		Self::default()
	}

	/// Drop cached captions so they are rebuilt on the next frame.
	pub fn invalidate_labels(&mut self) {
		self.labels.clear();
	}

	/// Caption lines cached for node `id`.
	pub fn cached_label(&self, id: NodeId) -> Option<&[String; 2]> {
		self.labels.get(&id)
	}

	/// Measured size of a relationship label, once drawn.
	pub fn relationship_metrics(&self, relationship: &str) -> Option<&TextMetrics> {
		self.relationship_metrics.get(relationship)
	}

	/// Draw one complete frame.
	pub fn render<S: Surface + ?Sized>(&mut self, surface: &S, scene: &Scene<'_>) {
		surface.set_fill_style(&scene.style.background);
		surface.fill_rect(0.0, 0.0, scene.width, scene.height);

		surface.save();
		surface.translate(scene.transform.x, scene.transform.y);
		surface.scale(scene.transform.k);
		surface.set_font(LABEL_FONT);
		surface.set_text_align("center");
		surface.set_text_baseline("middle");

		for (index, link) in scene.graph.links().iter().enumerate() {
			if scene.graph.link_visible(link) {
				self.draw_link(surface, scene, index, link);
			}
		}

		for (handle, node) in scene.graph.handles() {
			if node.visible {
				self.draw_node(surface, scene, handle);
			}
		}

		surface.restore();
	}

	fn draw_node<S: Surface + ?Sized>(&mut self, surface: &S, scene: &Scene<'_>, handle: NodeHandle) {
		let node = scene.graph.node(handle);
		let style = scene.style;
		let (x, y) = scene.position(handle);

		let fill = if node.color.is_empty() {
			style.palette.get(handle.index()).to_css()
		} else {
			node.color.clone()
		};
		let stroke_width = if (scene.node_selected)(handle) {
			NODE_STROKE_WIDTH * 2.0
		} else {
			NODE_STROKE_WIDTH
		};

		surface.begin_path();
		surface.arc(x, y, style.node_radius, 0.0, 2.0 * PI);
		surface.set_fill_style(&fill);
		surface.fill();
		surface.set_line_width(stroke_width);
		surface.set_stroke_style(&style.foreground);
		surface.stroke();

		let [line1, line2] = self
			.labels
			.entry(node.id)
			.or_insert_with(|| {
				let text = node_display_text(node, scene.priorities);
				wrap_text_for_circular_node(surface, &text, style.text_radius)
			})
			.clone();

		surface.set_fill_style(NODE_LABEL_COLOR);
		let half_height = surface.measure_text(&line1).height() / 2.0 * LINE_SPACING;
		if !line1.is_empty() {
			let line1_y = if line2.is_empty() { y } else { y - half_height };
			surface.fill_text(&line1, x, line1_y);
		}
		if !line2.is_empty() {
			surface.fill_text(&line2, x, y + half_height);
		}
	}

	fn draw_link<S: Surface + ?Sized>(
		&mut self,
		surface: &S,
		scene: &Scene<'_>,
		index: usize,
		link: &RuntimeLink,
	) {
		let style = scene.style;
		let selected = (scene.link_selected)(index);
		let color = if link.color.is_empty() {
			style.link_color.as_str()
		} else {
			link.color.as_str()
		};
		let geometry = LinkGeometry::compute(
			scene.position(link.source),
			scene.position(link.target),
			link.curve,
			link.is_self_loop(),
			style.node_radius,
		);

		surface.set_stroke_style(color);
		surface.set_line_width(if selected { LINK_WIDTH * 2.0 } else { LINK_WIDTH });
		surface.begin_path();
		match geometry {
			LinkGeometry::SelfLoop {
				node,
				control1,
				control2,
				..
			} => {
				surface.move_to(node.0, node.1);
				surface.bezier_curve_to(
					control1.0, control1.1, control2.0, control2.1, node.0, node.1,
				);
			}
			LinkGeometry::Curve {
				start,
				control,
				end,
				..
			} => {
				surface.move_to(start.0, start.1);
				surface.quadratic_curve_to(control.0, control.1, end.0, end.1);
			}
		}
		surface.stroke();

		let arrow = arrow_length(link, selected);
		if let LinkGeometry::Curve {
			start,
			control,
			end,
			..
		} = geometry
		{
			if arrow > 0.0 {
				draw_arrow(surface, start, control, end, style.node_radius, arrow, color);
			}
		}

		if !link.relationship.is_empty() {
			self.draw_link_label(surface, scene, link, &geometry);
		}
	}

	fn draw_link_label<S: Surface + ?Sized>(
		&mut self,
		surface: &S,
		scene: &Scene<'_>,
		link: &RuntimeLink,
		geometry: &LinkGeometry,
	) {
		let metrics = *self
			.relationship_metrics
			.entry(link.relationship.clone())
			.or_insert_with(|| surface.measure_text(&link.relationship));
		let (x, y) = geometry.label_position();
		let (w, h) = (
			metrics.width * LABEL_BACKGROUND_SCALE,
			metrics.height() * LABEL_BACKGROUND_SCALE,
		);

		surface.save();
		surface.translate(x, y);
		surface.rotate(geometry.label_angle());
		surface.set_fill_style(&scene.style.background);
		surface.fill_rect(-w / 2.0, -h / 2.0, w, h);
		surface.set_fill_style(&scene.style.foreground);
		surface.fill_text(&link.relationship, 0.0, 0.0);
		surface.restore();
	}
}

fn draw_arrow<S: Surface + ?Sized>(
	surface: &S,
	start: (f64, f64),
	control: (f64, f64),
	end: (f64, f64),
	node_radius: f64,
	length: f64,
	color: &str,
) {
	let t = boundary_parameter(start, control, end, node_radius);
	let tip = quadratic_point(start, control, end, t);
	let (tx, ty) = quadratic_tangent(start, control, end, t);
	let norm = (tx * tx + ty * ty).sqrt();
	if norm < 1e-9 {
		return;
	}
	let (ux, uy) = (tx / norm, ty / norm);
	let (back_x, back_y) = (tip.0 - ux * length, tip.1 - uy * length);
	let (px, py) = (-uy * length * 0.5, ux * length * 0.5);

	surface.set_fill_style(color);
	surface.begin_path();
	surface.move_to(tip.0, tip.1);
	surface.line_to(back_x + px, back_y + py);
	surface.line_to(back_x - px, back_y - py);
	surface.close_path();
	surface.fill();
}
