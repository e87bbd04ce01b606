//! Velocity-Verlet style force simulation with alpha cooling.
//!
//! Node bodies live in a side table indexed by [`NodeHandle`], separate from the
//! graph values. Each tick applies the link, charge, center and collision
//! forces, then integrates positions. The simulation halts once alpha falls
//! below `alpha_min` or either cooldown budget (ticks or elapsed time) is spent.

use std::f64::consts::PI;

use super::adapter::{NodeHandle, RuntimeGraph};
use super::forces::Forces;
use super::quadtree::QuadNode;

const INITIAL_RADIUS: f64 = 10.0;
const ALPHA_MIN: f64 = 0.001;
const VELOCITY_DECAY: f64 = 0.4;
/// Charge is not weakened further below this distance.
const CHARGE_DISTANCE_MIN: f64 = 1.0;

/// Simulation-owned state of one node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Body {
	/// Graph-space position.
	pub x: f64,
	/// Graph-space position.
	pub y: f64,
	/// Velocity carried into the next tick.
	pub vx: f64,
	/// Velocity carried into the next tick.
	pub vy: f64,
	/// Pinned position. A pinned node ignores forces.
	pub fx: Option<f64>,
	/// Pinned y.
	pub fy: Option<f64>,
}

impl Body {
	/// `(x, y)`.
	pub fn position(&self) -> (f64, f64) {
		(self.x, self.y)
	}

	/// Pinned on either axis.
	pub fn is_pinned(&self) -> bool {
		self.fx.is_some() || self.fy.is_some()
	}
}

/// Result of advancing the simulation by one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
	/// A tick was applied.
	Stepped,
	/// The simulation settled during this frame. Reported once per run.
	Stopped,
	/// Already settled; nothing moved.
	Idle,
}

/// Linear congruential generator for the tiny jitter that separates
/// coincident nodes. Deterministic so layouts are reproducible.
#[derive(Clone, Debug)]
struct Lcg(u64);

impl Lcg {
	fn next(&mut self) -> f64 {
		const A: u64 = 1_664_525;
		const C: u64 = 1_013_904_223;
		const M: u64 = 1 << 32;
		self.0 = (A * self.0 + C) % M;
		self.0 as f64 / M as f64
	}

	fn jiggle(&mut self) -> f64 {
		(self.next() - 0.5) * 1e-6
	}
}

/// The layout integrator for one snapshot.
#[derive(Clone, Debug)]
pub struct Simulation {
	bodies: Vec<Body>,
	alpha: f64,
	alpha_min: f64,
	alpha_decay: f64,
	alpha_target: f64,
	velocity_decay: f64,
	ticks: u32,
	cooldown_ticks: Option<u32>,
	/// Wall-clock milliseconds since the run started.
	elapsed_ms: f64,
	cooldown_time_ms: Option<f64>,
	running: bool,
	rng: Lcg,
}

impl Simulation {
	/// Place `node_count` bodies on a phyllotaxis spiral around the origin.
	pub fn new(node_count: usize, cooldown_ticks: Option<u32>) -> Self {
		let initial_angle = PI * (3.0 - 5.0f64.sqrt());
		let bodies = (0..node_count)
			.map(|i| {
				let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
				let angle = i as f64 * initial_angle;
				Body {
					x: radius * angle.cos(),
					y: radius * angle.sin(),
					..Body::default()
				}
			})
			.collect();

		Self {
			bodies,
			alpha: 1.0,
			alpha_min: ALPHA_MIN,
			alpha_decay: 1.0 - ALPHA_MIN.powf(1.0 / 300.0),
			alpha_target: 0.0,
			velocity_decay: 1.0 - VELOCITY_DECAY,
			ticks: 0,
			cooldown_ticks,
			elapsed_ms: 0.0,
			cooldown_time_ms: None,
			running: true,
			rng: Lcg(1),
		}
	}

	/// Bodies in arena order.
	pub fn bodies(&self) -> &[Body] {
		&self.bodies
	}

	/// Body at `handle`, if it exists.
	pub fn body(&self, handle: NodeHandle) -> Option<&Body> {
		self.bodies.get(handle.index())
	}

	/// Position of `handle`; the origin for unknown handles.
	pub fn position(&self, handle: NodeHandle) -> (f64, f64) {
		self.body(handle).map(Body::position).unwrap_or((0.0, 0.0))
	}

	/// Current cooling temperature.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Frames stepped in the current run.
	pub fn ticks(&self) -> u32 {
		self.ticks
	}

	/// `false` once the current run stopped.
	pub fn is_running(&self) -> bool {
		self.running
	}

	/// Tick budget of the current run.
	pub fn cooldown_ticks(&self) -> Option<u32> {
		self.cooldown_ticks
	}

	/// `None` lets the simulation run until alpha decays.
	pub fn set_cooldown_ticks(&mut self, ticks: Option<u32>) {
		self.cooldown_ticks = ticks;
	}

	/// Wall-clock budget of the current run.
	pub fn cooldown_time_ms(&self) -> Option<f64> {
		self.cooldown_time_ms
	}

	/// Wall-clock budget per run. `None` removes the limit.
	pub fn set_cooldown_time_ms(&mut self, limit: Option<f64>) {
		self.cooldown_time_ms = limit;
	}

	/// Wall-clock time spent in the current run.
	pub fn elapsed_ms(&self) -> f64 {
		self.elapsed_ms
	}

	/// Restart cooling from full energy.
	pub fn reheat(&mut self) {
		self.alpha = 1.0;
		self.ticks = 0;
		self.elapsed_ms = 0.0;
		self.running = true;
	}

	/// Fix a node at `(x, y)` until [`Simulation::unpin`].
	pub fn pin(&mut self, handle: NodeHandle, x: f64, y: f64) {
		if let Some(body) = self.bodies.get_mut(handle.index()) {
			body.fx = Some(x);
			body.fy = Some(y);
			body.x = x;
			body.y = y;
		}
	}

	/// Release a pinned node back to the forces.
	pub fn unpin(&mut self, handle: NodeHandle) {
		if let Some(body) = self.bodies.get_mut(handle.index()) {
			body.fx = None;
			body.fy = None;
		}
	}

	/// Advance one animation frame that took `dt_ms`, honoring both cooldown
	/// budgets.
	pub fn step(&mut self, graph: &RuntimeGraph, forces: &Forces, dt_ms: f64) -> TickOutcome {
		if !self.running {
			return TickOutcome::Idle;
		}
		self.ticks += 1;
		self.elapsed_ms += dt_ms.max(0.0);
		let over_ticks = self.cooldown_ticks.is_some_and(|limit| self.ticks > limit);
		let over_time = self
			.cooldown_time_ms
			.is_some_and(|limit| self.elapsed_ms > limit);
		if over_ticks || over_time || self.alpha < self.alpha_min {
			self.running = false;
			return TickOutcome::Stopped;
		}
		self.tick(graph, forces);
		TickOutcome::Stepped
	}

	/// Apply one raw tick regardless of cooldown state.
	pub fn tick(&mut self, graph: &RuntimeGraph, forces: &Forces) {
		self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
		let alpha = self.alpha;

		self.apply_links(graph, forces, alpha);
		self.apply_charge(forces, alpha);
		self.apply_center(forces);
		self.apply_collision(forces);

		for body in &mut self.bodies {
			match body.fx {
				Some(fx) => {
					body.x = fx;
					body.vx = 0.0;
				}
				None => {
					body.vx *= self.velocity_decay;
					body.x += body.vx;
				}
			}
			match body.fy {
				Some(fy) => {
					body.y = fy;
					body.vy = 0.0;
				}
				None => {
					body.vy *= self.velocity_decay;
					body.y += body.vy;
				}
			}
		}
	}

	fn apply_links(&mut self, graph: &RuntimeGraph, forces: &Forces, alpha: f64) {
		for (link, spring) in graph.links().iter().zip(&forces.link.springs) {
			if link.is_self_loop() {
				continue;
			}
			let (s, t) = (link.source.index(), link.target.index());
			let (source, target) = (&self.bodies[s], &self.bodies[t]);
			let mut x = target.x + target.vx - source.x - source.vx;
			let mut y = target.y + target.vy - source.y - source.vy;
			if x == 0.0 {
				x = self.rng.jiggle();
			}
			if y == 0.0 {
				y = self.rng.jiggle();
			}
			let mut l = (x * x + y * y).sqrt();
			l = (l - spring.distance) / l * alpha * spring.strength;
			x *= l;
			y *= l;

			let b = spring.bias;
			self.bodies[t].vx -= x * b;
			self.bodies[t].vy -= y * b;
			self.bodies[s].vx += x * (1.0 - b);
			self.bodies[s].vy += y * (1.0 - b);
		}
	}

	fn apply_charge(&mut self, forces: &Forces, alpha: f64) {
		let charge = &forces.charge;
		let positions: Vec<(f64, f64)> = self.bodies.iter().map(Body::position).collect();
		let Some(tree) = QuadNode::build(&positions, &[]) else {
			return;
		};
		let theta2 = charge.theta * charge.theta;
		let max2 = charge.distance_max * charge.distance_max;
		let min2 = CHARGE_DISTANCE_MIN * CHARGE_DISTANCE_MIN;
		let rng = &mut self.rng;

		for (i, &(px, py)) in positions.iter().enumerate() {
			let (mut ax, mut ay) = (0.0, 0.0);
			tree.visit(&mut |cell| {
				if cell.mass <= 0.0 || cell.bounds.distance_sq_to((px, py)) >= max2 {
					return true;
				}

				if !cell.is_leaf() {
					let (dx, dy) = (cell.center_of_mass.0 - px, cell.center_of_mass.1 - py);
					let mut l = dx * dx + dy * dy;
					let w = cell.bounds.side_length();
					if w * w / theta2 < l {
						if l < max2 {
							if l < min2 {
								l = (min2 * l).sqrt();
							}
							let scale = charge.strength * cell.mass * alpha / l;
							ax += dx * scale;
							ay += dy * scale;
						}
						return true;
					}
					return false;
				}

				for &j in &cell.indices {
					if j == i {
						continue;
					}
					let (mut dx, mut dy) = (positions[j].0 - px, positions[j].1 - py);
					let mut l = dx * dx + dy * dy;
					if l >= max2 {
						continue;
					}
					if dx == 0.0 {
						dx = rng.jiggle();
						l += dx * dx;
					}
					if dy == 0.0 {
						dy = rng.jiggle();
						l += dy * dy;
					}
					if l < min2 {
						l = (min2 * l).sqrt();
					}
					let scale = charge.strength * alpha / l;
					ax += dx * scale;
					ay += dy * scale;
				}
				true
			});
			self.bodies[i].vx += ax;
			self.bodies[i].vy += ay;
		}
	}

	fn apply_center(&mut self, forces: &Forces) {
		let center = &forces.center;
		let n = self.bodies.len();
		if n == 0 {
			return;
		}
		let (sx, sy) = self
			.bodies
			.iter()
			.fold((0.0, 0.0), |(sx, sy), b| (sx + b.x, sy + b.y));
		let shift_x = (sx / n as f64 - center.x) * center.strength;
		let shift_y = (sy / n as f64 - center.y) * center.strength;
		for body in &mut self.bodies {
			body.x -= shift_x;
			body.y -= shift_y;
		}
	}

	fn apply_collision(&mut self, forces: &Forces) {
		let collision = &forces.collision;
		let radii = &collision.radii;
		if radii.len() != self.bodies.len() {
			return;
		}

		for _ in 0..collision.iterations {
			let predicted: Vec<(f64, f64)> = self
				.bodies
				.iter()
				.map(|b| (b.x + b.vx, b.y + b.vy))
				.collect();
			let Some(tree) = QuadNode::build(&predicted, radii) else {
				return;
			};
			let (bodies, rng) = (&mut self.bodies, &mut self.rng);

			for (i, &(xi, yi)) in predicted.iter().enumerate() {
				let ri = radii[i];
				let ri2 = ri * ri;
				tree.visit(&mut |cell| {
					let reach = ri + cell.max_radius;
					if cell.bounds.distance_sq_to((xi, yi)) > reach * reach {
						return true;
					}
					if !cell.is_leaf() {
						return false;
					}
					for &j in &cell.indices {
						if j <= i {
							continue;
						}
						let rj = radii[j];
						let r = ri + rj;
						let mut x = xi - bodies[j].x - bodies[j].vx;
						let mut y = yi - bodies[j].y - bodies[j].vy;
						let mut l = x * x + y * y;
						if l >= r * r {
							continue;
						}
						if x == 0.0 {
							x = rng.jiggle();
							l += x * x;
						}
						if y == 0.0 {
							y = rng.jiggle();
							l += y * y;
						}
						let d = l.sqrt();
						let push = (r - d) / d * collision.strength;
						x *= push;
						y *= push;
						let share = rj * rj / (ri2 + rj * rj);
						bodies[i].vx += x * share;
						bodies[i].vy += y * share;
						bodies[j].vx -= x * (1.0 - share);
						bodies[j].vy -= y * (1.0 - share);
					}
					true
				});
			}
		}
	}
}
