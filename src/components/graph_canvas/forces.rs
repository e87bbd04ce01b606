//! Degree-aware force configuration.
//!
//! All four forces are plain data derived from the [`DegreeIndex`] and a set of
//! constants. [`Forces::build`] recreates them wholesale whenever the snapshot
//! or configuration changes; nothing is patched in place.

use super::adapter::RuntimeGraph;
use super::degree::DegreeIndex;

/// Static tuning constants for the layout.
#[derive(Clone, Debug, PartialEq)]
pub struct ForceConstants {
	/// Node circle radius in graph units.
	pub node_size: f64,
	/// Gap kept between a node's border and its caption.
	pub padding: f64,
	/// Base link distance (D0).
	pub link_distance: f64,
	/// Upper bound for the crowding-adjusted link distance (Dmax).
	pub max_link_distance: f64,
	/// Link strength for low-degree links (S0).
	pub link_strength: f64,
	/// Floor the strength decays toward for hub links (Smin).
	pub min_link_strength: f64,
	/// Collision force strength.
	pub collision_strength: f64,
	/// Collision relaxation passes per tick.
	pub collision_iterations: usize,
	/// Collision radius before degree padding.
	pub collision_base_radius: f64,
	/// Extra collision radius per square root of degree.
	pub high_degree_padding: f64,
	/// Negative values repel.
	pub charge_strength: f64,
	/// Nodes farther apart than this do not repel.
	pub charge_distance_max: f64,
	/// Barnes-Hut accuracy parameter.
	pub charge_theta: f64,
	/// Pull of the centering force.
	pub center_strength: f64,
	/// Degree past which link strength decays (Tdecay).
	pub degree_strength_decay: f64,
	/// Degree at which link distance starts to grow (T).
	pub crowding_threshold: f64,
}

impl Default for ForceConstants {
	fn default() -> Self {
		let node_size = 6.0;
		Self {
			node_size,
			padding: 2.0,
			link_distance: 50.0,
			max_link_distance: 80.0,
			link_strength: 0.5,
			min_link_strength: 0.3,
			collision_strength: 1.35,
			collision_iterations: 2,
			collision_base_radius: node_size * 2.0,
			high_degree_padding: 1.25,
			charge_strength: -5.0,
			charge_distance_max: 300.0,
			charge_theta: 0.9,
			center_strength: 0.4,
			degree_strength_decay: 15.0,
			crowding_threshold: 20.0,
		}
	}
}

impl ForceConstants {
	/// Preferred length of a link whose busier endpoint has `max_degree` links.
	pub fn link_distance(&self, max_degree: u32) -> f64 {
		let degree = max_degree as f64;
		if degree >= self.crowding_threshold {
			let extra = (degree - self.crowding_threshold) * 1.5;
			(self.link_distance + extra).min(self.max_link_distance)
		} else {
			self.link_distance
		}
	}

	/// Spring stiffness, decaying exponentially toward the floor for hubs.
	pub fn link_strength(&self, max_degree: u32) -> f64 {
		let degree = max_degree as f64;
		if degree <= self.degree_strength_decay {
			return self.link_strength;
		}
		let reduction = (degree - self.degree_strength_decay) / self.degree_strength_decay;
		let scaled = self.min_link_strength
			+ (self.link_strength - self.min_link_strength) * (-reduction).exp();
		scaled.max(self.min_link_strength)
	}

	/// Collision radius grows with the square root of the degree.
	pub fn collision_radius(&self, degree: u32) -> f64 {
		self.collision_base_radius + (degree as f64).sqrt() * self.high_degree_padding
	}
}

/// Spring parameters for one link, in link order.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkSpring {
	/// Rest length.
	pub distance: f64,
	/// Stiffness in `0.0..=1.0`.
	pub strength: f64,
	/// Share of the correction applied to the target; the rest moves the source.
	pub bias: f64,
}

/// Springs along every link.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinkForce {
	/// One spring per link, in link order.
	pub springs: Vec<LinkSpring>,
}

/// Keeps node circles from overlapping.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollisionForce {
	/// Radius per node, in arena order.
	pub radii: Vec<f64>,
	/// Correction applied per pass.
	pub strength: f64,
	/// Passes per tick.
	pub iterations: usize,
}

/// Many-body repulsion.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChargeForce {
	/// Negative values repel.
	pub strength: f64,
	/// Cutoff distance.
	pub distance_max: f64,
	/// Barnes-Hut accuracy.
	pub theta: f64,
}

/// Pulls the centroid toward a point.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CenterForce {
	/// Target x.
	pub x: f64,
	/// Target y.
	pub y: f64,
	/// Share of the offset corrected per tick.
	pub strength: f64,
}

/// The full force set for one snapshot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Forces {
	/// Link springs.
	pub link: LinkForce,
	/// Collision radii.
	pub collision: CollisionForce,
	/// Repulsion.
	pub charge: ChargeForce,
	/// Centering.
	pub center: CenterForce,
}

impl Forces {
	/// Derive every force from the degree index. Pure: same inputs, same forces.
	pub fn build(graph: &RuntimeGraph, degrees: &DegreeIndex, constants: &ForceConstants) -> Self {
		let springs = graph
			.links()
			.iter()
			.map(|link| {
				let max_degree = degrees.max_degree(link.source, link.target);
				let (ds, dt) = (
					degrees.degree(link.source) as f64,
					degrees.degree(link.target) as f64,
				);
				LinkSpring {
					distance: constants.link_distance(max_degree),
					strength: constants.link_strength(max_degree),
					bias: if ds + dt > 0.0 { ds / (ds + dt) } else { 0.5 },
				}
			})
			.collect();

		let radii = graph
			.handles()
			.map(|(handle, _)| constants.collision_radius(degrees.degree(handle)))
			.collect();

		Self {
			link: LinkForce { springs },
			collision: CollisionForce {
				radii,
				strength: constants.collision_strength,
				iterations: constants.collision_iterations,
			},
			charge: ChargeForce {
				strength: constants.charge_strength,
				distance_max: constants.charge_distance_max,
				theta: constants.charge_theta,
			},
			center: CenterForce {
				x: 0.0,
				y: 0.0,
				strength: constants.center_strength,
			},
		}
	}
}
