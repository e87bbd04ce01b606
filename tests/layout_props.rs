//! Degree-aware forces, caption wrapping and display-text resolution.

mod common;

use graph_canvas::components::graph_canvas::adapter::to_runtime;
use graph_canvas::components::graph_canvas::degree::DegreeIndex;
use graph_canvas::components::graph_canvas::forces::{ForceConstants, Forces};
use graph_canvas::components::graph_canvas::text::{
	ELLIPSIS, MonospaceMetrics, TextMeasure, chord_width, node_display_text,
	wrap_text_for_circular_node,
};
use graph_canvas::{GraphData, TextPriority};
use proptest::prelude::*;
use serde_json::Value;

use common::{link, node};

proptest! {
	#[test]
	fn link_distance_is_monotone_and_bounded(a in 0u32..200, b in 0u32..200) {
		let c = ForceConstants::default();
		let (lo, hi) = (a.min(b), a.max(b));
		prop_assert!(c.link_distance(lo) <= c.link_distance(hi));
		prop_assert!(c.link_distance(hi) <= c.max_link_distance);
		if hi < 20 {
			prop_assert_eq!(c.link_distance(hi), c.link_distance);
		}
	}

	#[test]
	fn link_strength_stays_between_floor_and_base(d in 0u32..500) {
		let c = ForceConstants::default();
		let s = c.link_strength(d);
		prop_assert!(s >= c.min_link_strength && s <= c.link_strength);
	}

	#[test]
	fn wrapped_lines_fit_the_chord(
		text in "[a-zA-Z]{1,14}( [a-zA-Z]{1,14}){0,5}",
		radius in 3.0f64..12.0,
	) {
		let mono = MonospaceMetrics::default();
		let chord = chord_width(radius);
		let [line1, line2] = wrap_text_for_circular_node(&mono, &text, radius);

		prop_assert!(mono.measure_text(&line1).width <= chord);
		prop_assert!(mono.measure_text(&line2).width <= chord);

		let kept: usize = line1.chars().filter(|c| !c.is_whitespace()).count()
			+ line2.trim_end_matches(ELLIPSIS).chars().filter(|c| !c.is_whitespace()).count();
		let total = text.chars().filter(|c| !c.is_whitespace()).count();
		if kept < total {
			prop_assert!(line2.ends_with(ELLIPSIS), "truncated caption must end in an ellipsis");
		}
	}
}

#[test]
fn single_edge_uses_base_forces() {
	let data = GraphData {
		nodes: vec![node(1), node(2)],
		links: vec![link(1, 1, 2)],
	};
	let graph = to_runtime(data).unwrap();
	let degrees = DegreeIndex::recompute(&graph);
	let c = ForceConstants::default();
	let forces = Forces::build(&graph, &degrees, &c);

	assert_eq!(degrees.as_slice(), &[1, 1]);
	assert_eq!(forces.link.springs[0].distance, 50.0);
	assert_eq!(forces.link.springs[0].strength, 0.5);
	assert_eq!(forces.collision.radii, vec![13.25, 13.25]);
}

#[test]
fn hub_links_are_longer_than_base() {
	let mut nodes = vec![node(0)];
	nodes.extend((1..=25).map(node));
	let links = (1..=25).map(|i| link(i, 0, i)).collect();
	let graph = to_runtime(GraphData { nodes, links }).unwrap();
	let degrees = DegreeIndex::recompute(&graph);
	let forces = Forces::build(&graph, &degrees, &ForceConstants::default());

	assert_eq!(degrees.degree_of(0), 25);
	for spring in &forces.link.springs {
		assert!(spring.distance > 50.0);
		assert_eq!(spring.distance, 57.5);
		assert!(spring.strength < 0.5);
	}
}

#[test]
fn display_text_follows_priorities() {
	let mut alice = node(7);
	alice.data.insert("name".into(), Value::from("Alice"));

	assert_eq!(
		node_display_text(&alice, &[TextPriority::new("name", false)]),
		"Alice"
	);
	assert_eq!(node_display_text(&alice, &[]), "7");
}
