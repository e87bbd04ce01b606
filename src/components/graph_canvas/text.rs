//! Node caption resolution and wrapping inside circular nodes.

use serde_json::Value;

use super::types::{GraphNode, TextPriority};

/// Half of the caption line height, in graph units, for the fixed label font.
///
/// Kept constant rather than measured so wrapping stays identical across
/// surfaces and the per-node cache never needs a font-dependent key.
pub const HALF_TEXT_HEIGHT: f64 = 1.125;

/// Appended to a truncated second line.
pub const ELLIPSIS: &str = "...";

/// Measured extent of a run of text.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextMetrics {
	/// Advance width.
	pub width: f64,
	/// Distance from the baseline to the top of the glyph box.
	/// Height above the baseline.
	pub ascent: f64,
	/// Distance from the baseline to the bottom of the glyph box.
	/// Depth below the baseline.
	pub descent: f64,
}

impl TextMetrics {
	/// Ascent plus descent.
	pub fn height(&self) -> f64 {
		self.ascent + self.descent
	}
}

/// Anything that can measure text in the current label font.
pub trait TextMeasure {
	fn measure_text(&self, text: &str) -> TextMetrics;
}

/// Fixed-advance measurer for headless layout and tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonospaceMetrics {
	/// Advance of every character.
	pub advance: f64,
	/// Height above the baseline.
	pub ascent: f64,
	/// Depth below the baseline.
	pub descent: f64,
}

impl Default for MonospaceMetrics {
	/// Roughly matches the 2px label font.
	fn default() -> Self {
		Self {
			advance: 1.0,
			ascent: 1.5,
			descent: 0.5,
		}
	}
}

impl TextMeasure for MonospaceMetrics {
	fn measure_text(&self, text: &str) -> TextMetrics {
		TextMetrics {
			width: text.chars().count() as f64 * self.advance,
			ascent: self.ascent,
			descent: self.descent,
		}
	}
}

/// Usable line width inside a circle of `radius`, one half-line off center.
pub fn chord_width(radius: f64) -> f64 {
	(radius * radius - HALF_TEXT_HEIGHT * HALF_TEXT_HEIGHT)
		.max(0.0)
		.sqrt() * 2.0
}

/// Wrap `text` into at most two lines that fit a circle of `radius`.
///
/// Words are packed greedily into the first line. A first word that is too
/// long on its own is broken mid-word and continues on the second line. An
/// overflowing second line is cut and ends with [`ELLIPSIS`]; if not even the
/// ellipsis fits, the second line is left empty.
pub fn wrap_text_for_circular_node<M: TextMeasure + ?Sized>(
	measure: &M,
	text: &str,
	radius: f64,
) -> [String; 2] {
	let width = |s: &str| measure.measure_text(s).width;
	let line_width = chord_width(radius);
	let ellipsis_width = width(ELLIPSIS);

	let words: Vec<&str> = text.split_whitespace().collect();
	let mut line1 = String::new();
	let mut line2 = String::new();

	for (i, word) in words.iter().enumerate() {
		let candidate = if line1.is_empty() {
			(*word).to_string()
		} else {
			format!("{line1} {word}")
		};

		if width(&candidate) <= line_width {
			line1 = candidate;
		} else if line1.is_empty() {
			let mut partial = (*word).to_string();
			while !partial.is_empty() && width(&partial) > line_width {
				partial.pop();
			}
			let rest = std::iter::once(&word[partial.len()..])
				.chain(words[i + 1..].iter().copied())
				.collect::<Vec<_>>()
				.join(" ");
			line1 = partial;
			line2 = rest;
			break;
		} else {
			line2 = words[i..].join(" ");
			break;
		}
	}

	if !line2.is_empty() && width(&line2) > line_width {
		while !line2.is_empty() && width(&line2) + ellipsis_width > line_width {
			line2.pop();
		}
		if ellipsis_width <= line_width {
			line2.push_str(ELLIPSIS);
		}
	}

	[line1, line2]
}

/// Caption for a node: the first non-blank string property named by
/// `priorities`, or the node id.
pub fn node_display_text(node: &GraphNode, priorities: &[TextPriority]) -> String {
	for priority in priorities {
		let key = if priority.ignore {
			let wanted = priority.name.to_lowercase();
			node.data.keys().find(|k| k.to_lowercase() == wanted)
		} else {
			node.data.get_key_value(&priority.name).map(|(k, _)| k)
		};

		if let Some(Value::String(value)) = key.and_then(|k| node.data.get(k)) {
			if !value.trim().is_empty() {
				return value.clone();
			}
		}
	}
	node.id.to_string()
}

#[cfg(test)]
mod tests {
	use super::super::types::Properties;
	use super::*;

	const MONO: MonospaceMetrics = MonospaceMetrics {
		advance: 1.0,
		ascent: 1.5,
		descent: 0.5,
	};

	fn node_with(props: &[(&str, Value)]) -> GraphNode {
		let mut data = Properties::new();
		for (k, v) in props {
			data.insert((*k).to_string(), v.clone());
		}
		GraphNode {
			id: 42,
			labels: vec![],
			color: String::new(),
			visible: true,
			expand: false,
			collapsed: false,
			data,
		}
	}

	#[test]
	fn short_text_stays_on_one_line() {
		let [l1, l2] = wrap_text_for_circular_node(&MONO, "Alice", 5.0);
		assert_eq!(l1, "Alice");
		assert_eq!(l2, "");
	}

	#[test]
	fn words_spill_to_second_line() {
		// chord at r=5 is 2*sqrt(25 - 1.265625) ~= 9.74
		let [l1, l2] = wrap_text_for_circular_node(&MONO, "Ada Lovelace Byron", 5.0);
		assert_eq!(l1, "Ada");
		assert_eq!(l2, "Lovela...");
		assert!(MONO.measure_text(&l2).width <= chord_width(5.0));
	}

	#[test]
	fn long_first_word_is_hard_broken() {
		let [l1, l2] = wrap_text_for_circular_node(&MONO, "Supercalifragilistic", 5.0);
		assert_eq!(l1, "Supercali");
		assert_eq!(l2, "fragil...");
	}

	#[test]
	fn broken_word_remainder_leads_second_line() {
		let [l1, l2] = wrap_text_for_circular_node(&MONO, "abcdefghijkl xy", 5.0);
		assert_eq!(l1, "abcdefghi");
		assert_eq!(l2, "jkl xy");
	}

	#[test]
	fn tiny_circle_drops_everything_that_cannot_fit() {
		let [l1, l2] = wrap_text_for_circular_node(&MONO, "hello", 1.0);
		assert_eq!(l1, "");
		assert_eq!(l2, "");
	}

	#[test]
	fn empty_text_yields_empty_lines() {
		assert_eq!(
			wrap_text_for_circular_node(&MONO, "   ", 5.0),
			[String::new(), String::new()]
		);
	}

	#[test]
	fn priority_picks_first_non_blank_string() {
		let node = node_with(&[
			("name", Value::from("Alice")),
			("title", Value::from("Dr")),
		]);
		let priorities = [TextPriority::new("name", false)];
		assert_eq!(node_display_text(&node, &priorities), "Alice");
		assert_eq!(node_display_text(&node, &[]), "42");
	}

	#[test]
	fn blank_and_non_string_values_are_skipped() {
		let node = node_with(&[
			("name", Value::from("  ")),
			("age", Value::from(31)),
			("title", Value::from("Dr")),
		]);
		let priorities = [
			TextPriority::new("name", false),
			TextPriority::new("age", false),
			TextPriority::new("title", false),
		];
		assert_eq!(node_display_text(&node, &priorities), "Dr");
	}

	#[test]
	fn ignore_case_matches_property_name_loosely() {
		let node = node_with(&[("Name", Value::from("Bob"))]);
		assert_eq!(
			node_display_text(&node, &[TextPriority::new("name", false)]),
			"42"
		);
		assert_eq!(
			node_display_text(&node, &[TextPriority::new("NAME", true)]),
			"Bob"
		);
	}
}
