//! Shared fixtures for the integration suites.

#![allow(dead_code)]

use std::cell::RefCell;

use graph_canvas::components::graph_canvas::surface::Surface;
use graph_canvas::components::graph_canvas::text::{MonospaceMetrics, TextMeasure, TextMetrics};
use graph_canvas::{GraphData, GraphLink, GraphNode};
use serde_json::Map;

/// One recorded drawing call.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
	FillText(String),
	FillRect,
	BeginPath,
	ClosePath,
	Arc,
	QuadraticCurve,
	BezierCurve,
	LineTo,
}

/// Headless surface that records path and text calls.
#[derive(Default)]
pub struct RecordingSurface {
	pub calls: RefCell<Vec<Call>>,
}

impl RecordingSurface {
	pub fn count(&self, call: &Call) -> usize {
		self.calls.borrow().iter().filter(|c| *c == call).count()
	}

	fn push(&self, call: Call) {
		self.calls.borrow_mut().push(call);
	}
}

impl TextMeasure for RecordingSurface {
	fn measure_text(&self, text: &str) -> TextMetrics {
		MonospaceMetrics::default().measure_text(text)
	}
}

impl Surface for RecordingSurface {
	fn save(&self) {}
	fn restore(&self) {}
	fn translate(&self, _: f64, _: f64) {}
	fn scale(&self, _: f64) {}
	fn rotate(&self, _: f64) {}
	fn set_fill_style(&self, _: &str) {}
	fn set_stroke_style(&self, _: &str) {}
	fn set_line_width(&self, _: f64) {}
	fn set_font(&self, _: &str) {}
	fn set_text_align(&self, _: &str) {}
	fn set_text_baseline(&self, _: &str) {}
	fn fill_rect(&self, _: f64, _: f64, _: f64, _: f64) {
		self.push(Call::FillRect);
	}
	fn fill_text(&self, text: &str, _: f64, _: f64) {
		self.push(Call::FillText(text.to_string()));
	}
	fn begin_path(&self) {
		self.push(Call::BeginPath);
	}
	fn close_path(&self) {
		self.push(Call::ClosePath);
	}
	fn move_to(&self, _: f64, _: f64) {}
	fn line_to(&self, _: f64, _: f64) {
		self.push(Call::LineTo);
	}
	fn quadratic_curve_to(&self, _: f64, _: f64, _: f64, _: f64) {
		self.push(Call::QuadraticCurve);
	}
	fn bezier_curve_to(&self, _: f64, _: f64, _: f64, _: f64, _: f64, _: f64) {
		self.push(Call::BezierCurve);
	}
	fn arc(&self, _: f64, _: f64, _: f64, _: f64, _: f64) {
		self.push(Call::Arc);
	}
	fn fill(&self) {}
	fn stroke(&self) {}
}

pub fn node(id: i64) -> GraphNode {
	GraphNode {
		id,
		labels: vec!["Person".into()],
		color: String::new(),
		visible: true,
		expand: false,
		collapsed: false,
		data: Map::new(),
	}
}

pub fn link(id: i64, source: i64, target: i64) -> GraphLink {
	GraphLink {
		id,
		relationship: "KNOWS".into(),
		color: String::new(),
		source,
		target,
		visible: true,
		expand: false,
		collapsed: false,
		curve: 0.0,
		data: Map::new(),
	}
}

/// Nodes `1..=n` with links given as index pairs into that range.
pub fn graph(n: usize, edges: &[(usize, usize, f64)]) -> GraphData {
	GraphData {
		nodes: (1..=n as i64).map(node).collect(),
		links: edges
			.iter()
			.enumerate()
			.map(|(i, &(s, t, curve))| GraphLink {
				curve,
				..link(i as i64 + 100, (s % n) as i64 + 1, (t % n) as i64 + 1)
			})
			.collect(),
	}
}
