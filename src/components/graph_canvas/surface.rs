//! The 2D drawing calls the renderer relies on.
//!
//! [`Surface`] mirrors the subset of the canvas API used by the render
//! pipeline so that drawing can target an HTML canvas in the browser or a
//! recording surface in tests.

use web_sys::CanvasRenderingContext2d;

use super::text::{TextMeasure, TextMetrics};

/// A 2D drawing surface with canvas semantics.
///
/// Methods take `&self`, matching the browser context; implementations that
/// record state use interior mutability.
pub trait Surface: TextMeasure {
	fn save(&self);
	fn restore(&self);
	fn translate(&self, x: f64, y: f64);
	fn scale(&self, k: f64);
	fn rotate(&self, angle: f64);

	fn set_fill_style(&self, css: &str);
	fn set_stroke_style(&self, css: &str);
	fn set_line_width(&self, width: f64);
	fn set_font(&self, font: &str);
	fn set_text_align(&self, align: &str);
	fn set_text_baseline(&self, baseline: &str);

	fn fill_rect(&self, x: f64, y: f64, w: f64, h: f64);
	fn fill_text(&self, text: &str, x: f64, y: f64);

	fn begin_path(&self);
	fn close_path(&self);
	fn move_to(&self, x: f64, y: f64);
	fn line_to(&self, x: f64, y: f64);
	fn quadratic_curve_to(&self, cx: f64, cy: f64, x: f64, y: f64);
	#[allow(clippy::too_many_arguments)]
	fn bezier_curve_to(&self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64);
	fn arc(&self, x: f64, y: f64, radius: f64, start: f64, end: f64);
	fn fill(&self);
	fn stroke(&self);
}

impl TextMeasure for CanvasRenderingContext2d {
	fn measure_text(&self, text: &str) -> TextMetrics {
		CanvasRenderingContext2d::measure_text(self, text)
			.map(|m| TextMetrics {
				width: m.width(),
				ascent: m.actual_bounding_box_ascent(),
				descent: m.actual_bounding_box_descent(),
			})
			.unwrap_or_default()
	}
}

impl Surface for CanvasRenderingContext2d {
	fn save(&self) {
		CanvasRenderingContext2d::save(self);
	}

	fn restore(&self) {
		CanvasRenderingContext2d::restore(self);
	}

	fn translate(&self, x: f64, y: f64) {
		let _ = CanvasRenderingContext2d::translate(self, x, y);
	}

	fn scale(&self, k: f64) {
		let _ = CanvasRenderingContext2d::scale(self, k, k);
	}

	fn rotate(&self, angle: f64) {
		let _ = CanvasRenderingContext2d::rotate(self, angle);
	}

	fn set_fill_style(&self, css: &str) {
		self.set_fill_style_str(css);
	}

	fn set_stroke_style(&self, css: &str) {
		self.set_stroke_style_str(css);
	}

	fn set_line_width(&self, width: f64) {
		CanvasRenderingContext2d::set_line_width(self, width);
	}

	fn set_font(&self, font: &str) {
		CanvasRenderingContext2d::set_font(self, font);
	}

	fn set_text_align(&self, align: &str) {
		CanvasRenderingContext2d::set_text_align(self, align);
	}

	fn set_text_baseline(&self, baseline: &str) {
		CanvasRenderingContext2d::set_text_baseline(self, baseline);
	}

	fn fill_rect(&self, x: f64, y: f64, w: f64, h: f64) {
		CanvasRenderingContext2d::fill_rect(self, x, y, w, h);
	}

	fn fill_text(&self, text: &str, x: f64, y: f64) {
		let _ = CanvasRenderingContext2d::fill_text(self, text, x, y);
	}

	fn begin_path(&self) {
		CanvasRenderingContext2d::begin_path(self);
	}

	fn close_path(&self) {
		CanvasRenderingContext2d::close_path(self);
	}

	fn move_to(&self, x: f64, y: f64) {
		CanvasRenderingContext2d::move_to(self, x, y);
	}

	fn line_to(&self, x: f64, y: f64) {
		CanvasRenderingContext2d::line_to(self, x, y);
	}

	fn quadratic_curve_to(&self, cx: f64, cy: f64, x: f64, y: f64) {
		CanvasRenderingContext2d::quadratic_curve_to(self, cx, cy, x, y);
	}

	fn bezier_curve_to(&self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64) {
		CanvasRenderingContext2d::bezier_curve_to(self, c1x, c1y, c2x, c2y, x, y);
	}

	fn arc(&self, x: f64, y: f64, radius: f64, start: f64, end: f64) {
		let _ = CanvasRenderingContext2d::arc(self, x, y, radius, start, end);
	}

	fn fill(&self) {
		CanvasRenderingContext2d::fill(self);
	}

	fn stroke(&self) {
		CanvasRenderingContext2d::stroke(self);
	}
}
