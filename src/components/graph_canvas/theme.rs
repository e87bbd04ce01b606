//! Light and dark themes for the canvas.
//!
//! Provides the background/foreground pair used for labels and strokes, plus a
//! palette for nodes and links that arrive without a color.

use serde::{Deserialize, Serialize};

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red.
	pub r: u8,
	/// Green.
	pub g: u8,
	/// Blue.
	pub b: u8,
	/// Alpha in `0.0..=1.0`.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with explicit alpha.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color with alpha replaced.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// CSS `rgba(...)` string.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Fallback fills for nodes without a color, picked by arena position.
#[derive(Clone, Debug, PartialEq)]
pub struct NodePalette {
	/// Fill colors, cycled by node index.
	pub colors: Vec<Color>,
}

impl NodePalette {
	/// Built-in fills.
	pub fn default_palette() -> Self {
		Self {
			colors: vec![
				Color::rgb(113, 103, 223), // Violet
				Color::rgb(237, 112, 164), // Pink
				Color::rgb(240, 158, 84),  // Orange
				Color::rgb(85, 180, 157),  // Teal
				Color::rgb(97, 157, 227),  // Sky
				Color::rgb(191, 125, 212), // Orchid
				Color::rgb(224, 196, 84),  // Mustard
				Color::rgb(143, 163, 180), // Cool gray
			],
		}
	}

	/// Color for the node at `index`, wrapping around.
	pub fn get(&self, index: usize) -> Color {
		if self.colors.is_empty() {
			return Color::rgb(128, 128, 128);
		}
		self.colors[index % self.colors.len()]
	}
}

/// Which theme to draw with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
	/// Light background.
	Light,
	/// Dark background.
	Dark,
	/// Follow the host's color-scheme preference.
	#[default]
	System,
}

/// Complete visual theme.
#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
	/// Theme identifier.
	pub name: &'static str,
	/// Canvas fill and link label backdrop.
	pub background: Color,
	/// Node strokes and link label text.
	pub foreground: Color,
	/// Stroke for links without a color.
	pub link: Color,
	/// Node fills.
	pub palette: NodePalette,
}

impl Theme {
	/// Light theme.
	pub fn light() -> Self {
		Self {
			name: "light",
			background: Color::rgb(0xff, 0xff, 0xff),
			foreground: Color::rgb(0x1a, 0x1a, 0x1a),
			link: Color::rgba(0x1a, 0x1a, 0x1a, 0.6),
			palette: NodePalette::default_palette(),
		}
	}

	/// Dark theme.
	pub fn dark() -> Self {
		Self {
			name: "dark",
			background: Color::rgb(0x1a, 0x1a, 0x1a),
			foreground: Color::rgb(0xff, 0xff, 0xff),
			link: Color::rgba(0xff, 0xff, 0xff, 0.6),
			palette: NodePalette::default_palette(),
		}
	}

	/// Pick the concrete theme; `System` follows `prefers_dark`.
	pub fn resolve(mode: ThemeMode, prefers_dark: bool) -> Self {
		match mode {
			ThemeMode::Light => Self::light(),
			ThemeMode::Dark => Self::dark(),
			ThemeMode::System if prefers_dark => Self::dark(),
			ThemeMode::System => Self::light(),
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::light()
	}
}
