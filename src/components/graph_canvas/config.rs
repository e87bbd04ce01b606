//! Host-facing configuration: sizes, colors, caption priorities and callbacks.
//!
//! [`CanvasConfig`] is the full resolved configuration. Hosts send partial
//! updates as a [`ConfigPatch`]; only the fields that are `Some` change.

use std::fmt;
use std::rc::Rc;

use super::adapter::RuntimeLink;
use super::forces::ForceConstants;
use super::render::RenderStyle;
use super::state::Element;
use super::theme::{Theme, ThemeMode};
use super::types::{GraphNode, TextPriority};

/// Pointer position in surface pixels plus the modifier state callbacks see.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerEvent {
	/// Horizontal offset from the surface's left edge.
	pub x: f64,
	/// Vertical offset from the surface's top edge.
	pub y: f64,
	/// Ctrl held while the event fired.
	pub ctrl_key: bool,
}

impl PointerEvent {
	/// Event without modifiers.
	pub fn new(x: f64, y: f64) -> Self {
		Self {
			x,
			y,
			ctrl_key: false,
		}
	}

	/// Same position with Ctrl held.
	pub fn with_ctrl(self) -> Self {
		Self {
			ctrl_key: true,
			..self
		}
	}
}

/// Click on a node.
pub type NodeCallback = Rc<dyn Fn(&GraphNode, &PointerEvent)>;
/// Click on a link.
pub type LinkCallback = Rc<dyn Fn(&RuntimeLink, &PointerEvent)>;
/// Receives the newly hovered node, or `None` when the pointer left it.
pub type NodeHoverCallback = Rc<dyn Fn(Option<&GraphNode>)>;
/// Receives the newly hovered link, or `None`.
pub type LinkHoverCallback = Rc<dyn Fn(Option<&RuntimeLink>)>;
/// Click on empty canvas.
pub type BackgroundCallback = Rc<dyn Fn(&PointerEvent)>;
/// Receives the node and its new `expand` flag after a double click.
pub type NodeToggleCallback = Rc<dyn Fn(&GraphNode, bool)>;
/// Receives the whole internal selection after it changed.
pub type SelectionCallback = Rc<dyn Fn(&[Element])>;
/// Fired when the first layout run of a snapshot settles.
pub type EngineStopCallback = Rc<dyn Fn()>;
/// Host-side selection test for nodes.
pub type NodePredicate = Rc<dyn Fn(&GraphNode) -> bool>;
/// Host-side selection test for links.
pub type LinkPredicate = Rc<dyn Fn(&RuntimeLink) -> bool>;

/// Default wall-clock budget of one layout run.
pub const DEFAULT_COOLDOWN_TIME_MS: f64 = 1000.0;

/// Resolved canvas configuration.
#[derive(Clone)]
pub struct CanvasConfig {
	/// Surface width in CSS pixels.
	pub width: f64,
	/// Surface height in CSS pixels.
	pub height: f64,
	/// Overrides the theme background.
	pub background_color: Option<String>,
	/// Overrides the theme foreground.
	pub foreground_color: Option<String>,
	/// Light, dark or follow the host.
	pub theme: ThemeMode,
	/// Host color-scheme preference, consulted for [`ThemeMode::System`].
	pub prefers_dark: bool,
	/// Node properties tried in order for captions.
	pub display_text_priority: Vec<TextPriority>,
	/// Tick budget per run; `None` runs until alpha settles.
	pub cooldown_ticks: Option<u32>,
	/// Wall-clock budget per run in milliseconds; `None` removes it.
	pub cooldown_time_ms: Option<f64>,
	/// Fit the camera to the graph when its first layout run settles.
	pub zoom_to_fit_on_stop: bool,
	/// Primary click on a node.
	pub on_node_click: Option<NodeCallback>,
	/// Secondary click on a node, after the selection was updated.
	pub on_node_right_click: Option<NodeCallback>,
	/// Secondary click on a link, after the selection was updated.
	pub on_link_right_click: Option<LinkCallback>,
	/// Hovered node changed.
	pub on_node_hover: Option<NodeHoverCallback>,
	/// Hovered link changed.
	pub on_link_hover: Option<LinkHoverCallback>,
	/// Primary click on empty canvas.
	pub on_background_click: Option<BackgroundCallback>,
	/// Secondary click on empty canvas.
	pub on_background_right_click: Option<BackgroundCallback>,
	/// Double click on a node.
	pub on_node_toggle: Option<NodeToggleCallback>,
	/// Internal selection changed.
	pub on_selection_change: Option<SelectionCallback>,
	/// First layout run settled.
	pub on_engine_stop: Option<EngineStopCallback>,
	/// Extra selection highlight decided by the host.
	pub is_node_selected: Option<NodePredicate>,
	/// Extra selection highlight decided by the host.
	pub is_link_selected: Option<LinkPredicate>,
}

impl Default for CanvasConfig {
	fn default() -> Self {
		Self {
			width: 800.0,
			height: 600.0,
			background_color: None,
			foreground_color: None,
			theme: ThemeMode::default(),
			prefers_dark: false,
			display_text_priority: Vec::new(),
			cooldown_ticks: None,
			cooldown_time_ms: Some(DEFAULT_COOLDOWN_TIME_MS),
			zoom_to_fit_on_stop: true,
			on_node_click: None,
			on_node_right_click: None,
			on_link_right_click: None,
			on_node_hover: None,
			on_link_hover: None,
			on_background_click: None,
			on_background_right_click: None,
			on_node_toggle: None,
			on_selection_change: None,
			on_engine_stop: None,
			is_node_selected: None,
			is_link_selected: None,
		}
	}
}

impl fmt::Debug for CanvasConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CanvasConfig")
			.field("width", &self.width)
			.field("height", &self.height)
			.field("background_color", &self.background_color)
			.field("foreground_color", &self.foreground_color)
			.field("theme", &self.theme)
			.field("prefers_dark", &self.prefers_dark)
			.field("display_text_priority", &self.display_text_priority)
			.field("cooldown_ticks", &self.cooldown_ticks)
			.field("cooldown_time_ms", &self.cooldown_time_ms)
			.field("zoom_to_fit_on_stop", &self.zoom_to_fit_on_stop)
			.finish_non_exhaustive()
	}
}

/// What a merged patch touched, so the facade rebuilds only what it must.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConfigChanges {
	/// Surface size.
	pub size: bool,
	/// Colors or theme.
	pub style: bool,
	/// Caption priority list.
	pub priorities: bool,
	/// Tick or time budget.
	pub cooldown: bool,
}

impl CanvasConfig {
	/// Merge `patch` into the configuration.
	pub fn apply(&mut self, patch: ConfigPatch) -> ConfigChanges {
		let mut changes = ConfigChanges::default();

		if let Some(width) = patch.width {
			changes.size |= width != self.width;
			self.width = width;
		}
		if let Some(height) = patch.height {
			changes.size |= height != self.height;
			self.height = height;
		}
		if let Some(color) = patch.background_color {
			self.background_color = Some(color);
			changes.style = true;
		}
		if let Some(color) = patch.foreground_color {
			self.foreground_color = Some(color);
			changes.style = true;
		}
		if let Some(theme) = patch.theme {
			changes.style |= theme != self.theme;
			self.theme = theme;
		}
		if let Some(prefers_dark) = patch.prefers_dark {
			changes.style |= prefers_dark != self.prefers_dark;
			self.prefers_dark = prefers_dark;
		}
		if let Some(priorities) = patch.display_text_priority {
			changes.priorities = priorities != self.display_text_priority;
			self.display_text_priority = priorities;
		}
		if let Some(ticks) = patch.cooldown_ticks {
			changes.cooldown |= ticks != self.cooldown_ticks;
			self.cooldown_ticks = ticks;
		}
		if let Some(limit) = patch.cooldown_time_ms {
			changes.cooldown |= limit != self.cooldown_time_ms;
			self.cooldown_time_ms = limit;
		}
		if let Some(fit) = patch.zoom_to_fit_on_stop {
			self.zoom_to_fit_on_stop = fit;
		}

		macro_rules! replace {
			($($field:ident),* $(,)?) => {
				$(if let Some(value) = patch.$field {
					self.$field = Some(value);
				})*
			};
		}
		replace!(
			on_node_click,
			on_node_right_click,
			on_link_right_click,
			on_node_hover,
			on_link_hover,
			on_background_click,
			on_background_right_click,
			on_node_toggle,
			on_selection_change,
			on_engine_stop,
			is_node_selected,
			is_link_selected,
		);

		changes
	}

	/// Concrete theme after applying the system preference.
	pub fn theme(&self) -> Theme {
		Theme::resolve(self.theme, self.prefers_dark)
	}

	/// Colors and sizes the renderer draws with.
	pub fn render_style(&self, constants: &ForceConstants) -> RenderStyle {
		let theme = self.theme();
		RenderStyle {
			background: self
				.background_color
				.clone()
				.unwrap_or_else(|| theme.background.to_css()),
			foreground: self
				.foreground_color
				.clone()
				.unwrap_or_else(|| theme.foreground.to_css()),
			link_color: theme.link.to_css(),
			palette: theme.palette,
			node_radius: constants.node_size,
			text_radius: constants.node_size - constants.padding / 2.0,
		}
	}
}

/// Partial configuration update. `None` leaves a field unchanged.
///
/// Fields mirror [`CanvasConfig`].
#[derive(Clone, Default)]
pub struct ConfigPatch {
	/// New surface width.
	pub width: Option<f64>,
	/// New surface height.
	pub height: Option<f64>,
	/// Background override.
	pub background_color: Option<String>,
	/// Foreground override.
	pub foreground_color: Option<String>,
	/// Theme selection.
	pub theme: Option<ThemeMode>,
	/// Host color-scheme preference.
	pub prefers_dark: Option<bool>,
	/// Caption priority list. Clears cached captions when it differs.
	pub display_text_priority: Option<Vec<TextPriority>>,
	/// `Some(None)` lifts the tick budget.
	pub cooldown_ticks: Option<Option<u32>>,
	/// `Some(None)` lifts the time budget.
	pub cooldown_time_ms: Option<Option<f64>>,
	/// Fit on first settle.
	pub zoom_to_fit_on_stop: Option<bool>,
	/// Primary click on a node.
	pub on_node_click: Option<NodeCallback>,
	/// Secondary click on a node, after selection.
	pub on_node_right_click: Option<NodeCallback>,
	/// Secondary click on a link, after selection.
	pub on_link_right_click: Option<LinkCallback>,
	/// Hovered node changed.
	pub on_node_hover: Option<NodeHoverCallback>,
	/// Hovered link changed.
	pub on_link_hover: Option<LinkHoverCallback>,
	/// Primary click on empty canvas.
	pub on_background_click: Option<BackgroundCallback>,
	/// Secondary click on empty canvas.
	pub on_background_right_click: Option<BackgroundCallback>,
	/// Double click on a node.
	pub on_node_toggle: Option<NodeToggleCallback>,
	/// Internal selection changed.
	pub on_selection_change: Option<SelectionCallback>,
	/// First layout run settled.
	pub on_engine_stop: Option<EngineStopCallback>,
	/// Extra selection highlight decided by the host.
	pub is_node_selected: Option<NodePredicate>,
	/// Extra selection highlight decided by the host.
	pub is_link_selected: Option<LinkPredicate>,
}

impl ConfigPatch {
	/// Empty patch.
	pub fn new() -> Self {
		Self::default()
	}

	/// Surface size.
	pub fn size(mut self, width: f64, height: f64) -> Self {
		self.width = Some(width);
		self.height = Some(height);
		self
	}

	/// Theme selection.
	pub fn theme(mut self, theme: ThemeMode) -> Self {
		self.theme = Some(theme);
		self
	}

	/// Caption priority list.
	pub fn display_text_priority(mut self, priorities: Vec<TextPriority>) -> Self {
		self.display_text_priority = Some(priorities);
		self
	}

	/// `None` lifts the tick budget.
	pub fn cooldown_ticks(mut self, ticks: Option<u32>) -> Self {
		self.cooldown_ticks = Some(ticks);
		self
	}

	/// `None` lifts the time budget.
	pub fn cooldown_time_ms(mut self, limit: Option<f64>) -> Self {
		self.cooldown_time_ms = Some(limit);
		self
	}

	/// Called when the first layout run settles.
	pub fn on_engine_stop(mut self, callback: impl Fn() + 'static) -> Self {
		self.on_engine_stop = Some(Rc::new(callback));
		self
	}

	/// Primary click on a node.
	pub fn on_node_click(mut self, callback: impl Fn(&GraphNode, &PointerEvent) + 'static) -> Self {
		self.on_node_click = Some(Rc::new(callback));
		self
	}

	/// Internal selection changed.
	pub fn on_selection_change(mut self, callback: impl Fn(&[Element]) + 'static) -> Self {
		self.on_selection_change = Some(Rc::new(callback));
		self
	}
}
