//! graph-canvas: Interactive property-graph visualization for the browser.
//!
//! This crate provides a WASM-based canvas component that lays out nodes with
//! a degree-aware force simulation and draws curved, labelled relationships
//! with pan, zoom and selection.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::graph_canvas::{
	CanvasConfig, ConfigPatch, GraphCanvas, GraphCanvasView, GraphData, GraphError, GraphLink,
	GraphNode, PointerEvent, TextPriority, Theme, ThemeMode,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("graph-canvas: logging initialized");
}

/// Load graph data from a script element with id="graph-data".
/// Expected format: JSON with { nodes: [...], links: [...] }
fn load_graph_data() -> Option<GraphData> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("graph-data")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match GraphData::from_json(&json_text) {
		Ok(data) => {
			info!(
				"graph-canvas: loaded {} nodes, {} links",
				data.nodes.len(),
				data.links.len()
			);
			Some(data)
		}
		Err(e) => {
			warn!("graph-canvas: failed to parse graph data: {e}");
			None
		}
	}
}

/// Main application component.
/// Loads graph data from the DOM and renders it full-window.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph_data = load_graph_data().unwrap_or_default();
	let graph_signal = Signal::derive(move || graph_data.clone());
	let priorities = vec![
		TextPriority::new("name", true),
		TextPriority::new("title", true),
	];

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Graph Canvas" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<GraphCanvasView data=graph_signal fullscreen=true display_text_priority=priorities />
			<div class="graph-overlay">
				<h1>"Graph Canvas"</h1>
				<p class="subtitle">"Drag nodes to pin them. Scroll to zoom. Right-click to select, Ctrl to add."</p>
			</div>
		</div>
	}
}
