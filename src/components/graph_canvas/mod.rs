//! Interactive property-graph canvas.
//!
//! Renders a graph of labelled nodes and typed relationships on a 2D surface:
//! - Degree-aware force layout (link, charge, collision, center) with cooldown
//! - Curved links, self-loops, arrowheads and rotated relationship labels
//! - Two-line node captions wrapped to the node circle
//! - Pan, zoom, zoom-to-fit, node dragging, hover and selection
//!
//! # Example
//!
//! ```ignore
//! use graph_canvas::{GraphCanvasView, GraphData};
//!
//! let data = GraphData::from_json(r#"{
//!     "nodes": [{"id": 1, "data": {"name": "Alice"}}, {"id": 2}],
//!     "links": [{"id": 1, "source": 1, "target": 2, "relationship": "KNOWS"}]
//! }"#)?;
//!
//! view! { <GraphCanvasView data=Signal::derive(move || data.clone()) fullscreen=true /> }
//! ```

pub mod adapter;
pub mod canvas;
mod component;
pub mod config;
pub mod degree;
pub mod error;
pub mod forces;
mod quadtree;
pub mod render;
pub mod simulation;
pub mod state;
pub mod surface;
pub mod text;
pub mod theme;
pub mod types;
pub mod viewport;

pub use canvas::GraphCanvas;
pub use component::GraphCanvasView;
pub use config::{CanvasConfig, ConfigPatch, PointerEvent};
pub use error::{GraphError, Result};
pub use state::Element;
pub use theme::{Theme, ThemeMode};
pub use types::{GraphData, GraphLink, GraphNode, TextPriority};
