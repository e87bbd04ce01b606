//! Serializable graph snapshot: the wire format exchanged with the host.
//!
//! Links reference their endpoints by node id. Nothing in here carries
//! simulation or presentation state; see [`super::adapter`] for the runtime form.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::Result;

/// Node identifier as assigned by the graph database.
pub type NodeId = i64;

/// Link identifier as assigned by the graph database.
pub type LinkId = i64;

/// Arbitrary property bag attached to nodes and links.
pub type Properties = Map<String, Value>;

/// A node in the snapshot.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GraphNode {
	/// Unique identifier. Links reference nodes through it.
	pub id: NodeId,
	/// Node labels, in database order.
	#[serde(default)]
	pub labels: Vec<String>,
	/// CSS fill color. An empty string selects the theme's default.
	#[serde(default)]
	pub color: String,
	/// Hidden nodes still take part in the layout but are not drawn.
	#[serde(default = "visible_by_default")]
	pub visible: bool,
	/// Host-owned expansion flag, carried through untouched.
	#[serde(default)]
	pub expand: bool,
	/// Host-owned collapse flag, carried through untouched.
	#[serde(default)]
	pub collapsed: bool,
	/// Node properties.
	#[serde(default)]
	pub data: Properties,
}

/// A directed, typed edge between two nodes.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GraphLink {
	/// Unique link identifier.
	pub id: LinkId,
	/// Relationship type, rendered as the edge label.
	#[serde(default)]
	pub relationship: String,
	/// CSS stroke color. An empty string selects the theme's default.
	#[serde(default)]
	pub color: String,
	/// Source node id.
	pub source: NodeId,
	/// Target node id.
	pub target: NodeId,
	/// Hidden links keep their spring but are not drawn.
	#[serde(default = "visible_by_default")]
	pub visible: bool,
	/// Host-owned expansion flag.
	#[serde(default)]
	pub expand: bool,
	/// Host-owned collapse flag.
	#[serde(default)]
	pub collapsed: bool,
	/// Signed curvature. Bends parallel edges apart and sizes self-loops.
	#[serde(default)]
	pub curve: f64,
	/// Link properties.
	#[serde(default)]
	pub data: Properties,
}

/// A complete, self-consistent set of nodes and links.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct GraphData {
	/// Nodes in draw order.
	#[serde(default)]
	pub nodes: Vec<GraphNode>,
	/// Links; endpoints must name nodes in `nodes`.
	#[serde(default)]
	pub links: Vec<GraphLink>,
}

impl GraphData {
	/// Parse a snapshot from its JSON representation.
	pub fn from_json(json: &str) -> Result<Self> {
		Ok(serde_json::from_str(json)?)
	}

	/// Serialize the snapshot to JSON.
	pub fn to_json(&self) -> Result<String> {
		Ok(serde_json::to_string(self)?)
	}
}

/// One entry of the display-text priority list.
///
/// The first entry whose property holds a non-blank string provides the node
/// caption. `ignore` makes the property name match case-insensitively.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct TextPriority {
	/// Property key to read.
	pub name: String,
	/// Match `name` case-insensitively.
	#[serde(default)]
	pub ignore: bool,
}

impl TextPriority {
	/// Priority entry for property `name`.
	pub fn new(name: impl Into<String>, ignore: bool) -> Self {
		Self {
			name: name.into(),
			ignore,
		}
	}
}

fn visible_by_default() -> bool {
	true
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn missing_optional_fields_take_defaults() {
		let data = GraphData::from_json(
			r#"{"nodes":[{"id":1},{"id":2,"visible":false}],
			    "links":[{"id":7,"source":1,"target":2,"relationship":"KNOWS"}]}"#,
		)
		.unwrap();

		assert!(data.nodes[0].visible);
		assert!(!data.nodes[1].visible);
		assert!(data.nodes[0].labels.is_empty());
		assert_eq!(data.links[0].curve, 0.0);
		assert!(data.links[0].visible);
		assert!(data.links[0].data.is_empty());
	}

	#[test]
	fn json_round_trip_keeps_properties() {
		let json = r##"{"nodes":[{"id":1,"labels":["Person"],"color":"#ff0000","visible":true,
			"expand":false,"collapsed":false,"data":{"name":"Alice","age":30}}],"links":[]}"##;
		let data = GraphData::from_json(json).unwrap();
		let again = GraphData::from_json(&data.to_json().unwrap()).unwrap();
		assert_eq!(data, again);
		assert_eq!(again.nodes[0].data["name"], "Alice");
	}

	#[test]
	fn malformed_json_is_reported() {
		assert!(GraphData::from_json("{\"nodes\": [").is_err());
	}
}
