//! Conversion between the serializable snapshot and the runtime graph.
//!
//! The runtime graph stores nodes in an arena and resolves every link endpoint
//! to a [`NodeHandle`] once, at adoption time. Positions, velocities and cached
//! captions are kept in side tables owned by the simulation and the renderer,
//! so converting back never has anything to strip.

use std::collections::HashMap;

use super::error::{GraphError, Result};
use super::types::{GraphData, GraphLink, GraphNode, LinkId, NodeId, Properties};

/// Index of a node inside the runtime arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle(pub usize);

impl NodeHandle {
	/// Position in the arena and in the body table.
	pub fn index(self) -> usize {
		self.0
	}
}

/// A link whose endpoints are resolved to arena handles.
#[derive(Clone, Debug, PartialEq)]
pub struct RuntimeLink {
	/// Identifier from the snapshot.
	pub id: LinkId,
	/// Relationship type.
	pub relationship: String,
	/// CSS stroke color; empty for the theme default.
	pub color: String,
	/// Resolved source endpoint.
	pub source: NodeHandle,
	/// Resolved target endpoint.
	pub target: NodeHandle,
	/// Drawn only together with both endpoints.
	pub visible: bool,
	/// Host-owned expansion flag.
	pub expand: bool,
	/// Host-owned collapse flag.
	pub collapsed: bool,
	/// Signed curvature.
	pub curve: f64,
	/// Link properties.
	pub data: Properties,
}

impl RuntimeLink {
	/// Both ends on the same node.
	pub fn is_self_loop(&self) -> bool {
		self.source == self.target
	}
}

/// Graph as used by the engine: node arena plus handle-based links.
#[derive(Clone, Debug, Default)]
pub struct RuntimeGraph {
	nodes: Vec<GraphNode>,
	links: Vec<RuntimeLink>,
	index: HashMap<NodeId, NodeHandle>,
}

impl RuntimeGraph {
	/// Nodes in arena order.
	pub fn nodes(&self) -> &[GraphNode] {
		&self.nodes
	}

	/// Links in snapshot order.
	pub fn links(&self) -> &[RuntimeLink] {
		&self.links
	}

	/// Node at `handle`. Panics on a handle from another graph.
	pub fn node(&self, handle: NodeHandle) -> &GraphNode {
		&self.nodes[handle.0]
	}

	/// Mutable access for host-owned flags.
	pub fn node_mut(&mut self, handle: NodeHandle) -> &mut GraphNode {
		&mut self.nodes[handle.0]
	}

	/// Resolve a node id to its arena handle.
	pub fn handle(&self, id: NodeId) -> Option<NodeHandle> {
		self.index.get(&id).copied()
	}

	/// Number of nodes.
	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	/// Number of links.
	pub fn link_count(&self) -> usize {
		self.links.len()
	}

	/// No nodes.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Iterate nodes together with their handles, in arena order.
	pub fn handles(&self) -> impl DoubleEndedIterator<Item = (NodeHandle, &GraphNode)> {
		self.nodes
			.iter()
			.enumerate()
			.map(|(i, node)| (NodeHandle(i), node))
	}

	/// A link is drawn only when it and both of its endpoints are visible.
	pub fn link_visible(&self, link: &RuntimeLink) -> bool {
		link.visible && self.node(link.source).visible && self.node(link.target).visible
	}
}

/// Adopt a snapshot, resolving link endpoints to arena handles.
///
/// Fails on the first link whose source or target id is absent, naming the
/// link and the missing node. Nothing is returned on failure, so callers never
/// observe a half-built graph.
pub fn to_runtime(snapshot: GraphData) -> Result<RuntimeGraph> {
	let GraphData { nodes, links } = snapshot;

	let mut index = HashMap::with_capacity(nodes.len());
	for (i, node) in nodes.iter().enumerate() {
		if index.insert(node.id, NodeHandle(i)).is_some() {
			return Err(GraphError::DuplicateNode(node.id));
		}
	}

	let resolve = |link: LinkId, node: NodeId| {
		index
			.get(&node)
			.copied()
			.ok_or(GraphError::MissingEndpoint { link, node })
	};

	let links = links
		.into_iter()
		.map(|link| {
			let source = resolve(link.id, link.source)?;
			let target = resolve(link.id, link.target)?;
			Ok(RuntimeLink {
				id: link.id,
				relationship: link.relationship,
				color: link.color,
				source,
				target,
				visible: link.visible,
				expand: link.expand,
				collapsed: link.collapsed,
				curve: if link.curve.is_finite() { link.curve } else { 0.0 },
				data: link.data,
			})
		})
		.collect::<Result<Vec<_>>>()?;

	Ok(RuntimeGraph {
		nodes,
		links,
		index,
	})
}

/// Produce the serializable form of a runtime graph.
pub fn to_serializable(graph: &RuntimeGraph) -> GraphData {
	GraphData {
		nodes: graph.nodes.clone(),
		links: graph
			.links
			.iter()
			.map(|link| GraphLink {
				id: link.id,
				relationship: link.relationship.clone(),
				color: link.color.clone(),
				source: graph.node(link.source).id,
				target: graph.node(link.target).id,
				visible: link.visible,
				expand: link.expand,
				collapsed: link.collapsed,
				curve: link.curve,
				data: link.data.clone(),
			})
			.collect(),
	}
}
