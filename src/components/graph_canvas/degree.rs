//! Per-node degree counts for the current snapshot.

use std::collections::HashMap;

use super::adapter::{NodeHandle, RuntimeGraph};
use super::types::NodeId;

/// Number of link endpoints touching each node, indexed by arena handle.
///
/// Always rebuilt from scratch when the snapshot changes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DegreeIndex {
	degrees: Vec<u32>,
	by_id: HashMap<NodeId, NodeHandle>,
}

impl DegreeIndex {
	/// Count degrees in O(V + E). A self-loop counts twice for its node.
	pub fn recompute(graph: &RuntimeGraph) -> Self {
		let mut degrees = vec![0u32; graph.node_count()];
		for link in graph.links() {
			degrees[link.source.index()] += 1;
			degrees[link.target.index()] += 1;
		}
		Self {
			degrees,
			by_id: graph.handles().map(|(handle, node)| (node.id, handle)).collect(),
		}
	}

	/// Degree of the node at `handle`; 0 when out of range.
	pub fn degree(&self, handle: NodeHandle) -> u32 {
		self.degrees.get(handle.index()).copied().unwrap_or(0)
	}

	/// Degree looked up by node id. Unknown ids have degree 0.
	pub fn degree_of(&self, id: NodeId) -> u32 {
		self.by_id
			.get(&id)
			.map_or(0, |&handle| self.degree(handle))
	}

	/// Larger of the two endpoint degrees; drives the link force tuning.
	pub fn max_degree(&self, source: NodeHandle, target: NodeHandle) -> u32 {
		self.degree(source).max(self.degree(target))
	}

	/// Sum over all nodes: twice the link count.
	pub fn total(&self) -> u64 {
		self.degrees.iter().map(|&d| d as u64).sum()
	}

	/// Degrees in arena order.
	pub fn as_slice(&self) -> &[u32] {
		&self.degrees
	}
}
