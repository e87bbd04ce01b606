//! Error types for the graph canvas.

use thiserror::Error;

use super::types::{LinkId, NodeId};

/// Errors raised while adopting a snapshot.
#[derive(Debug, Error)]
pub enum GraphError {
	/// A link points at a node id that is not part of the snapshot.
	#[error("invalid link {link}: endpoint node {node} not found")]
	MissingEndpoint {
		/// Offending link.
		link: LinkId,
		/// Id that resolved to nothing.
		node: NodeId,
	},

	/// Two nodes in the snapshot share an id.
	#[error("duplicate node id {0}")]
	DuplicateNode(NodeId),

	/// Snapshot JSON could not be parsed or produced.
	#[error("snapshot json error: {0}")]
	Json(#[from] serde_json::Error),
}

/// Result type for graph canvas operations.
pub type Result<T> = std::result::Result<T, GraphError>;
