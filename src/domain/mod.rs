//! Domain models for the tech tree
//!
//! Contains snapshot decoding and the indexed graph, without any I/O.

mod graph;
mod node;
mod snapshot;

pub use graph::GraphModel;
pub use node::{Node, NodeError, NodeStatus, Track};
pub use snapshot::{SkippedNode, Snapshot, SnapshotError};
