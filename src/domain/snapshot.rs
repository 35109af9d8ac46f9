//! Graph snapshot decoding
//!
//! Snapshots come from a live system and are routinely partial. Decoding is
//! lenient per node: a node that cannot be decoded is skipped and recorded in
//! [`Snapshot::skipped`], and the rest of the graph still lays out. Only a
//! payload whose top level is not a node list is an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

use super::node::{Node, NodeError, NodeStatus, Track};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Invalid snapshot payload: {0}")]
    InvalidPayload(String),

    #[error("Failed to parse JSON snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse YAML snapshot: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A node that was dropped while decoding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedNode {
    /// Position in the provider's node list
    pub index: usize,
    /// The node's id, if one could be read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub reason: String,
}

/// Wire shape of a node as sent by the data provider
#[derive(Debug, Deserialize)]
struct RawNode {
    id: String,
    title: String,
    status: String,
    priority: i64,
    #[serde(default)]
    era: Option<String>,
    #[serde(default, rename = "dependsOn", alias = "depends_on")]
    depends_on: Option<Vec<String>>,
    #[serde(default)]
    dependents: Option<Vec<String>>,
    #[serde(default, rename = "trackId", alias = "track_id")]
    track_id: Option<String>,
    #[serde(default)]
    track: Option<Track>,
}

impl TryFrom<RawNode> for Node {
    type Error = NodeError;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        let id = raw.id.trim();
        if id.is_empty() {
            return Err(NodeError::EmptyId);
        }
        let status: NodeStatus = raw.status.parse()?;

        Ok(Node {
            id: id.to_string(),
            title: raw.title,
            status,
            priority: raw.priority,
            era: raw.era.filter(|e| !e.trim().is_empty()),
            depends_on: raw.depends_on.unwrap_or_default(),
            dependents: raw.dependents.unwrap_or_default(),
            track: Track::resolve(raw.track_id.as_deref(), raw.track),
        })
    }
}

/// An immutable graph snapshot for one layout pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    /// Valid nodes in provider order
    pub nodes: Vec<Node>,

    /// Provider-computed cycles (advisory, display only)
    pub cycles: Vec<Vec<String>>,

    /// Era labels
    pub eras: Vec<String>,

    /// Nodes dropped during decoding
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedNode>,
}

impl Snapshot {
    /// Builds a snapshot from already-validated nodes
    ///
    /// Duplicate ids are still dropped (first occurrence wins).
    pub fn from_nodes(nodes: impl IntoIterator<Item = Node>) -> Self {
        let mut snapshot = Self::default();
        let mut seen = HashSet::new();
        for (index, node) in nodes.into_iter().enumerate() {
            snapshot.push_unique(&mut seen, index, node);
        }
        snapshot
    }

    /// Sets the provider cycle list
    pub fn with_cycles(mut self, cycles: Vec<Vec<String>>) -> Self {
        self.cycles = cycles;
        self
    }

    /// Decodes a JSON document
    pub fn from_json_str(input: &str) -> Result<Self, SnapshotError> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_value(value)
    }

    /// Decodes a YAML document
    pub fn from_yaml_str(input: &str) -> Result<Self, SnapshotError> {
        let value: Value = serde_yaml::from_str(input)?;
        Self::from_value(value)
    }

    /// Decodes an already-parsed payload
    ///
    /// Accepts `{nodes, cycles, eras}` or a bare node array.
    pub fn from_value(value: Value) -> Result<Self, SnapshotError> {
        let (raw_nodes, cycles, eras) = match value {
            Value::Array(nodes) => (nodes, Value::Null, Value::Null),
            Value::Object(mut obj) => {
                let nodes = match obj.remove("nodes") {
                    Some(Value::Array(nodes)) => nodes,
                    Some(other) => {
                        return Err(SnapshotError::InvalidPayload(format!(
                            "'nodes' must be an array, got {}",
                            kind_of(&other)
                        )))
                    }
                    None => {
                        return Err(SnapshotError::InvalidPayload(
                            "missing 'nodes' array".to_string(),
                        ))
                    }
                };
                let cycles = obj.remove("cycles").unwrap_or(Value::Null);
                let eras = obj.remove("eras").unwrap_or(Value::Null);
                (nodes, cycles, eras)
            }
            other => {
                return Err(SnapshotError::InvalidPayload(format!(
                    "expected an object or an array of nodes, got {}",
                    kind_of(&other)
                )))
            }
        };

        let mut snapshot = Self {
            cycles: serde_json::from_value(cycles).unwrap_or_default(),
            eras: serde_json::from_value(eras).unwrap_or_default(),
            ..Self::default()
        };

        let mut seen = HashSet::new();
        for (index, raw) in raw_nodes.into_iter().enumerate() {
            let id = raw.get("id").and_then(Value::as_str).map(str::to_string);
            let decoded = serde_json::from_value::<RawNode>(raw)
                .map_err(|e| e.to_string())
                .and_then(|raw| Node::try_from(raw).map_err(|e| e.to_string()));

            match decoded {
                Ok(node) => snapshot.push_unique(&mut seen, index, node),
                Err(reason) => snapshot.skipped.push(SkippedNode { index, id, reason }),
            }
        }

        Ok(snapshot)
    }

    fn push_unique(&mut self, seen: &mut HashSet<String>, index: usize, node: Node) {
        if seen.insert(node.id.clone()) {
            self.nodes.push(node);
        } else {
            self.skipped.push(SkippedNode {
                index,
                id: Some(node.id),
                reason: "duplicate id".to_string(),
            });
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
