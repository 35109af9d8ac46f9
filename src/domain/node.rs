//! Work item domain model
//!
//! A node is one unit of agent work on the tech tree. Nodes arrive from the
//! data provider with denormalized track fields; those are resolved once into
//! a canonical [`Track`] when the node is built.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum NodeError {
    #[error("Unknown node status: '{0}'")]
    UnknownStatus(String),

    #[error("Node id must not be empty")]
    EmptyId,
}

/// Status of a work item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    #[default]
    Backlog,
    Ready,
    Building,
    AiReview,
    YouReview,
    Done,
    Blocked,
    Parked,
}

impl NodeStatus {
    /// Returns true if this is the terminal status
    pub fn is_done(&self) -> bool {
        matches!(self, NodeStatus::Done)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeStatus::Backlog => "backlog",
            NodeStatus::Ready => "ready",
            NodeStatus::Building => "building",
            NodeStatus::AiReview => "ai_review",
            NodeStatus::YouReview => "you_review",
            NodeStatus::Done => "done",
            NodeStatus::Blocked => "blocked",
            NodeStatus::Parked => "parked",
        }
    }

    /// Short indicator used in text output
    pub fn indicator(&self) -> &'static str {
        match self {
            NodeStatus::Done => "[x]",
            NodeStatus::Building | NodeStatus::AiReview | NodeStatus::YouReview => "[~]",
            NodeStatus::Blocked => "[B]",
            NodeStatus::Parked => "[-]",
            NodeStatus::Backlog | NodeStatus::Ready => "[ ]",
        }
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeStatus {
    type Err = NodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "backlog" => Ok(NodeStatus::Backlog),
            "ready" => Ok(NodeStatus::Ready),
            "building" => Ok(NodeStatus::Building),
            "ai_review" => Ok(NodeStatus::AiReview),
            "you_review" => Ok(NodeStatus::YouReview),
            "done" => Ok(NodeStatus::Done),
            "blocked" => Ok(NodeStatus::Blocked),
            "parked" => Ok(NodeStatus::Parked),
            other => Err(NodeError::UnknownStatus(other.to_string())),
        }
    }
}

/// Canonical track descriptor
///
/// `name` and `color` are `None` when the node only carried a bare
/// `trackId`; lane assignment treats those as placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Track {
    /// Creates a placeholder track known only by id
    pub fn bare(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            color: None,
        }
    }

    /// Resolves the denormalized `trackId` / `track` pair into one descriptor.
    ///
    /// The explicit object wins over the bare id. Blank ids and blank
    /// name/color strings count as absent.
    pub fn resolve(track_id: Option<&str>, track: Option<Track>) -> Option<Track> {
        if let Some(track) = track {
            let id = track.id.trim();
            if !id.is_empty() {
                return Some(Track {
                    id: id.to_string(),
                    name: non_blank(track.name),
                    color: non_blank(track.color),
                });
            }
        }

        track_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(Track::bare)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// A work item on the tech tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier within a snapshot
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// Current status
    pub status: NodeStatus,

    /// Lower is more urgent
    pub priority: i64,

    /// Optional era label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub era: Option<String>,

    /// Ids this node requires, as declared by the provider
    #[serde(default, rename = "dependsOn", skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,

    /// Ids that require this node, as declared by the provider
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependents: Vec<String>,

    /// Resolved track, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track: Option<Track>,
}

impl Node {
    /// Creates a backlog node with no edges and no track
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status: NodeStatus::Backlog,
            priority: 0,
            era: None,
            depends_on: Vec::new(),
            dependents: Vec::new(),
            track: None,
        }
    }

    pub fn with_status(mut self, status: NodeStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_track(mut self, track: Track) -> Self {
        self.track = Some(track);
        self
    }

    pub fn depends_on(mut self, id: impl Into<String>) -> Self {
        self.depends_on.push(id.into());
        self
    }

    pub fn dependent(mut self, id: impl Into<String>) -> Self {
        self.dependents.push(id.into());
        self
    }

    /// Returns the canonical track id, if the node has one
    pub fn track_id(&self) -> Option<&str> {
        self.track.as_ref().map(|t| t.id.as_str())
    }
}
