//! Track swimlanes
//!
//! Nodes are grouped by canonical track id. Trackless nodes share one
//! synthetic lane that always renders last; its id is reserved, so a
//! provider track using it joins that lane as well. Lane metadata comes from the
//! first member (in snapshot order) that carries a real name or color.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::depth::DepthMap;
use crate::domain::GraphModel;

/// Id of the synthetic lane for nodes without a track
pub const UNASSIGNED_LANE_ID: &str = "__unassigned__";

/// Names and colors for lanes that lack provider metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneStyle {
    /// Display name of the unassigned lane
    pub unassigned_name: String,

    /// Color of the unassigned lane
    pub unassigned_color: String,

    /// Color for tracks whose members never supply one
    pub default_color: String,
}

impl Default for LaneStyle {
    fn default() -> Self {
        Self {
            unassigned_name: "Unassigned".to_string(),
            unassigned_color: "#475569".to_string(),
            default_color: "#64748b".to_string(),
        }
    }
}

/// A swimlane with its members in render order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lane {
    pub id: String,
    pub name: String,
    pub color: String,
    pub is_unassigned: bool,
    /// Graph indices, sorted by depth, priority, title, id
    pub(crate) members: Vec<usize>,
}

impl Lane {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Member ids in render order
    pub fn node_ids<'a>(&'a self, graph: &'a GraphModel) -> impl Iterator<Item = &'a str> + 'a {
        self.members.iter().map(move |&idx| graph.node_at(idx).id.as_str())
    }
}

#[derive(Default)]
struct LaneBuilder {
    name: Option<String>,
    color: Option<String>,
    members: Vec<usize>,
}

/// Partitions the graph into lanes in render order
pub fn assign_lanes(graph: &GraphModel, depths: &DepthMap, style: &LaneStyle) -> Vec<Lane> {
    let mut tracks: BTreeMap<&str, LaneBuilder> = BTreeMap::new();
    let mut unassigned: Vec<usize> = Vec::new();

    for (idx, node) in graph.nodes().iter().enumerate() {
        let Some(track) = node.track.as_ref().filter(|t| t.id != UNASSIGNED_LANE_ID) else {
            unassigned.push(idx);
            continue;
        };

        let builder = tracks.entry(track.id.as_str()).or_default();
        // First real value wins
        if builder.name.is_none() {
            builder.name = track.name.clone();
        }
        if builder.color.is_none() {
            builder.color = track.color.clone();
        }
        builder.members.push(idx);
    }

    let mut lanes: Vec<Lane> = tracks
        .into_iter()
        .map(|(id, builder)| Lane {
            id: id.to_string(),
            name: builder.name.unwrap_or_else(|| id.to_string()),
            color: builder
                .color
                .unwrap_or_else(|| style.default_color.clone()),
            is_unassigned: false,
            members: builder.members,
        })
        .collect();
    lanes.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

    if !unassigned.is_empty() {
        lanes.push(Lane {
            id: UNASSIGNED_LANE_ID.to_string(),
            name: style.unassigned_name.clone(),
            color: style.unassigned_color.clone(),
            is_unassigned: true,
            members: unassigned,
        });
    }

    for lane in &mut lanes {
        lane.members
            .sort_by(|&a, &b| member_order(graph, depths, a, b));
    }

    lanes
}

fn member_order(graph: &GraphModel, depths: &DepthMap, a: usize, b: usize) -> Ordering {
    let (na, nb) = (graph.node_at(a), graph.node_at(b));
    depths
        .at(a)
        .cmp(&depths.at(b))
        .then_with(|| na.priority.cmp(&nb.priority))
        .then_with(|| na.title.cmp(&nb.title))
        .then_with(|| na.id.cmp(&nb.id))
}
