//! # Layout Engine
//!
//! Turns a [`GraphModel`] into a deterministic swimlane layout.
//!
//! ## Pipeline
//!
//! | Step | Module | Output |
//! |------|--------|--------|
//! | Depth | [`depth`] | longest prerequisite chain per node |
//! | Lanes | [`lanes`] | track swimlanes, members in render order |
//! | Coordinates | [`engine`] | node `(x, y)`, lane extents, canvas |
//!
//! Every step is a pure function of its inputs. A changed snapshot or a
//! toggled lane means running the whole pipeline again; nothing is patched
//! in place.

pub mod depth;
pub mod engine;
pub mod lanes;

use std::collections::BTreeSet;

pub use depth::DepthMap;
pub use engine::{Canvas, LaneLayout, Layout, LayoutMetrics, Point};
pub use lanes::{assign_lanes, Lane, LaneStyle, UNASSIGNED_LANE_ID};

use crate::domain::GraphModel;

/// Runs depth, lane and coordinate assignment for one graph
pub fn layout(
    graph: &GraphModel,
    collapsed: &BTreeSet<String>,
    metrics: &LayoutMetrics,
    style: &LaneStyle,
) -> (DepthMap, Layout) {
    let depths = DepthMap::resolve(graph);
    let lanes = assign_lanes(graph, &depths, style);
    let layout = Layout::compute(graph, &depths, &lanes, collapsed, metrics);
    (depths, layout)
}
