//! Swimlane coordinates
//!
//! Columns are a function of depth alone, so prerequisite chains line up
//! across lanes. Rows come from a node's position within its lane. Lanes
//! stack top to bottom in lane order; a collapsed lane keeps only its
//! header and its nodes get no position.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::depth::DepthMap;
use super::lanes::Lane;
use crate::domain::GraphModel;

/// Pixel metrics for the layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutMetrics {
    pub node_width: u32,
    pub node_height: u32,
    pub horizontal_gap: u32,
    pub vertical_gap: u32,
    pub header_height: u32,
    /// Space above the first and below the last node of an expanded lane
    pub lane_padding: u32,
    pub lane_gap: u32,
    pub side_padding: u32,
    pub top_padding: u32,
    pub bottom_padding: u32,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            node_width: 200,
            node_height: 56,
            horizontal_gap: 80,
            vertical_gap: 16,
            header_height: 32,
            lane_padding: 12,
            lane_gap: 16,
            side_padding: 40,
            top_padding: 40,
            bottom_padding: 40,
        }
    }
}

impl LayoutMetrics {
    /// Largest value accepted for any single metric from configuration
    pub const MAX_VALUE: u32 = 10_000;

    /// Metric names paired with their values
    pub fn entries(&self) -> [(&'static str, u32); 10] {
        [
            ("node_width", self.node_width),
            ("node_height", self.node_height),
            ("horizontal_gap", self.horizontal_gap),
            ("vertical_gap", self.vertical_gap),
            ("header_height", self.header_height),
            ("lane_padding", self.lane_padding),
            ("lane_gap", self.lane_gap),
            ("side_padding", self.side_padding),
            ("top_padding", self.top_padding),
            ("bottom_padding", self.bottom_padding),
        ]
    }

    /// X coordinate of a depth column
    pub fn column_x(&self, depth: usize) -> u32 {
        let pitch = self.node_width.saturating_add(self.horizontal_gap);
        self.side_padding.saturating_add(to_u32(depth).saturating_mul(pitch))
    }

    /// Y coordinate of the `index`-th node of a lane starting at `lane_top`
    pub fn row_y(&self, lane_top: u32, index: usize) -> u32 {
        let pitch = self.node_height.saturating_add(self.vertical_gap);
        lane_top
            .saturating_add(self.header_height)
            .saturating_add(to_u32(index).saturating_mul(pitch))
    }

    /// Height of a lane with `count` members
    pub fn lane_height(&self, count: usize, collapsed: bool) -> u32 {
        if collapsed || count == 0 {
            return self.header_height;
        }
        let count = to_u32(count);
        self.header_height
            .saturating_add(self.lane_padding.saturating_mul(2))
            .saturating_add(count.saturating_mul(self.node_height))
            .saturating_add((count - 1).saturating_mul(self.vertical_gap))
    }
}

/// Coordinates saturate at `u32::MAX` instead of wrapping
fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

/// A lane with its vertical extent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneLayout {
    pub id: String,
    pub name: String,
    pub color: String,
    pub top: u32,
    pub height: u32,
    pub is_collapsed: bool,
    pub is_unassigned: bool,
    pub node_ids: Vec<String>,
}

/// Result of one layout pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    /// Positions of visible nodes
    #[serde(rename = "nodePositions")]
    pub positions: BTreeMap<String, Point>,
    /// Lanes in render order
    pub lanes: Vec<LaneLayout>,
    pub canvas: Canvas,
}

impl Layout {
    /// Places every lane and node
    pub fn compute(
        graph: &GraphModel,
        depths: &DepthMap,
        lanes: &[Lane],
        collapsed: &BTreeSet<String>,
        metrics: &LayoutMetrics,
    ) -> Self {
        let mut positions = BTreeMap::new();
        let mut lane_layouts = Vec::with_capacity(lanes.len());
        let mut top = metrics.top_padding;

        for lane in lanes {
            let is_collapsed = collapsed.contains(&lane.id);
            let height = metrics.lane_height(lane.len(), is_collapsed);

            if !is_collapsed {
                for (index, &idx) in lane.members.iter().enumerate() {
                    let point = Point {
                        x: metrics.column_x(depths.at(idx)),
                        y: metrics.row_y(top, index),
                    };
                    positions.insert(graph.node_at(idx).id.clone(), point);
                }
            }

            lane_layouts.push(LaneLayout {
                id: lane.id.clone(),
                name: lane.name.clone(),
                color: lane.color.clone(),
                top,
                height,
                is_collapsed,
                is_unassigned: lane.is_unassigned,
                node_ids: lane.node_ids(graph).map(str::to_string).collect(),
            });
            top = top.saturating_add(height).saturating_add(metrics.lane_gap);
        }

        let canvas = Canvas {
            width: canvas_width(graph, depths, metrics),
            height: canvas_height(&lane_layouts, metrics),
        };

        Self {
            positions,
            lanes: lane_layouts,
            canvas,
        }
    }

    /// Returns the position of a visible node
    pub fn position(&self, id: &str) -> Option<Point> {
        self.positions.get(id).copied()
    }

    pub fn lane(&self, id: &str) -> Option<&LaneLayout> {
        self.lanes.iter().find(|l| l.id == id)
    }
}

fn canvas_width(graph: &GraphModel, depths: &DepthMap, metrics: &LayoutMetrics) -> u32 {
    let padding = metrics.side_padding.saturating_mul(2);
    if graph.is_empty() {
        return padding;
    }
    let columns = to_u32(depths.max_depth()).saturating_add(1);
    padding
        .saturating_add(columns.saturating_mul(metrics.node_width))
        .saturating_add((columns - 1).saturating_mul(metrics.horizontal_gap))
}

fn canvas_height(lanes: &[LaneLayout], metrics: &LayoutMetrics) -> u32 {
    let padding = metrics.top_padding.saturating_add(metrics.bottom_padding);
    let heights = lanes
        .iter()
        .fold(0u32, |total, l| total.saturating_add(l.height));
    let gaps = to_u32(lanes.len().saturating_sub(1)).saturating_mul(metrics.lane_gap);
    padding.saturating_add(heights).saturating_add(gaps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Node, Track};
    use crate::layout::lanes::{assign_lanes, LaneStyle};

    fn layout(nodes: &[Node], collapsed: &[&str]) -> Layout {
        let graph = GraphModel::from_nodes(nodes);
        let depths = DepthMap::resolve(&graph);
        let lanes = assign_lanes(&graph, &depths, &LaneStyle::default());
        let collapsed = collapsed.iter().map(|s| s.to_string()).collect();
        Layout::compute(&graph, &depths, &lanes, &collapsed, &LayoutMetrics::default())
    }

    fn tracked(id: &str, track: &str) -> Node {
        Node::new(id, id.to_uppercase()).with_track(Track {
            id: track.to_string(),
            name: Some(track.to_string()),
            color: None,
        })
    }

    fn three_lanes() -> Vec<Node> {
        vec![
            tracked("a1", "alpha"),
            tracked("a2", "alpha").depends_on("a1"),
            tracked("b1", "beta").depends_on("a2"),
            tracked("b2", "beta"),
            tracked("b3", "beta"),
            tracked("g1", "gamma").depends_on("b1"),
            Node::new("u1", "U1"),
        ]
    }

    #[test]
    fn chain_occupies_increasing_columns() {
        let result = layout(
            &[
                Node::new("a", "A"),
                Node::new("b", "B").depends_on("a"),
                Node::new("c", "C").depends_on("b"),
            ],
            &[],
        );
        let m = LayoutMetrics::default();
        let xs: Vec<u32> = ["a", "b", "c"]
            .iter()
            .map(|id| result.position(id).unwrap().x)
            .collect();
        assert_eq!(xs, vec![m.column_x(0), m.column_x(1), m.column_x(2)]);
        assert!(xs[0] < xs[1] && xs[1] < xs[2]);
    }

    #[test]
    fn x_depends_only_on_depth() {
        let result = layout(&three_lanes(), &[]);
        let m = LayoutMetrics::default();
        // b1 sits at depth 2 in its own lane, a2 at depth 1 in another
        assert_eq!(result.position("b1").unwrap().x, m.column_x(2));
        assert_eq!(result.position("a2").unwrap().x, m.column_x(1));
        assert_eq!(result.position("b2").unwrap().x, m.column_x(0));
    }

    #[test]
    fn rows_follow_lane_order() {
        let result = layout(&three_lanes(), &[]);
        let m = LayoutMetrics::default();
        let beta = result.lane("beta").unwrap();
        assert_eq!(beta.node_ids, vec!["b2", "b3", "b1"]);
        for (index, id) in beta.node_ids.iter().enumerate() {
            assert_eq!(result.position(id).unwrap().y, m.row_y(beta.top, index));
        }
    }

    #[test]
    fn lanes_stack_with_gap() {
        let result = layout(&three_lanes(), &[]);
        let m = LayoutMetrics::default();
        assert_eq!(result.lanes[0].top, m.top_padding);
        for pair in result.lanes.windows(2) {
            assert_eq!(pair[1].top, pair[0].top + pair[0].height + m.lane_gap);
        }
        let ids: Vec<_> = result.lanes.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "beta", "gamma", "__unassigned__"]);
    }

    #[test]
    fn expanded_lane_height() {
        let result = layout(&three_lanes(), &[]);
        let m = LayoutMetrics::default();
        let beta = result.lane("beta").unwrap();
        assert_eq!(
            beta.height,
            m.header_height + m.lane_padding + 3 * m.node_height + 2 * m.vertical_gap + m.lane_padding
        );
    }

    #[test]
    fn collapsing_shifts_only_lower_lanes() {
        let open = layout(&three_lanes(), &[]);
        let closed = layout(&three_lanes(), &["beta"]);
        let m = LayoutMetrics::default();

        let beta_open = open.lane("beta").unwrap();
        let beta_closed = closed.lane("beta").unwrap();
        assert!(beta_closed.is_collapsed);
        assert_eq!(beta_closed.height, m.header_height);
        let delta = beta_open.height - beta_closed.height;

        // Lane above untouched, including node positions
        assert_eq!(open.lane("alpha"), closed.lane("alpha"));
        assert_eq!(open.position("a1"), closed.position("a1"));
        assert_eq!(open.position("a2"), closed.position("a2"));

        // Lanes below shift by exactly the delta
        for id in ["gamma", "__unassigned__"] {
            assert_eq!(open.lane(id).unwrap().top - delta, closed.lane(id).unwrap().top);
        }
        let g_open = open.position("g1").unwrap();
        let g_closed = closed.position("g1").unwrap();
        assert_eq!(g_open.x, g_closed.x);
        assert_eq!(g_open.y - delta, g_closed.y);

        // Collapsed members keep membership but lose positions
        assert_eq!(beta_closed.node_ids.len(), 3);
        assert_eq!(closed.position("b1"), None);

        assert_eq!(open.canvas.height - delta, closed.canvas.height);
        assert_eq!(open.canvas.width, closed.canvas.width);
    }

    #[test]
    fn identical_inputs_identical_layout() {
        assert_eq!(layout(&three_lanes(), &["gamma"]), layout(&three_lanes(), &["gamma"]));
    }

    #[test]
    fn unknown_collapsed_lane_is_ignored() {
        assert_eq!(layout(&three_lanes(), &[]), layout(&three_lanes(), &["nope"]));
    }

    #[test]
    fn canvas_extents() {
        let result = layout(&three_lanes(), &[]);
        let m = LayoutMetrics::default();
        // depths reach 3 (a1 -> a2 -> b1 -> g1)
        assert_eq!(
            result.canvas.width,
            2 * m.side_padding + 4 * m.node_width + 3 * m.horizontal_gap
        );
        let last = result.lanes.last().unwrap();
        assert_eq!(result.canvas.height, last.top + last.height + m.bottom_padding);
    }

    #[test]
    fn empty_graph_canvas_is_padding() {
        let result = layout(&[], &[]);
        let m = LayoutMetrics::default();
        assert!(result.lanes.is_empty());
        assert_eq!(result.canvas.width, 2 * m.side_padding);
        assert_eq!(result.canvas.height, m.top_padding + m.bottom_padding);
    }

    #[test]
    fn huge_metrics_saturate() {
        let graph = GraphModel::from_nodes(&[
            Node::new("a", "A"),
            Node::new("b", "B").depends_on("a"),
        ]);
        let depths = DepthMap::resolve(&graph);
        let lanes = assign_lanes(&graph, &depths, &LaneStyle::default());
        let metrics = LayoutMetrics {
            node_width: u32::MAX,
            node_height: u32::MAX,
            ..LayoutMetrics::default()
        };
        let result = Layout::compute(&graph, &depths, &lanes, &BTreeSet::new(), &metrics);

        assert_eq!(result.position("a").unwrap().x, metrics.side_padding);
        assert_eq!(result.position("b").unwrap().x, u32::MAX);
        assert_eq!(result.canvas.width, u32::MAX);
        assert_eq!(result.canvas.height, u32::MAX);
    }

    #[test]
    fn deep_chain_with_wide_nodes_saturates() {
        let nodes: Vec<Node> = (0..50_000)
            .map(|i| {
                let node = Node::new(format!("n{i}"), "N");
                if i == 0 {
                    node
                } else {
                    node.depends_on(format!("n{}", i - 1))
                }
            })
            .collect();
        let graph = GraphModel::from_nodes(&nodes);
        let depths = DepthMap::resolve(&graph);
        let lanes = assign_lanes(&graph, &depths, &LaneStyle::default());
        let metrics = LayoutMetrics {
            node_width: 100_000,
            ..LayoutMetrics::default()
        };
        let result = Layout::compute(&graph, &depths, &lanes, &BTreeSet::new(), &metrics);

        let last = result.position("n49999").unwrap();
        assert_eq!(last.x, u32::MAX);
        assert!(result.position("n1").unwrap().x < result.position("n2").unwrap().x);
        assert_eq!(result.canvas.width, u32::MAX);
    }

    #[test]
    fn cyclic_nodes_still_positioned() {
        let result = layout(
            &[
                Node::new("a", "A").depends_on("b"),
                Node::new("b", "B").depends_on("a"),
            ],
            &[],
        );
        assert!(result.position("a").is_some());
        assert!(result.position("b").is_some());
    }
}
