//! # View State and Render Passes
//!
//! UI commands (toggle lane, select, hover) produce a new [`ViewState`]
//! value; they never touch node data. Each state change is followed by a
//! fresh [`RenderPass`] over the current snapshot: a new graph, a new depth
//! cache, new lanes, a new layout and new focus sets.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{GraphModel, Snapshot};
use crate::layout::{self, LaneStyle, Layout, LayoutMetrics};
use crate::query::{blocked_by, Edge, FocusView};

/// Local UI state for the tech tree view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    collapsed_lanes: BTreeSet<String>,
    selected: Option<String>,
    hovered: Option<String>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips a lane between collapsed and expanded
    pub fn toggle_lane(&self, lane_id: &str) -> Self {
        let mut next = self.clone();
        if !next.collapsed_lanes.remove(lane_id) {
            next.collapsed_lanes.insert(lane_id.to_string());
        }
        next
    }

    /// Sets or clears the selected node
    pub fn select_node(&self, id: Option<&str>) -> Self {
        Self {
            selected: id.map(str::to_string),
            ..self.clone()
        }
    }

    /// Sets or clears the hovered node
    pub fn hover_node(&self, id: Option<&str>) -> Self {
        Self {
            hovered: id.map(str::to_string),
            ..self.clone()
        }
    }

    pub fn collapsed_lanes(&self) -> &BTreeSet<String> {
        &self.collapsed_lanes
    }

    pub fn is_collapsed(&self, lane_id: &str) -> bool {
        self.collapsed_lanes.contains(lane_id)
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }
}

/// Where the cycle list shown to the user comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleSource {
    /// The provider's precomputed list
    #[default]
    Supplied,
    /// Strongly connected components found locally
    Detected,
    /// Both lists, deduplicated
    Merged,
}

/// Settings shared by every render pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOptions {
    pub metrics: LayoutMetrics,
    pub lane_style: LaneStyle,
    pub cycle_source: CycleSource,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderPass {
    #[serde(flatten)]
    pub layout: Layout,

    /// Depth column per node
    pub depths: BTreeMap<String, usize>,

    #[serde(flatten)]
    pub focus: FocusView,

    /// Nodes dimmed by the current focus
    pub dimmed_node_ids: Vec<String>,

    /// `[dependency, dependent]` edges dimmed by the current focus
    pub dimmed_edges: Vec<Edge>,

    /// Direct not-done dependencies of the selected node
    #[serde(rename = "blockedByIds")]
    pub blocked_by: Vec<String>,

    /// Cycles shown as warnings
    pub cycles: Vec<Vec<String>>,

    pub cycle_count: usize,

    /// Nodes that belong to at least one shown cycle
    pub cyclic_node_ids: BTreeSet<String>,

    pub eras: Vec<String>,
}

impl RenderPass {
    /// Computes a full pass from scratch
    pub fn compute(snapshot: &Snapshot, state: &ViewState, options: &RenderOptions) -> Self {
        let graph = GraphModel::from_snapshot(snapshot);
        let (depths, layout) = layout::layout(
            &graph,
            state.collapsed_lanes(),
            &options.metrics,
            &options.lane_style,
        );

        let focus = FocusView::from_selection(&graph, state.selected(), state.hovered());
        let dimmed_node_ids = focus.dimmed_nodes(&graph);
        let dimmed_edges = focus.dimmed_edges(&graph);
        let blocked = state
            .selected()
            .map(|id| blocked_by(&graph, id).into_iter().map(str::to_string).collect())
            .unwrap_or_default();

        let cycles = cycles_for(&graph, snapshot, options.cycle_source);
        let cyclic_node_ids = cycles
            .iter()
            .flatten()
            .filter(|id| graph.contains(id))
            .cloned()
            .collect();

        Self {
            depths: graph
                .node_ids()
                .filter_map(|id| depths.get(id).map(|d| (id.to_string(), d)))
                .collect(),
            layout,
            focus,
            dimmed_node_ids,
            dimmed_edges,
            blocked_by: blocked,
            cycle_count: cycles.len(),
            cycles,
            cyclic_node_ids,
            eras: snapshot.eras.clone(),
        }
    }

    /// Returns true if the node is flagged as part of a cycle
    pub fn is_cyclic(&self, id: &str) -> bool {
        self.cyclic_node_ids.contains(id)
    }
}

fn cycles_for(graph: &GraphModel, snapshot: &Snapshot, source: CycleSource) -> Vec<Vec<String>> {
    let supplied = || {
        snapshot
            .cycles
            .iter()
            .filter(|cycle| !cycle.is_empty())
            .cloned()
            .collect::<Vec<_>>()
    };

    match source {
        CycleSource::Supplied => supplied(),
        CycleSource::Detected => graph.detect_cycles(),
        CycleSource::Merged => {
            let mut merged = supplied();
            let known: BTreeSet<Vec<String>> = merged.iter().map(|c| sorted(c)).collect();
            merged.extend(
                graph
                    .detect_cycles()
                    .into_iter()
                    .filter(|cycle| !known.contains(cycle)),
            );
            merged
        }
    }
}

fn sorted(ids: &[String]) -> Vec<String> {
    let mut ids = ids.to_vec();
    ids.sort();
    ids.dedup();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Node, NodeStatus, Track};

    fn snapshot() -> Snapshot {
        let core = Track {
            id: "core".to_string(),
            name: Some("Core".to_string()),
            color: Some("#0ea5e9".to_string()),
        };
        let ui = Track {
            id: "ui".to_string(),
            name: Some("UI".to_string()),
            color: None,
        };
        Snapshot::from_nodes([
            Node::new("schema", "Schema")
                .with_status(NodeStatus::Done)
                .with_track(core.clone())
                .dependent("api"),
            Node::new("api", "API")
                .with_status(NodeStatus::Building)
                .with_track(core)
                .depends_on("schema")
                .dependent("screen"),
            Node::new("screen", "Screen")
                .with_track(ui)
                .depends_on("api")
                .depends_on("schema"),
            Node::new("docs", "Docs"),
        ])
        .with_cycles(vec![vec!["ghost".to_string(), "api".to_string()], vec![]])
    }

    #[test]
    fn toggle_lane_twice_restores_state() {
        let state = ViewState::new();
        let once = state.toggle_lane("core");
        assert!(once.is_collapsed("core"));
        assert_eq!(once.toggle_lane("core"), state);
    }

    #[test]
    fn commands_do_not_mutate_previous_state() {
        let state = ViewState::new();
        let selected = state.select_node(Some("api"));
        assert_eq!(state.selected(), None);
        assert_eq!(selected.selected(), Some("api"));
        assert_eq!(selected.select_node(None).selected(), None);

        let hovered = selected.hover_node(Some("docs"));
        assert_eq!(hovered.selected(), Some("api"));
        assert_eq!(hovered.hovered(), Some("docs"));
    }

    #[test]
    fn toggle_round_trip_restores_pass() {
        let snapshot = snapshot();
        let options = RenderOptions::default();
        let state = ViewState::new();

        let before = RenderPass::compute(&snapshot, &state, &options);
        let collapsed = RenderPass::compute(&snapshot, &state.toggle_lane("core"), &options);
        let after = RenderPass::compute(
            &snapshot,
            &state.toggle_lane("core").toggle_lane("core"),
            &options,
        );

        assert_ne!(before.layout, collapsed.layout);
        assert_eq!(before, after);
    }

    #[test]
    fn pass_is_deterministic() {
        let snapshot = snapshot();
        let state = ViewState::new().select_node(Some("screen"));
        let options = RenderOptions::default();
        assert_eq!(
            RenderPass::compute(&snapshot, &state, &options),
            RenderPass::compute(&snapshot, &state, &options)
        );
    }

    #[test]
    fn selection_drives_focus_and_blocked_by() {
        let state = ViewState::new()
            .hover_node(Some("docs"))
            .select_node(Some("screen"));
        let pass = RenderPass::compute(&snapshot(), &state, &RenderOptions::default());

        assert_eq!(pass.focus.focus.as_deref(), Some("screen"));
        assert_eq!(pass.focus.dependencies, vec!["api", "schema"]);
        assert_eq!(pass.blocked_by, vec!["api"]);
        assert_eq!(pass.dimmed_node_ids, vec!["docs"]);
        // api -> screen and schema -> screen touch the focus
        assert_eq!(
            pass.dimmed_edges,
            vec![["schema".to_string(), "api".to_string()]]
        );
    }

    #[test]
    fn unknown_selection_keeps_hover_focus() {
        let state = ViewState::new()
            .select_node(Some("ghost"))
            .hover_node(Some("api"));
        let pass = RenderPass::compute(&snapshot(), &state, &RenderOptions::default());
        assert_eq!(pass.focus.focus.as_deref(), Some("api"));
        assert!(pass.blocked_by.is_empty());
    }

    #[test]
    fn hover_focus_does_not_produce_blocked_by() {
        let state = ViewState::new().hover_node(Some("screen"));
        let pass = RenderPass::compute(&snapshot(), &state, &RenderOptions::default());
        assert_eq!(pass.focus.focus.as_deref(), Some("screen"));
        assert!(pass.blocked_by.is_empty());
    }

    #[test]
    fn supplied_cycles_are_surfaced() {
        let pass = RenderPass::compute(&snapshot(), &ViewState::new(), &RenderOptions::default());
        assert_eq!(pass.cycle_count, 1);
        assert!(pass.is_cyclic("api"));
        assert!(!pass.is_cyclic("ghost"));
    }

    #[test]
    fn detected_and_merged_cycles() {
        let snapshot = Snapshot::from_nodes([
            Node::new("a", "A").depends_on("b"),
            Node::new("b", "B").depends_on("a"),
        ])
        .with_cycles(vec![vec!["b".to_string(), "a".to_string()]]);

        let detected = RenderOptions {
            cycle_source: CycleSource::Detected,
            ..RenderOptions::default()
        };
        let pass = RenderPass::compute(&snapshot, &ViewState::new(), &detected);
        assert_eq!(pass.cycles, vec![vec!["a".to_string(), "b".to_string()]]);

        let merged = RenderOptions {
            cycle_source: CycleSource::Merged,
            ..RenderOptions::default()
        };
        let pass = RenderPass::compute(&snapshot, &ViewState::new(), &merged);
        assert_eq!(pass.cycle_count, 1);
        assert!(pass.is_cyclic("a") && pass.is_cyclic("b"));
    }

    #[test]
    fn depths_reported_per_node() {
        let pass = RenderPass::compute(&snapshot(), &ViewState::new(), &RenderOptions::default());
        assert_eq!(pass.depths["schema"], 0);
        assert_eq!(pass.depths["api"], 1);
        assert_eq!(pass.depths["screen"], 2);
        assert_eq!(pass.depths["docs"], 0);
    }

    #[test]
    fn serializes_renderer_contract() {
        let state = ViewState::new().select_node(Some("screen"));
        let pass = RenderPass::compute(&snapshot(), &state, &RenderOptions::default());
        let json = serde_json::to_value(&pass).unwrap();

        assert!(json["nodePositions"]["schema"]["x"].is_u64());
        assert_eq!(json["lanes"][0]["name"], "Core");
        assert_eq!(json["lanes"][2]["isUnassigned"], true);
        assert_eq!(json["canvas"]["width"], pass.layout.canvas.width);
        assert_eq!(json["highlightedDependencyIds"][0], "api");
        assert_eq!(json["blockedByIds"][0], "api");
        assert_eq!(json["dimmedEdges"], serde_json::json!([["schema", "api"]]));
        assert_eq!(json["cycleCount"], 1);
    }
}
