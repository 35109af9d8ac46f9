//! Property tests for the layout engine
//!
//! Random graphs are generated as acyclic by construction (a node may only
//! depend on lower-numbered nodes), plus a few dangling ids and optional
//! tracks.

use proptest::prelude::*;
use std::collections::BTreeSet;

use techtree::domain::{GraphModel, Node, Track};
use techtree::layout::{self, DepthMap, LaneStyle, LayoutMetrics};
use techtree::{RenderOptions, RenderPass, Snapshot, ViewState};

fn node_strategy(max_nodes: usize) -> impl Strategy<Value = Vec<Node>> {
    prop::collection::vec(
        (
            prop::collection::vec(any::<prop::sample::Index>(), 0..4),
            0i64..5,
            prop::option::of(0usize..3),
            any::<bool>(),
        ),
        1..max_nodes,
    )
    .prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (deps, priority, track, dangling))| {
                let mut node = Node::new(format!("n{i:03}"), format!("Task {}", i % 4))
                    .with_priority(priority);
                if i > 0 {
                    for dep in deps {
                        node = node.depends_on(format!("n{:03}", dep.index(i)));
                    }
                }
                if dangling {
                    node = node.depends_on("missing");
                }
                if let Some(t) = track {
                    node = node.with_track(Track::bare(format!("track-{t}")));
                }
                node
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn layout_is_deterministic(nodes in node_strategy(40), collapse in prop::option::of(0usize..3)) {
        let snapshot = Snapshot::from_nodes(nodes);
        let mut state = ViewState::new();
        if let Some(t) = collapse {
            state = state.toggle_lane(&format!("track-{t}"));
        }
        let options = RenderOptions::default();

        let first = RenderPass::compute(&snapshot, &state, &options);
        let second = RenderPass::compute(&snapshot, &state, &options);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn depth_is_monotone_along_edges(nodes in node_strategy(40)) {
        let graph = GraphModel::from_nodes(&nodes);
        let depths = DepthMap::resolve(&graph);

        for (dependency, dependent) in graph.edges() {
            let d = depths.get(dependency).unwrap();
            let n = depths.get(dependent).unwrap();
            prop_assert!(n >= d + 1, "{} ({}) -> {} ({})", dependency, d, dependent, n);
        }
        for node in graph.nodes() {
            if graph.dependencies(&node.id).is_empty() {
                prop_assert_eq!(depths.get(&node.id), Some(0));
            }
        }
    }

    #[test]
    fn every_node_lands_in_exactly_one_lane(nodes in node_strategy(40)) {
        let graph = GraphModel::from_nodes(&nodes);
        let (_, result) = layout::layout(
            &graph,
            &BTreeSet::new(),
            &LayoutMetrics::default(),
            &LaneStyle::default(),
        );

        let mut seen = BTreeSet::new();
        for lane in &result.lanes {
            for id in &lane.node_ids {
                prop_assert!(seen.insert(id.clone()), "{} in two lanes", id);
            }
        }
        prop_assert_eq!(seen.len(), graph.len());
        prop_assert_eq!(result.positions.len(), graph.len());
        prop_assert!(result.lanes.iter().rev().skip(1).all(|l| !l.is_unassigned));
    }

    #[test]
    fn collapse_shifts_only_lower_lanes(nodes in node_strategy(40), lane in 0usize..3) {
        let graph = GraphModel::from_nodes(&nodes);
        let metrics = LayoutMetrics::default();
        let style = LaneStyle::default();
        let lane_id = format!("track-{lane}");

        let (_, open) = layout::layout(&graph, &BTreeSet::new(), &metrics, &style);
        let collapsed: BTreeSet<String> = [lane_id.clone()].into_iter().collect();
        let (_, closed) = layout::layout(&graph, &collapsed, &metrics, &style);

        let Some(pos) = open.lanes.iter().position(|l| l.id == lane_id) else {
            prop_assert_eq!(open, closed);
            return Ok(());
        };
        let delta = open.lanes[pos].height - closed.lanes[pos].height;

        for i in 0..open.lanes.len() {
            if i < pos {
                prop_assert_eq!(&open.lanes[i], &closed.lanes[i]);
            } else if i > pos {
                prop_assert_eq!(open.lanes[i].top - delta, closed.lanes[i].top);
            }
        }
        prop_assert_eq!(open.canvas.height - delta, closed.canvas.height);
    }
}
