//! Layout commands (layout, depth, lanes, cycles)

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Result;

use super::output::Output;
use crate::domain::{GraphModel, Snapshot};
use crate::layout::{self, DepthMap};
use crate::storage::read_snapshot;
use crate::view::{RenderOptions, RenderPass, ViewState};

/// UI state requested on the command line
pub struct LayoutRequest {
    pub collapse: Vec<String>,
    pub select: Option<String>,
    pub hover: Option<String>,
}

/// Loads a snapshot and reports skipped nodes in verbose mode
pub(super) fn load_snapshot(output: &Output, path: &Path) -> Result<Snapshot> {
    output.verbose_ctx("snapshot", &format!("Reading snapshot: {}", path.display()));
    let snapshot = read_snapshot(path)?;

    output.verbose_ctx(
        "snapshot",
        &format!(
            "Loaded {} nodes, {} cycles, {} eras",
            snapshot.len(),
            snapshot.cycles.len(),
            snapshot.eras.len()
        ),
    );
    for skipped in &snapshot.skipped {
        output.verbose_ctx(
            "snapshot",
            &format!(
                "Skipped node #{} ({}): {}",
                skipped.index,
                skipped.id.as_deref().unwrap_or("no id"),
                skipped.reason
            ),
        );
    }

    Ok(snapshot)
}

/// Runs a full render pass and prints it
pub fn layout(
    output: &Output,
    path: &Path,
    request: &LayoutRequest,
    options: &RenderOptions,
) -> Result<()> {
    let snapshot = load_snapshot(output, path)?;

    let mut state = ViewState::new()
        .select_node(request.select.as_deref())
        .hover_node(request.hover.as_deref());
    for lane in &request.collapse {
        if !state.is_collapsed(lane) {
            state = state.toggle_lane(lane);
        }
    }

    let pass = RenderPass::compute(&snapshot, &state, options);
    output.verbose_ctx(
        "layout",
        &format!(
            "{} lanes, {} positioned nodes, canvas {}x{}",
            pass.layout.lanes.len(),
            pass.layout.positions.len(),
            pass.layout.canvas.width,
            pass.layout.canvas.height
        ),
    );

    for id in [request.select.as_deref(), request.hover.as_deref()].into_iter().flatten() {
        if !snapshot.nodes.iter().any(|n| n.id == id) {
            output.warn(&format!("Node not found: {}", id));
        }
    }

    if output.is_json() {
        output.data(&pass);
        return Ok(());
    }

    println!(
        "Canvas {}x{} ({} lanes, {} nodes)",
        pass.layout.canvas.width,
        pass.layout.canvas.height,
        pass.layout.lanes.len(),
        snapshot.len()
    );
    if pass.cycle_count > 0 {
        println!("Warning: {} dependency cycle(s)", pass.cycle_count);
    }

    let graph = GraphModel::from_snapshot(&snapshot);
    for lane in &pass.layout.lanes {
        println!();
        let suffix = if lane.is_collapsed { " (collapsed)" } else { "" };
        println!(
            "{} [{}] top={} height={}{}",
            lane.name, lane.color, lane.top, lane.height, suffix
        );
        if lane.is_collapsed {
            continue;
        }
        for id in &lane.node_ids {
            let Some(node) = graph.get(id) else { continue };
            let Some(pos) = pass.layout.position(id) else { continue };
            let mut flags = String::new();
            if pass.focus.is_focus(id) {
                flags.push_str(" *");
            } else if pass.focus.is_dimmed(id) {
                flags.push_str(" (dim)");
            }
            if pass.is_cyclic(id) {
                flags.push_str(" !cycle");
            }
            println!(
                "  {} {:<16} {:<30} x={:<5} y={:<5} depth={}{}",
                node.status.indicator(),
                id,
                node.title,
                pos.x,
                pos.y,
                pass.depths.get(id).copied().unwrap_or(0),
                flags
            );
        }
    }

    if let Some(focus) = &pass.focus.focus {
        println!();
        println!("Focus: {}", focus);
        println!("  Depends on: {}", list_or_none(&pass.focus.dependencies));
        println!("  Dependents: {}", list_or_none(&pass.focus.dependents));
        if request.select.as_deref() == Some(focus.as_str()) {
            println!("  Blocked by: {}", list_or_none(&pass.blocked_by));
        }
    }

    Ok(())
}

/// Prints the depth column of every node
pub fn depth(output: &Output, path: &Path) -> Result<()> {
    let snapshot = load_snapshot(output, path)?;
    let graph = GraphModel::from_snapshot(&snapshot);
    let depths = DepthMap::resolve(&graph);
    output.verbose_ctx("depth", &format!("Max depth: {}", depths.max_depth()));

    let mut rows: Vec<(&str, usize, &str)> = graph
        .nodes()
        .iter()
        .map(|n| (n.id.as_str(), depths.get(&n.id).unwrap_or(0), n.title.as_str()))
        .collect();
    rows.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));

    if output.is_json() {
        let items: Vec<_> = rows
            .iter()
            .map(|(id, depth, title)| {
                serde_json::json!({
                    "id": id,
                    "title": title,
                    "depth": depth,
                })
            })
            .collect();
        output.data(&items);
    } else if rows.is_empty() {
        println!("No nodes.");
    } else {
        println!("{:<6} {:<20} TITLE", "DEPTH", "ID");
        println!("{}", "-".repeat(60));
        for (id, depth, title) in rows {
            println!("{:<6} {:<20} {}", depth, id, title);
        }
    }

    Ok(())
}

/// Prints lanes in render order
pub fn lanes(
    output: &Output,
    path: &Path,
    collapse: &[String],
    options: &RenderOptions,
) -> Result<()> {
    let snapshot = load_snapshot(output, path)?;
    let graph = GraphModel::from_snapshot(&snapshot);
    let collapsed: BTreeSet<String> = collapse.iter().cloned().collect();
    let (_, layout) = layout::layout(&graph, &collapsed, &options.metrics, &options.lane_style);
    output.verbose_ctx("lanes", &format!("Found {} lanes", layout.lanes.len()));

    if output.is_json() {
        output.data(&layout.lanes);
    } else if layout.lanes.is_empty() {
        println!("No lanes.");
    } else {
        println!("{:<20} {:<24} {:<8} {:<6} {:<6} NODES", "ID", "NAME", "COLOR", "TOP", "HEIGHT");
        println!("{}", "-".repeat(80));
        for lane in &layout.lanes {
            println!(
                "{:<20} {:<24} {:<8} {:<6} {:<6} {}{}",
                lane.id,
                lane.name,
                lane.color,
                lane.top,
                lane.height,
                lane.node_ids.join(", "),
                if lane.is_collapsed { " (collapsed)" } else { "" }
            );
        }
    }

    Ok(())
}

/// Prints supplied and locally detected cycles
pub fn cycles(output: &Output, path: &Path) -> Result<()> {
    let snapshot = load_snapshot(output, path)?;
    let graph = GraphModel::from_snapshot(&snapshot);
    let detected = graph.detect_cycles();
    output.verbose_ctx(
        "cycles",
        &format!(
            "{} supplied, {} detected",
            snapshot.cycles.len(),
            detected.len()
        ),
    );

    if output.is_json() {
        output.data(&serde_json::json!({
            "supplied": snapshot.cycles,
            "detected": detected,
        }));
        return Ok(());
    }

    println!("Supplied cycles ({}):", snapshot.cycles.len());
    for cycle in &snapshot.cycles {
        println!("  {}", cycle.join(" -> "));
    }
    println!("Detected cycles ({}):", detected.len());
    for cycle in &detected {
        println!("  {}", cycle.join(", "));
    }

    Ok(())
}

fn list_or_none(ids: &[String]) -> String {
    if ids.is_empty() {
        "(none)".to_string()
    } else {
        ids.join(", ")
    }
}
