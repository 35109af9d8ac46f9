//! techtree - Swimlane layout for work-item dependency graphs
//!
//! Converts a snapshot of work items connected by prerequisite edges into a
//! deterministic, track-organized 2D layout, and answers the interactive
//! queries behind a "tech tree" view: what a focused node highlights and
//! what blocks a selected node. Snapshots may be partial or cyclic; neither
//! stops a layout.

pub mod cli;
pub mod domain;
pub mod layout;
pub mod query;
pub mod storage;
pub mod view;

pub use domain::{GraphModel, Node, NodeStatus, Snapshot, Track};
pub use layout::{DepthMap, Layout, LayoutMetrics};
pub use query::FocusView;
pub use view::{RenderOptions, RenderPass, ViewState};
