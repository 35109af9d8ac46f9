//! Focus highlighting
//!
//! The focused node is the selected one, or the hovered one when nothing
//! in the graph is selected. Focus highlights exactly one hop in each direction and dims
//! everything else.

use serde::Serialize;
use std::collections::HashSet;

use crate::domain::GraphModel;

/// A `[dependency, dependent]` pair
pub type Edge = [String; 2];

/// Picks the focus id: selection wins over hover
pub fn focus_id<'a>(selected: Option<&'a str>, hovered: Option<&'a str>) -> Option<&'a str> {
    selected.or(hovered)
}

/// Highlight and dim sets derived from one focus node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusView {
    /// The focused node, if it exists in the graph
    #[serde(rename = "focusId")]
    pub focus: Option<String>,

    /// Direct dependencies of the focus
    #[serde(rename = "highlightedDependencyIds")]
    pub dependencies: Vec<String>,

    /// Direct dependents of the focus
    #[serde(rename = "highlightedDependentIds")]
    pub dependents: Vec<String>,
}

impl FocusView {
    /// Derives the view for a focus id; unknown ids mean no focus
    pub fn resolve(graph: &GraphModel, focus: Option<&str>) -> Self {
        let Some(id) = focus.filter(|id| graph.contains(id)) else {
            return Self::default();
        };

        Self {
            focus: Some(id.to_string()),
            dependencies: owned(graph.dependencies(id)),
            dependents: owned(graph.dependents(id)),
        }
    }

    /// Derives the view from selection and hover state
    ///
    /// A selected id missing from the graph does not shadow a valid hover.
    pub fn from_selection(
        graph: &GraphModel,
        selected: Option<&str>,
        hovered: Option<&str>,
    ) -> Self {
        let selected = selected.filter(|id| graph.contains(id));
        Self::resolve(graph, focus_id(selected, hovered))
    }

    pub fn has_focus(&self) -> bool {
        self.focus.is_some()
    }

    pub fn is_focus(&self, id: &str) -> bool {
        self.focus.as_deref() == Some(id)
    }

    /// Returns true if the node is the focus or one hop from it
    pub fn is_highlighted(&self, id: &str) -> bool {
        self.is_focus(id)
            || self.dependencies.iter().any(|d| d == id)
            || self.dependents.iter().any(|d| d == id)
    }

    /// Returns true if the node should render dimmed
    pub fn is_dimmed(&self, id: &str) -> bool {
        self.has_focus() && !self.is_highlighted(id)
    }

    /// Returns true if the `dependency -> dependent` edge should render dimmed
    ///
    /// Only edges touching the focus stay lit.
    pub fn is_edge_dimmed(&self, dependency: &str, dependent: &str) -> bool {
        self.has_focus() && !self.is_focus(dependency) && !self.is_focus(dependent)
    }

    /// Ids of every dimmed node, in snapshot order
    pub fn dimmed_nodes(&self, graph: &GraphModel) -> Vec<String> {
        if !self.has_focus() {
            return vec![];
        }
        let lit: HashSet<&str> = self
            .dependencies
            .iter()
            .chain(&self.dependents)
            .chain(&self.focus)
            .map(String::as_str)
            .collect();
        graph
            .node_ids()
            .filter(|id| !lit.contains(id))
            .map(str::to_string)
            .collect()
    }

    /// Every dimmed `dependency -> dependent` edge, in adjacency order
    pub fn dimmed_edges(&self, graph: &GraphModel) -> Vec<Edge> {
        if !self.has_focus() {
            return vec![];
        }
        graph
            .edges()
            .filter(|&(dependency, dependent)| self.is_edge_dimmed(dependency, dependent))
            .map(|(dependency, dependent)| [dependency.to_string(), dependent.to_string()])
            .collect()
    }
}

fn owned(ids: Vec<&str>) -> Vec<String> {
    ids.into_iter().map(str::to_string).collect()
}
