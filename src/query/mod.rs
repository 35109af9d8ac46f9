//! Interactive graph queries
//!
//! Derived views over a [`GraphModel`](crate::domain::GraphModel). Nothing
//! here mutates graph data.

mod blocked;
mod focus;

pub use blocked::{blocked_by, is_blocked};
pub use focus::{focus_id, Edge, FocusView};
