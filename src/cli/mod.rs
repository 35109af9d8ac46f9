//! # Command-Line Interface
//!
//! The `techtree` binary: reads a provider snapshot, runs the layout
//! engine, and prints the result.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `layout` | Full render pass: positions, lanes, canvas, focus, blocked-by, cycles |
//! | `depth` | Depth column per node |
//! | `lanes` | Lanes in render order |
//! | `focus` | Highlight and dim sets for a node |
//! | `blocked` | Direct not-done prerequisites |
//! | `cycles` | Supplied vs. detected cycles |
//! | `config` | Effective configuration |
//!
//! ## Output Formats
//!
//! All commands support `--format`:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON (the renderer contract)
//!
//! Use `--verbose` (or `-v`) for debug output on stderr.
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod graph_cmd;
mod output;
mod query;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
