//! # Storage Layer
//!
//! File access for the CLI. The engine itself performs no I/O; this layer
//! loads its inputs.
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Snapshot | JSON or YAML | any path, or `-` for stdin |
//! | Project config | TOML | `techtree.toml` in the current dir or an ancestor |
//! | Global config | TOML | `~/.config/techtree/config.toml` |

mod config;
mod source;

pub use config::{Config, ConfigError, OutputFormat, PROJECT_CONFIG_FILE};
pub use source::{read_snapshot, SnapshotFormat};
