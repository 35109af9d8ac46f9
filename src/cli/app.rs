//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{graph_cmd, query};
use crate::storage::Config;

#[derive(Parser)]
#[command(name = "techtree")]
#[command(author, version, about = "Swimlane layout for work-item dependency graphs")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the configured format)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Configuration file (replaces the project techtree.toml)
    #[arg(long, global = true, env = "TECHTREE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Lay out a snapshot and print positions, lanes and highlights
    Layout {
        /// Snapshot file (JSON or YAML), or - for stdin
        snapshot: PathBuf,

        /// Collapse a lane by id (repeatable)
        #[arg(long = "collapse", value_name = "LANE")]
        collapse: Vec<String>,

        /// Selected node id
        #[arg(long)]
        select: Option<String>,

        /// Hovered node id
        #[arg(long)]
        hover: Option<String>,

        /// Also detect cycles locally and merge them with the supplied list
        #[arg(long)]
        detect_cycles: bool,
    },

    /// Show the depth column of every node
    Depth {
        /// Snapshot file (JSON or YAML), or - for stdin
        snapshot: PathBuf,
    },

    /// Show lanes in render order
    Lanes {
        /// Snapshot file (JSON or YAML), or - for stdin
        snapshot: PathBuf,

        /// Collapse a lane by id (repeatable)
        #[arg(long = "collapse", value_name = "LANE")]
        collapse: Vec<String>,
    },

    /// Show what a node highlights and dims
    Focus {
        /// Snapshot file (JSON or YAML), or - for stdin
        snapshot: PathBuf,

        /// Node id to focus
        id: String,
    },

    /// Show the direct, not-done prerequisites of a node
    Blocked {
        /// Snapshot file (JSON or YAML), or - for stdin
        snapshot: PathBuf,

        /// Node id to inspect
        id: String,
    },

    /// Show supplied and detected dependency cycles
    Cycles {
        /// Snapshot file (JSON or YAML), or - for stdin
        snapshot: PathBuf,
    },

    /// Print the effective configuration
    Config,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let format = cli.format.unwrap_or_else(|| config.default_format.into());
    let output = Output::new(format, cli.verbose);

    output.verbose("techtree starting");
    if let Some(path) = &cli.config {
        output.verbose_ctx("config", &format!("Using config file: {}", path.display()));
    }

    match cli.command {
        Commands::Layout {
            snapshot,
            collapse,
            select,
            hover,
            detect_cycles,
        } => {
            let mut options = config.render_options();
            if detect_cycles {
                options.cycle_source = crate::view::CycleSource::Merged;
            }
            let request = graph_cmd::LayoutRequest {
                collapse,
                select,
                hover,
            };
            graph_cmd::layout(&output, &snapshot, &request, &options)?
        }

        Commands::Depth { snapshot } => graph_cmd::depth(&output, &snapshot)?,

        Commands::Lanes { snapshot, collapse } => {
            graph_cmd::lanes(&output, &snapshot, &collapse, &config.render_options())?
        }

        Commands::Focus { snapshot, id } => query::focus(&output, &snapshot, &id)?,

        Commands::Blocked { snapshot, id } => query::blocked(&output, &snapshot, &id)?,

        Commands::Cycles { snapshot } => graph_cmd::cycles(&output, &snapshot)?,

        Commands::Config => {
            if output.is_json() {
                output.data(&config);
            } else {
                print!("{}", config.to_toml()?);
            }
        }
    }

    output.verbose("Command completed successfully");
    Ok(())
}
