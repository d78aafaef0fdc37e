//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - schedule: fit a routine into a number of minutes
//! - estimate: minimum time a routine needs per tier
//! - routines: list routines in the catalog

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::Tier;
use crate::scheduler::Engine;

/// routinr - fit a routine's tasks into the time you have
#[derive(Parser, Debug)]
#[command(name = "routinr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Task catalog path (overrides storage.catalog_path)
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Schedule a routine into the available time
    Schedule {
        /// Routine name
        routine: String,

        /// Minutes available, before the routine's buffer
        #[arg(short, long)]
        minutes: u64,

        /// Scheduling engine (two-stage, exhaustive)
        #[arg(short, long)]
        engine: Option<Engine>,

        /// Print the schedule as JSON
        #[arg(long)]
        json: bool,
    },

    /// Estimate how long a routine takes at its minimum
    Estimate {
        /// Routine name
        routine: String,

        /// Only count tasks at or above this tier (essential, core, optional)
        #[arg(short, long)]
        tier: Option<Tier>,
    },

    /// List routines in the catalog
    Routines,
}
