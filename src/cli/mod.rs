//! CLI module for routinr - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for scheduling a routine,
//! estimating its duration, and listing the catalog.

pub mod commands;
pub mod render;

pub use commands::{Cli, Commands};
