//! Teaching-hours report CLI library.
//!
//! This crate provides the CLI interface for the `hetd` report.

mod cli;
pub mod commands;
mod config;

pub use cli::Cli;
pub use config::Config;
