//! CLI module - Command-line interface for rosterd
//!
//! Task names mirror the operator commands: `migrate`, `migrate.revert`,
//! `migrate.users`. Running without a command starts the web host.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// rosterd - Schema migration and seed-account host
#[derive(Parser)]
#[command(name = "rosterd")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config.toml (default: search standard locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web host (runs the on-boot migration and seeding hook first)
    Serve,

    /// Run all pending schema migrations, then ensure the seed accounts exist
    Migrate,

    /// Revert one named application migration ("last" and "all" are accepted)
    #[command(name = "migrate.revert")]
    MigrateRevert {
        /// Migration name, e.g. m1001_index_request_logs
        name: String,
    },

    /// Delete and recreate every seed account without touching the schema
    #[command(name = "migrate.users")]
    MigrateUsers,

    /// Create default config file
    Init,
}

pub use commands::*;
