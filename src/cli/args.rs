//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Topology-aware node weighting for placement decisions
#[derive(Parser, Debug)]
#[command(name = "netmap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute bucket weights and print the weighted tree
    Weights {
        /// Topology file (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        topology: PathBuf,
    },

    /// List nodes ordered by composite score
    Rank {
        /// Topology file (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        topology: PathBuf,

        /// Show at most this many nodes
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,

    /// Print a template config file
    Template,
}
