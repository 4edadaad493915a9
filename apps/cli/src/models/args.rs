//! # CLI Argument Definitions
//!
//! Command-line structure of the `gedx` tool, built with `clap`'s derive API.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "gedx")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Inspect GEDX wire names, keyed collections and model markers")]
pub struct Cli {
    /// Raise log verbosity (-v debug, -vv trace); logs go to stderr
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Emit logs as JSON objects
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: AppCommands,
}

#[derive(Debug, Subcommand)]
pub enum AppCommands {
    /// Convert between qualified names and wire property names
    Name {
        #[command(subcommand)]
        action: NameAction,
    },
    /// Work with keyed collections
    Keyed {
        #[command(subcommand)]
        action: KeyedAction,
    },
    /// List model types declared in marker files
    Markers {
        /// Config file (TOML, YAML or JSON); `GEDX__*` variables override it
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Subcommand)]
pub enum NameAction {
    /// Print the wire name of a (namespace, local) pair
    Encode {
        /// Namespace URI; pass "" for an unqualified name
        namespace: String,
        local: String,
    },
    /// Split a wire name into namespace and local name
    Decode {
        candidate: String,
        /// Namespace to treat as known; repeatable
        #[arg(short, long = "namespace")]
        namespaces: Vec<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum KeyedAction {
    /// Decode a keyed object and print it re-encoded
    Normalize {
        /// JSON file holding the keyed object; `-` reads stdin
        file: PathBuf,
    },
}
