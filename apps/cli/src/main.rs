#![warn(rust_2018_idioms, unused_lifetimes)]
#![allow(clippy::print_stdout)]

pub mod handlers;
pub mod models;

use crate::handlers::{keyed, markers, name};
use crate::models::args::{AppCommands, Cli, KeyedAction, NameAction};

use anyhow::Result;
use clap::Parser;
use gedx_logger::{Logger, verbosity_level};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _logger = Logger::builder()
        .name("gedx")
        .level(verbosity_level(cli.verbose))
        .json(cli.json_logs)
        .init()?;

    match cli.command {
        AppCommands::Name { action } => match action {
            NameAction::Encode { namespace, local } => name::encode(&namespace, &local)?,
            NameAction::Decode { candidate, namespaces } => name::decode(&candidate, &namespaces)?,
        },
        AppCommands::Keyed { action } => match action {
            KeyedAction::Normalize { file } => keyed::normalize(&file)?,
        },
        AppCommands::Markers { config } => markers::list(config.as_deref())?,
    }

    Ok(())
}
