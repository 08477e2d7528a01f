//! caseflow CLI
//!
//! Command-line driver for case step workflows backed by a local SQLite
//! store.

mod args;
mod cli;
mod renderer;

use anyhow::Result;
use args::{Args, Commands};
use caseflow_core::params::ListCases;
use clap::Parser;
use cli::Cli;
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        command,
    } = Args::parse();

    let renderer = TerminalRenderer::new(!no_color);

    match command {
        // Snapshot comparison needs no store
        Some(Changes(args)) => cli::compare_snapshots(&args, &renderer),
        Some(Case { command }) => {
            Cli::open(database_file, renderer)
                .await?
                .handle_case_command(command)
                .await
        }
        Some(Step { command }) => {
            Cli::open(database_file, renderer)
                .await?
                .handle_step_command(command)
                .await
        }
        None => {
            Cli::open(database_file, renderer)
                .await?
                .list_cases(&ListCases::default())
                .await
        }
    }
}
