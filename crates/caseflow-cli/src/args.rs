use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{CaseCommands, ChangesArgs, StepCommands};

/// Drive multi-step cases from the command line
///
/// Cases are ordered step workflows (new lease, driver payee, address
/// update). Each step is submitted with its data and, when allowed, the case
/// advances to its next step.
#[derive(Parser)]
#[command(version, about, name = "caseflow")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/caseflow/caseflow.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the caseflow CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Manage cases
    #[command(alias = "c")]
    Case {
        #[command(subcommand)]
        command: CaseCommands,
    },
    /// Submit and advance steps of a case
    #[command(alias = "s")]
    Step {
        #[command(subcommand)]
        command: StepCommands,
    },
    /// Compare two form snapshots for manual changes
    Changes(ChangesArgs),
}
