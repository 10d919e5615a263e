//! CLI argument parsing and command dispatch.
//!
//! This module provides the command-line interface for trellis using
//! clap's derive API. The CLI is thin glue: every command loads the
//! feature list, calls one engine operation, prints the result, and
//! saves if it mutated anything.
//!
//! # Commands
//!
//! - `init`: Create an empty feature list
//! - `add`: Add a feature
//! - `set-status`: Transition a feature's status
//! - `show`: Show one feature
//! - `ready` / `blocked`: Derived status queries
//! - `cycles`: List dependency cycles
//! - `plan`: Sequential or wave execution plan
//! - `next`: The single best feature to work on
//! - `critical-path` / `scores`: Critical path analysis
//! - `graph`: Mermaid diagram of the dependency graph
//!
//! # Example
//!
//! ```bash
//! trellis add auth --priority 1
//! trellis add sessions --dep auth
//! trellis next
//! trellis plan --waves
//! ```

mod args;
mod execute;
mod types;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use args::{AddArgs, PlanArgs, SetStatusArgs, ShowArgs};
pub use types::FeatureStatusArg;

/// Trellis - dependency-graph scheduling for feature work
///
/// Tracks features, their dependencies and statuses in a JSONL file, and
/// answers "what is ready, in what order, and why".
#[derive(Parser, Debug)]
#[command(name = "trellis")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the feature-list file
    #[arg(short, long, global = true, default_value = "features.jsonl")]
    pub file: PathBuf,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create an empty feature list
    Init,

    /// Add a feature
    ///
    /// Dependencies must already exist; insertion is rejected with the
    /// exact offending id otherwise.
    Add(AddArgs),

    /// Change a feature's status
    ///
    /// Transitions are monotone; moving out of a terminal status is
    /// rejected.
    SetStatus(SetStatusArgs),

    /// Show one feature in detail
    Show(ShowArgs),

    /// List features that are ready to start
    Ready,

    /// List blocked features with their blockers
    Blocked,

    /// List dependency cycles
    Cycles,

    /// Print an execution plan
    Plan(PlanArgs),

    /// Print the single best feature to work on next
    Next,

    /// Print the critical path
    CriticalPath,

    /// Print priority scores
    Scores,

    /// Print a Mermaid diagram of the graph
    Graph,
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    ///
    /// # Errors
    ///
    /// Returns the clap error on invalid arguments.
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Execute the CLI command
    ///
    /// # Errors
    ///
    /// Propagates engine errors (validation, transition, cycle) with
    /// their exact messages.
    pub async fn execute(&self) -> Result<()> {
        use crate::app::App;

        match &self.command {
            Commands::Init => execute::execute_init(&self.file).await,
            Commands::Add(args) => {
                let mut app = App::open(&self.file).await?;
                execute::execute_add(&mut app, args).await
            }
            Commands::SetStatus(args) => {
                let mut app = App::open(&self.file).await?;
                execute::execute_set_status(&mut app, args).await
            }
            Commands::Show(args) => {
                let app = App::open(&self.file).await?;
                execute::execute_show(&app, args).await
            }
            Commands::Ready => {
                let app = App::open(&self.file).await?;
                execute::execute_ready(&app).await
            }
            Commands::Blocked => {
                let app = App::open(&self.file).await?;
                execute::execute_blocked(&app).await
            }
            Commands::Cycles => {
                let app = App::open(&self.file).await?;
                execute::execute_cycles(&app).await
            }
            Commands::Plan(args) => {
                let app = App::open(&self.file).await?;
                execute::execute_plan(&app, args).await
            }
            Commands::Next => {
                let app = App::open(&self.file).await?;
                execute::execute_next(&app).await
            }
            Commands::CriticalPath => {
                let app = App::open(&self.file).await?;
                execute::execute_critical_path(&app).await
            }
            Commands::Scores => {
                let app = App::open(&self.file).await?;
                execute::execute_scores(&app).await
            }
            Commands::Graph => {
                let app = App::open(&self.file).await?;
                execute::execute_graph(&app).await
            }
        }
    }
}
