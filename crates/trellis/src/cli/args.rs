//! CLI argument structs for all commands.

use clap::Parser;

use super::types::FeatureStatusArg;

/// Arguments for the `add` command
#[derive(Parser, Debug, Clone)]
pub struct AddArgs {
    /// Feature id (unique, stable)
    pub id: String,

    /// Free-text description
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Priority (lower = more important, 1 is most important)
    #[arg(short, long)]
    pub priority: Option<i32>,

    /// Effort estimate (unitless, used as critical-path weight)
    #[arg(short, long)]
    pub effort: Option<f64>,

    /// Dependency ids (repeatable); each must already exist
    #[arg(short = 'D', long = "dep")]
    pub dependencies: Vec<String>,
}

/// Arguments for the `set-status` command
#[derive(Parser, Debug, Clone)]
pub struct SetStatusArgs {
    /// Feature id
    pub id: String,

    /// New status
    #[arg(value_enum)]
    pub status: FeatureStatusArg,
}

/// Arguments for the `show` command
#[derive(Parser, Debug, Clone)]
pub struct ShowArgs {
    /// Feature id
    pub id: String,
}

/// Arguments for the `plan` command
#[derive(Parser, Debug, Clone)]
pub struct PlanArgs {
    /// Emit concurrent waves instead of a linear order
    #[arg(long)]
    pub waves: bool,

    /// Treat failed dependencies as satisfied for ordering purposes
    #[arg(long)]
    pub ignore_failed: bool,
}
