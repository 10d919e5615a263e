//! CLI-facing value types.

use clap::ValueEnum;

use crate::domain::FeatureStatus;

/// Status values accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FeatureStatusArg {
    /// Not started yet.
    Pending,
    /// Currently being worked on.
    InProgress,
    /// Finished successfully.
    Complete,
    /// Finished unsuccessfully.
    Failed,
}

impl From<FeatureStatusArg> for FeatureStatus {
    fn from(arg: FeatureStatusArg) -> Self {
        match arg {
            FeatureStatusArg::Pending => FeatureStatus::Pending,
            FeatureStatusArg::InProgress => FeatureStatus::InProgress,
            FeatureStatusArg::Complete => FeatureStatus::Complete,
            FeatureStatusArg::Failed => FeatureStatus::Failed,
        }
    }
}
