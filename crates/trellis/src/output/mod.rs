//! Output formatting for CLI commands.
//!
//! Submodules:
//! - [`mermaid`]: Mermaid flowchart projection of the graph snapshot
//!
//! The helpers here are deliberately thin: the engine's contract is the
//! data it returns, and this module only turns that data into lines of
//! terminal text.

pub mod mermaid;

use colored::Colorize;
use terminal_size::{terminal_size, Width};

use crate::domain::{Feature, FeatureStatus};

const DEFAULT_TERMINAL_WIDTH: usize = 80;

/// Colorize a status label: green for complete, yellow for in-progress,
/// red for failed, default for pending.
pub fn colorize_status(status: FeatureStatus) -> String {
    let text = status.to_string();
    match status {
        FeatureStatus::Pending => text.normal().to_string(),
        FeatureStatus::InProgress => text.yellow().to_string(),
        FeatureStatus::Complete => text.green().to_string(),
        FeatureStatus::Failed => text.red().to_string(),
    }
}

/// One-line summary of a feature: id, priority, status, description.
pub fn feature_line(feature: &Feature) -> String {
    let description = if feature.description.is_empty() {
        String::new()
    } else {
        format!("  {}", feature.description)
    };
    format!(
        "{} [P{}] ({}){}",
        feature.id.as_str().cyan(),
        feature.priority,
        colorize_status(feature.status),
        description
    )
}

/// Wrap free text to the terminal width with a fixed indent.
pub fn wrap_indented(text: &str, indent: &str) -> String {
    let width = terminal_size()
        .map(|(Width(w), _)| usize::from(w))
        .unwrap_or(DEFAULT_TERMINAL_WIDTH);
    let options = textwrap::Options::new(width.max(20))
        .initial_indent(indent)
        .subsequent_indent(indent);
    textwrap::fill(text, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewFeature;

    #[test]
    fn feature_line_contains_id_priority_and_status() {
        colored::control::set_override(false);
        let mut feature = NewFeature::new("auth").into_feature();
        feature.priority = 3;
        feature.description = "login flow".to_string();

        let line = feature_line(&feature);
        assert!(line.contains("auth"));
        assert!(line.contains("[P3]"));
        assert!(line.contains("pending"));
        assert!(line.contains("login flow"));
    }
}
