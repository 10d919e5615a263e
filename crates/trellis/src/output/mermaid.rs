//! Mermaid flowchart projection of a graph snapshot.
//!
//! A pure function from [`GraphSnapshot`] to Mermaid `graph TD` syntax;
//! the engine draws nothing itself. Node labels are truncated and
//! sanitized so arbitrary descriptions can't break the diagram syntax.

use crate::domain::{FeatureStatus, GraphSnapshot};

/// Maximum description length shown in a node label.
const LABEL_DESCRIPTION_LIMIT: usize = 30;

/// Render a snapshot as a Mermaid flowchart.
///
/// Nodes are emitted in snapshot (id) order and edges point from a
/// dependency to its dependent, so the chart reads in execution
/// direction. Statuses get `classDef` styling: complete (green),
/// in-progress (amber), failed (red).
pub fn render(snapshot: &GraphSnapshot) -> String {
    let mut lines = vec!["graph TD".to_string()];

    for node in &snapshot.nodes {
        let class = match node.status {
            FeatureStatus::Pending => "",
            FeatureStatus::InProgress => ":::inprogress",
            FeatureStatus::Complete => ":::complete",
            FeatureStatus::Failed => ":::failed",
        };

        let label = if node.description.is_empty() {
            node.id.to_string()
        } else {
            format!("{}: {}", node.id, truncate(&node.description))
        };
        lines.push(format!(
            "    {}[\"{}\"]{}",
            sanitize(node.id.as_str()),
            sanitize(&label),
            class
        ));
    }

    // Edges are stored (dependent, dependency); draw dependency first.
    for (dependent, dependency) in &snapshot.edges {
        lines.push(format!(
            "    {} --> {}",
            sanitize(dependency.as_str()),
            sanitize(dependent.as_str())
        ));
    }

    lines.push(String::new());
    lines.push("    classDef complete fill:#90EE90".to_string());
    lines.push("    classDef inprogress fill:#FFE4B5".to_string());
    lines.push("    classDef failed fill:#FFB6C1".to_string());

    lines.join("\n")
}

fn truncate(description: &str) -> String {
    if description.chars().count() <= LABEL_DESCRIPTION_LIMIT {
        description.to_string()
    } else {
        description.chars().take(LABEL_DESCRIPTION_LIMIT).collect()
    }
}

fn sanitize(text: &str) -> String {
    text.replace('"', "'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeatureId, SnapshotNode};

    fn snapshot() -> GraphSnapshot {
        GraphSnapshot {
            nodes: vec![
                SnapshotNode {
                    id: FeatureId::new("f1"),
                    description: "base layer".to_string(),
                    status: FeatureStatus::Complete,
                },
                SnapshotNode {
                    id: FeatureId::new("f2"),
                    description: String::new(),
                    status: FeatureStatus::Pending,
                },
            ],
            edges: vec![(FeatureId::new("f2"), FeatureId::new("f1"))],
        }
    }

    #[test]
    fn renders_nodes_edges_and_classes() {
        let chart = render(&snapshot());

        assert!(chart.starts_with("graph TD"));
        assert!(chart.contains("f1[\"f1: base layer\"]:::complete"));
        assert!(chart.contains("f2[\"f2\"]"));
        assert!(chart.contains("    f1 --> f2"));
        assert!(chart.contains("classDef complete"));
    }

    #[test]
    fn long_descriptions_are_truncated() {
        let mut snap = snapshot();
        snap.nodes[0].description = "x".repeat(100);

        let chart = render(&snap);
        let line = chart
            .lines()
            .find(|l| l.contains("f1[\""))
            .expect("node line present");
        assert!(line.len() < 100);
    }

    #[test]
    fn quotes_in_descriptions_are_sanitized() {
        let mut snap = snapshot();
        snap.nodes[0].description = "say \"hi\"".to_string();

        let chart = render(&snap);
        assert!(chart.contains("say 'hi'"));
    }
}
