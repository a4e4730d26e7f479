//! Graphviz DOT Exporter
//!
//! Exports the tracked call graph as DOT for rendering outside the
//! terminal.

use std::path::Path;

use crate::domain::tracker::FunctionTracker;
use crate::error::Result;

pub struct DotExporter;

impl DotExporter {
    /// Write the registry to `path` in DOT format.
    pub fn export(tracker: &FunctionTracker, path: &Path) -> Result<()> {
        let content = Self::to_dot(tracker);
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Convert the registry to a DOT string.
    pub fn to_dot(tracker: &FunctionTracker) -> String {
        let mut lines = Vec::new();

        lines.push("digraph calltrail {".to_string());
        lines.push("    rankdir=LR;".to_string());
        lines.push("    node [fontname=\"Helvetica\", fontsize=12, shape=box];".to_string());
        lines.push("    edge [fontname=\"Helvetica\", fontsize=10];".to_string());
        lines.push(String::new());

        for node in tracker.nodes() {
            let id = Self::escape_label(&node.display_name());
            let label = Self::escape_label(node.short_name());
            // The most recently tracked function gets the accent fill.
            let fill = if node.highlight { "#a6e3a1" } else { "#89b4fa" };
            lines.push(format!(
                "    \"{}\" [label=\"{}\", style=\"filled\", fillcolor=\"{}\"];",
                id, label, fill
            ));
        }

        lines.push(String::new());

        for node in tracker.nodes() {
            let from = Self::escape_label(&node.display_name());
            for callee in &node.outgoing {
                lines.push(format!(
                    "    \"{}\" -> \"{}\";",
                    from,
                    Self::escape_label(callee)
                ));
            }
        }

        lines.push("}".to_string());

        lines.join("\n")
    }

    fn escape_label(label: &str) -> String {
        label
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n")
    }
}
