//! Call Tree Renderer
//!
//! Renders the registry as a tree expanded from the roots: each node's
//! children are its outgoing calls. The most recently added function is
//! marked with `*`. When the simple root filter finds nothing on a
//! non-empty registry (every function sits in a cycle), rendering falls
//! back to the sort-based root scan.

use crate::domain::node::{outgoing_adjacency, FunctionNode};
use crate::domain::toposort::roots_from_sequence;
use crate::domain::tracker::FunctionTracker;

pub fn render_tree(tracker: &mut FunctionTracker) -> String {
    if tracker.is_empty() {
        return String::new();
    }

    let mut roots = tracker.roots();
    if roots.is_empty() {
        // There are cycles in the call graph; show the topological scan's
        // roots instead.
        let order = tracker.sorted();
        roots = roots_from_sequence(tracker.nodes(), order.sequence());
    }

    let nodes = tracker.nodes();
    let adjacency = outgoing_adjacency(nodes);
    let mut out = String::new();
    let mut on_path = Vec::new();

    for &root in &roots {
        out.push_str(&label(nodes, root));
        out.push('\n');
        on_path.push(root);
        render_children(nodes, &adjacency, root, "", &mut on_path, &mut out);
        on_path.pop();
    }

    out
}

fn label(nodes: &[FunctionNode], index: usize) -> String {
    if nodes[index].highlight {
        format!("{} *", nodes[index].short_name())
    } else {
        nodes[index].short_name().to_string()
    }
}

fn render_children(
    nodes: &[FunctionNode],
    adjacency: &[Vec<usize>],
    index: usize,
    prefix: &str,
    on_path: &mut Vec<usize>,
    out: &mut String,
) {
    let children = &adjacency[index];
    for (i, &child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        out.push_str(prefix);
        out.push_str(if last { "└── " } else { "├── " });

        // A child already on the current path closes a cycle; annotate and
        // stop instead of expanding forever.
        if on_path.contains(&child) {
            out.push_str(&label(nodes, child));
            out.push_str(" (recursive)\n");
            continue;
        }

        out.push_str(&label(nodes, child));
        out.push('\n');

        let child_prefix = format!("{prefix}{}", if last { "    " } else { "│   " });
        on_path.push(child);
        render_children(nodes, adjacency, child, &child_prefix, on_path, out);
        on_path.pop();
    }
}
