//! Call Graph Node
//!
//! One tracked function: its identity, the text of its body, its edges to
//! other tracked functions, and the scratch state used by the graph
//! algorithms.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::symbol::SymbolInfo;

/// A node in the tracked-function call graph.
///
/// Edges are stored symmetrically by display name: `a` listing `b` in
/// `outgoing` implies `b` lists `a` in `incoming`. The registry is the only
/// owner of nodes; adjacency never dangles because deletion scrubs the
/// departed name from every remaining node.
#[derive(Debug, Clone)]
pub struct FunctionNode {
    /// Containment chain from outermost symbol to the function itself.
    pub path: Vec<SymbolInfo>,

    /// The identifier used to recognize calls to this function inside other
    /// tracked bodies. For languages whose outline names carry a parameter
    /// list, the suffix has already been stripped.
    pub call_site_name: String,

    /// Full source text of the function body. Used only as a substring
    /// search corpus.
    pub content: String,

    /// Display names of tracked functions that call this one.
    pub incoming: Vec<String>,

    /// Display names of tracked functions this one calls.
    pub outgoing: Vec<String>,

    // Scratch state for the SCC and sort passes. Meaningless outside a run;
    // every run resets it for the full node set first.
    //
    // `visit_index` is Tarjan's NUMBER: the DFS iteration at which the node
    // was first visited, 0 while unvisited. Nodes that end up with the same
    // `lowlink` are in the same strongly connected component.
    pub visit_index: usize,
    pub lowlink: usize,
    pub on_stack: bool,

    pub last_update_time: DateTime<Utc>,

    /// Max `last_update_time` over the subtree reachable through outgoing
    /// edges. Propagated from a newly added node toward its callers so the
    /// most recently touched call hierarchy sorts first in views.
    pub last_update_time_of_children: DateTime<Utc>,

    /// True only for the most recently added node.
    pub highlight: bool,
}

impl FunctionNode {
    pub fn new(path: Vec<SymbolInfo>, content: String, call_site_name: String) -> Self {
        let now = Utc::now();
        Self {
            path,
            call_site_name,
            content,
            incoming: Vec::new(),
            outgoing: Vec::new(),
            visit_index: 0,
            lowlink: 0,
            on_stack: false,
            last_update_time: now,
            last_update_time_of_children: now,
            highlight: false,
        }
    }

    /// The innermost symbol: the function itself.
    pub fn symbol(&self) -> Option<&SymbolInfo> {
        self.path.last()
    }

    /// Short label for rendering: the function's own name.
    pub fn short_name(&self) -> &str {
        self.path
            .last()
            .map(|s| s.name.as_str())
            .unwrap_or(&self.call_site_name)
    }

    /// The de-duplication key. The full `::`-joined containment path when
    /// there is one, otherwise the call-site name.
    pub fn display_name(&self) -> String {
        if self.path.len() > 1 {
            self.path
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
                .join("::")
        } else {
            self.call_site_name.clone()
        }
    }

    /// Two nodes refer to the same function iff their display names match.
    pub fn is_same_referrent(&self, other: &FunctionNode) -> bool {
        self.display_name() == other.display_name()
    }

    pub fn reset_sort_state(&mut self) {
        self.visit_index = 0;
        self.lowlink = 0;
        self.on_stack = false;
    }
}

/// Resolve the name-keyed outgoing edges of `nodes` into index lists.
/// Edges pointing outside the slice are ignored.
pub fn outgoing_adjacency(nodes: &[FunctionNode]) -> Vec<Vec<usize>> {
    let index_of: std::collections::HashMap<String, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.display_name(), i))
        .collect();
    nodes
        .iter()
        .map(|n| {
            n.outgoing
                .iter()
                .filter_map(|name| index_of.get(name).copied())
                .collect()
        })
        .collect()
}

/// The minimal fields needed to reconstruct a node. Edges, recency and
/// highlight state are never persisted; they are recomputed on load by
/// re-running the connection step in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedFunction {
    pub path: Vec<SymbolInfo>,
    pub content: String,
    pub call_site_name: String,
}

impl PersistedFunction {
    pub fn from_node(node: &FunctionNode) -> Self {
        Self {
            path: node.path.clone(),
            content: node.content.clone(),
            call_site_name: node.call_site_name.clone(),
        }
    }

    pub fn into_node(self) -> FunctionNode {
        FunctionNode::new(self.path, self.content, self.call_site_name)
    }
}
