//! Topological / Post-Order Sort
//!
//! Post-order DFS over the tracked-function graph. The materialized
//! sequence puts callers before their callees (a topological order when the
//! graph is acyclic) and drives outline rendering and cycle-aware root
//! selection. Like the SCC pass, the DFS runs on explicit frames.

use crate::domain::list::SingleList;
use crate::domain::node::{outgoing_adjacency, FunctionNode};

/// The ordering produced by one sort run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    sequence: Vec<usize>,
}

impl SortOrder {
    /// Materialized stack order: callers before callees on acyclic graphs.
    /// The first element is always a root of its DFS tree.
    pub fn sequence(&self) -> &[usize] {
        &self.sequence
    }

    /// Push-chronological post-order: callees before callers on acyclic
    /// graphs.
    pub fn post_order(&self) -> Vec<usize> {
        self.sequence.iter().rev().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// Post-order DFS context. Holds no state between runs.
pub struct PostOrderSort {
    visit_stack: SingleList<usize>,
}

impl PostOrderSort {
    pub fn new() -> Self {
        Self {
            visit_stack: SingleList::new(),
        }
    }

    /// Sort `nodes`. Scratch state is reset for the whole slice first; the
    /// visit index only distinguishes visited from unvisited here.
    pub fn run(&mut self, nodes: &mut [FunctionNode]) -> SortOrder {
        for node in nodes.iter_mut() {
            node.reset_sort_state();
        }

        let adjacency = outgoing_adjacency(nodes);
        for start in 0..nodes.len() {
            if nodes[start].visit_index == 0 {
                self.dfs(start, nodes, &adjacency);
            }
        }

        SortOrder {
            sequence: self.visit_stack.drain_to_vec(),
        }
    }

    fn dfs(&mut self, root: usize, nodes: &mut [FunctionNode], adjacency: &[Vec<usize>]) {
        // Visited is marked on frame entry, not on exit. That stops the
        // walk on cycles, but a cycle member can reach the output stack
        // before its mutual caller; accepted at this graph's scale.
        nodes[root].visit_index = 1;
        let mut frames: Vec<(usize, usize)> = vec![(root, 0)];

        while let Some(&mut (v, ref mut cursor)) = frames.last_mut() {
            if let Some(&w) = adjacency[v].get(*cursor) {
                *cursor += 1;
                if nodes[w].visit_index == 0 {
                    nodes[w].visit_index = 1;
                    frames.push((w, 0));
                }
            } else {
                // All neighbors done: classic post-order push.
                frames.pop();
                self.visit_stack.push_front(v);
            }
        }
    }
}

impl Default for PostOrderSort {
    fn default() -> Self {
        Self::new()
    }
}

/// Root selection that tolerates cycles, for graphs where the plain
/// "no incoming edges" test comes back empty.
///
/// A node is a root when no node earlier in the materialized sequence has
/// an outgoing edge to it; the first node is unconditionally a root. The
/// scan is O(n² · avg-degree), fine for the tens-of-nodes registries this
/// operates on, and tie-breaks by sequence position.
pub fn roots_from_sequence(nodes: &[FunctionNode], sequence: &[usize]) -> Vec<usize> {
    if sequence.is_empty() {
        return Vec::new();
    }

    let adjacency = outgoing_adjacency(nodes);
    let mut roots = vec![sequence[0]];

    for i in 1..sequence.len() {
        let candidate = sequence[i];
        let called_earlier = sequence[..i]
            .iter()
            .any(|&earlier| adjacency[earlier].contains(&candidate));
        if !called_earlier {
            roots.push(candidate);
        }
    }

    roots
}
