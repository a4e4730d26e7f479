//! Strongly Connected Components
//!
//! Tarjan's algorithm over the tracked-function graph, used to detect
//! recursion cycles. The DFS runs on an explicit frame stack, so graph size
//! is bounded by memory rather than native call-stack depth.

use crate::domain::list::SingleList;
use crate::domain::node::{outgoing_adjacency, FunctionNode};

/// The component decomposition of one run. Component members are indices
/// into the node slice the run was given, in pop order (the component's
/// root last).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SccPartition {
    pub components: Vec<Vec<usize>>,
}

impl SccPartition {
    /// Components with more than one member: actual recursion cycles.
    /// Self-loops stay singletons and are not flagged.
    pub fn cycles(&self) -> impl Iterator<Item = &Vec<usize>> {
        self.components.iter().filter(|c| c.len() > 1)
    }
}

/// Tarjan SCC context. Holds no state between runs.
pub struct TarjanScc {
    // Nodes are pushed here in visit order and popped when their component
    // closes; a node's `on_stack` flag mirrors its membership.
    visit_stack: SingleList<usize>,
    visit_index: usize,
}

impl TarjanScc {
    pub fn new() -> Self {
        Self {
            visit_stack: SingleList::new(),
            visit_index: 0,
        }
    }

    /// Decompose `nodes` into strongly connected components.
    ///
    /// Afterwards two nodes carry the same `lowlink` iff they are mutually
    /// reachable. Disconnected nodes and self-loops each form singleton
    /// components. Which member becomes a component's representative
    /// depends on visiting order; the partition itself does not.
    pub fn run(&mut self, nodes: &mut [FunctionNode]) -> SccPartition {
        for node in nodes.iter_mut() {
            node.reset_sort_state();
        }
        self.visit_index = 0;

        let adjacency = outgoing_adjacency(nodes);
        let mut components = Vec::new();

        for start in 0..nodes.len() {
            if nodes[start].visit_index == 0 {
                self.strong_connect(start, nodes, &adjacency, &mut components);
            }
        }

        // Every entry pushed during the search must have been popped into
        // exactly one component.
        debug_assert!(
            self.visit_stack.is_empty(),
            "Tarjan visit stack not drained: edge bookkeeping defect"
        );

        SccPartition { components }
    }

    fn enter(&mut self, v: usize, nodes: &mut [FunctionNode]) {
        self.visit_index += 1;
        nodes[v].visit_index = self.visit_index;
        nodes[v].lowlink = self.visit_index;
        nodes[v].on_stack = true;
        self.visit_stack.push_front(v);
    }

    fn strong_connect(
        &mut self,
        root: usize,
        nodes: &mut [FunctionNode],
        adjacency: &[Vec<usize>],
        components: &mut Vec<Vec<usize>>,
    ) {
        self.enter(root, nodes);
        let mut frames: Vec<(usize, usize)> = vec![(root, 0)];

        while let Some(&mut (v, ref mut cursor)) = frames.last_mut() {
            if let Some(&w) = adjacency[v].get(*cursor) {
                *cursor += 1;
                if nodes[w].visit_index == 0 {
                    self.enter(w, nodes);
                    frames.push((w, 0));
                } else if nodes[w].on_stack {
                    // Back or cross edge into a component still being
                    // built. A neighbor already closed into a finished
                    // component must not affect this lowlink.
                    if nodes[v].lowlink > nodes[w].visit_index {
                        nodes[v].lowlink = nodes[w].visit_index;
                    }
                }
            } else {
                frames.pop();
                if nodes[v].lowlink == nodes[v].visit_index {
                    components.push(self.close_component(v, nodes));
                }
                if let Some(&(parent, _)) = frames.last() {
                    if nodes[parent].lowlink > nodes[v].lowlink {
                        nodes[parent].lowlink = nodes[v].lowlink;
                    }
                }
            }
        }
    }

    /// Pop the visit stack down to and including `root`; everything popped
    /// is the root's component. A lone pop means a trivial singleton.
    fn close_component(&mut self, root: usize, nodes: &mut [FunctionNode]) -> Vec<usize> {
        let mut members = Vec::new();
        while let Some(w) = self.visit_stack.pop_front() {
            nodes[w].on_stack = false;
            members.push(w);
            if w == root {
                break;
            }
        }

        // Textbook lowlinks can diverge inside one component when a cross
        // edge lands on a non-root member; pin every member to the root's
        // visit index so equal lowlink remains the membership test.
        let root_index = nodes[root].visit_index;
        for &w in &members {
            nodes[w].lowlink = root_index;
        }

        members
    }
}

impl Default for TarjanScc {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::symbol::{Position, SourceLocation, SourceRange, SymbolInfo, SymbolKind};
    use std::collections::BTreeSet;

    fn node(name: &str) -> FunctionNode {
        let location = SourceLocation {
            file: "lib.rs".into(),
            range: SourceRange::new(Position::new(0, 0), Position::new(0, 0)),
        };
        FunctionNode::new(
            vec![SymbolInfo::new(name, SymbolKind::Function, location)],
            String::new(),
            name.to_string(),
        )
    }

    fn graph(names: &[&str], edges: &[(usize, usize)]) -> Vec<FunctionNode> {
        let mut nodes: Vec<FunctionNode> = names.iter().map(|n| node(n)).collect();
        for &(from, to) in edges {
            let to_name = nodes[to].display_name();
            let from_name = nodes[from].display_name();
            nodes[from].outgoing.push(to_name);
            nodes[to].incoming.push(from_name);
        }
        nodes
    }

    fn component_sets(partition: &SccPartition) -> BTreeSet<BTreeSet<usize>> {
        partition
            .components
            .iter()
            .map(|c| c.iter().copied().collect())
            .collect()
    }

    #[test]
    fn test_chain_yields_singletons() {
        let mut nodes = graph(&["a", "b", "c"], &[(0, 1), (1, 2)]);
        let partition = TarjanScc::new().run(&mut nodes);

        assert_eq!(partition.components.len(), 3);
        let lowlinks: BTreeSet<usize> = nodes.iter().map(|n| n.lowlink).collect();
        assert_eq!(lowlinks.len(), 3, "singleton nodes get unique lowlinks");
    }

    #[test]
    fn test_cycle_is_one_component() {
        let mut nodes = graph(&["a", "b", "c"], &[(0, 1), (1, 2), (2, 0)]);
        let partition = TarjanScc::new().run(&mut nodes);

        assert_eq!(partition.components.len(), 1);
        assert_eq!(partition.components[0].len(), 3);
        assert_eq!(nodes[0].lowlink, nodes[1].lowlink);
        assert_eq!(nodes[1].lowlink, nodes[2].lowlink);
    }

    #[test]
    fn test_mutual_pair_with_external_caller() {
        let mut nodes = graph(&["a", "b", "c"], &[(0, 1), (1, 0), (2, 0)]);
        let partition = TarjanScc::new().run(&mut nodes);

        let sets = component_sets(&partition);
        assert!(sets.contains(&BTreeSet::from([0, 1])));
        assert!(sets.contains(&BTreeSet::from([2])));
        assert_eq!(nodes[0].lowlink, nodes[1].lowlink);
        assert_ne!(nodes[2].lowlink, nodes[0].lowlink);
    }

    #[test]
    fn test_cross_edge_member_shares_lowlink() {
        // 0 -> 1 -> 2 -> 0 with 0 -> 3 -> 1: one component of four where a
        // naive reading of Tarjan leaves node 3 with a diverging lowlink.
        let mut nodes = graph(
            &["a", "b", "c", "d"],
            &[(0, 1), (1, 2), (2, 0), (0, 3), (3, 1)],
        );
        let partition = TarjanScc::new().run(&mut nodes);

        assert_eq!(partition.components.len(), 1);
        assert_eq!(partition.components[0].len(), 4);
        let lowlinks: BTreeSet<usize> = nodes.iter().map(|n| n.lowlink).collect();
        assert_eq!(lowlinks.len(), 1);
    }

    #[test]
    fn test_self_loop_is_singleton() {
        let mut nodes = graph(&["a"], &[(0, 0)]);
        let partition = TarjanScc::new().run(&mut nodes);

        assert_eq!(partition.components, vec![vec![0]]);
        assert_eq!(partition.cycles().count(), 0);
    }

    #[test]
    fn test_disconnected_nodes() {
        let mut nodes = graph(&["a", "b", "c"], &[]);
        let partition = TarjanScc::new().run(&mut nodes);
        assert_eq!(partition.components.len(), 3);
    }

    #[test]
    fn test_visit_stack_drains_and_context_is_reusable() {
        let mut ctx = TarjanScc::new();
        let mut nodes = graph(&["a", "b", "c", "d"], &[(0, 1), (1, 0), (2, 3)]);

        let first = ctx.run(&mut nodes);
        assert!(ctx.visit_stack.is_empty());

        let second = ctx.run(&mut nodes);
        assert!(ctx.visit_stack.is_empty());
        assert_eq!(component_sets(&first), component_sets(&second));
    }

    #[test]
    fn test_cycles_iterator_skips_singletons() {
        let mut nodes = graph(&["a", "b", "c"], &[(0, 1), (1, 0)]);
        let partition = TarjanScc::new().run(&mut nodes);
        let cycles: Vec<_> = partition.cycles().collect();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].len(), 2);
    }
}
