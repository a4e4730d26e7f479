//! Tracked-Function Registry
//!
//! The mutable call graph: nodes are added one at a time as the user tracks
//! functions, edges are recomputed heuristically against the current
//! registry, and the whole set is persisted after every mutation. All
//! operations run to completion on the caller's thread; there is never more
//! than one in-flight mutation.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::domain::node::{FunctionNode, PersistedFunction};
use crate::domain::scc::{SccPartition, TarjanScc};
use crate::domain::store::StateStore;
use crate::domain::toposort::{PostOrderSort, SortOrder};

/// Direction of a resolved edge, relative to the candidate node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeDirection {
    /// The existing node's body mentions the candidate: existing → candidate.
    ExistingCallsCandidate,
    /// The candidate's body mentions the existing node: candidate → existing.
    CandidateCallsExisting,
}

/// One edge found between the candidate and a node already in the registry.
/// A mutually recursive pair yields one edge in each direction.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedEdge {
    /// Index of the partner node in the existing slice.
    pub existing: usize,
    pub direction: EdgeDirection,
}

/// Call detection, isolated from the graph engine so a symbol-resolving
/// implementation could replace the substring heuristic without touching
/// the registry.
pub trait CallEdgeResolver {
    fn resolve(&self, candidate: &FunctionNode, existing: &[FunctionNode]) -> Vec<ResolvedEdge>;
}

/// Registry mutation notifications, fired after the mutation completes so a
/// view can re-render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    Added,
    Removed,
    Cleared,
}

/// The registry of tracked functions, in insertion order. Owns node
/// lifetime; everything else holds display names, not references.
pub struct FunctionTracker {
    nodes: Vec<FunctionNode>,
    store: Box<dyn StateStore>,
    listeners: Vec<Box<dyn Fn(ChangeEvent)>>,
}

impl FunctionTracker {
    pub fn new(store: Box<dyn StateStore>) -> Self {
        Self {
            nodes: Vec::new(),
            store,
            listeners: Vec::new(),
        }
    }

    /// Rebuild a registry from the persisted snapshot. Edges are
    /// recomputed by re-running the connection step per node in the
    /// original insertion order; a load failure starts an empty registry.
    pub fn restore(store: Box<dyn StateStore>, resolver: &dyn CallEdgeResolver) -> Self {
        let persisted = match store.load() {
            Ok(records) => records,
            Err(err) => {
                warn!("failed to load tracked functions, starting empty: {err}");
                Vec::new()
            }
        };

        let mut tracker = Self::new(store);
        for record in persisted {
            let mut node = record.into_node();
            tracker.connect(&mut node, resolver);
            tracker.nodes.push(node);
            tracker.propagate_recency(tracker.nodes.len() - 1);
        }
        tracker
    }

    pub fn subscribe(&mut self, listener: impl Fn(ChangeEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn nodes(&self) -> &[FunctionNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn find(&self, display_name: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.display_name() == display_name)
    }

    /// Track a function. If a node with the same display name exists it is
    /// deleted first (replace, not merge). Edges are computed against the
    /// registry as it stands, recency is propagated to the new node's
    /// callers, and only the new node keeps the highlight.
    pub fn add(&mut self, mut node: FunctionNode, resolver: &dyn CallEdgeResolver) {
        let name = node.display_name();
        if self.find(&name).is_some() {
            self.remove(&name);
        }

        for existing in &mut self.nodes {
            existing.highlight = false;
        }
        node.highlight = true;

        self.connect(&mut node, resolver);
        self.nodes.push(node);
        self.propagate_recency(self.nodes.len() - 1);

        self.persist();
        self.notify(ChangeEvent::Added);
    }

    /// Stop tracking by display name. Scrubs the departed node out of every
    /// remaining adjacency list. No-op (returns false) when absent.
    pub fn remove(&mut self, display_name: &str) -> bool {
        let Some(index) = self.find(display_name) else {
            return false;
        };

        self.nodes.remove(index);
        for node in &mut self.nodes {
            node.outgoing.retain(|name| name != display_name);
            node.incoming.retain(|name| name != display_name);
        }

        self.persist();
        self.notify(ChangeEvent::Removed);
        true
    }

    /// Stop tracking the most recently added function. No-op when empty.
    pub fn remove_last(&mut self) -> bool {
        let Some(last) = self.nodes.last() else {
            return false;
        };
        let name = last.display_name();
        self.remove(&name)
    }

    /// Forget everything, including the persisted snapshot. A failure to
    /// clear persisted state is logged, not fatal; memory state stays
    /// correct.
    pub fn clear(&mut self) {
        self.nodes.clear();
        if let Err(err) = self.store.clear() {
            warn!("failed to clear persisted state: {err}");
        }
        self.notify(ChangeEvent::Cleared);
    }

    /// Root functions: nodes with no tracked caller, most recently touched
    /// call hierarchy first. When every node sits in one cycle this comes
    /// back empty; cycle-tolerant callers fall back to
    /// [`crate::domain::toposort::roots_from_sequence`].
    pub fn roots(&mut self) -> Vec<usize> {
        if self.nodes.is_empty() {
            return Vec::new();
        }

        let order = PostOrderSort::new().run(&mut self.nodes);
        let mut roots: Vec<usize> = order
            .sequence()
            .iter()
            .copied()
            .filter(|&i| self.nodes[i].incoming.is_empty())
            .collect();

        roots.sort_by(|&a, &b| {
            self.nodes[b]
                .last_update_time_of_children
                .cmp(&self.nodes[a].last_update_time_of_children)
        });
        roots
    }

    /// The materialized caller-first ordering of the whole registry.
    pub fn sorted(&mut self) -> SortOrder {
        PostOrderSort::new().run(&mut self.nodes)
    }

    /// Strongly-connected-component decomposition of the registry, for
    /// recursion detection.
    pub fn recursion_groups(&mut self) -> SccPartition {
        TarjanScc::new().run(&mut self.nodes)
    }

    /// Apply the resolver's verdicts symmetrically between the candidate
    /// and the registry.
    fn connect(&mut self, node: &mut FunctionNode, resolver: &dyn CallEdgeResolver) {
        let name = node.display_name();
        for edge in resolver.resolve(node, &self.nodes) {
            let existing_name = self.nodes[edge.existing].display_name();
            match edge.direction {
                EdgeDirection::ExistingCallsCandidate => {
                    self.nodes[edge.existing].outgoing.push(name.clone());
                    node.incoming.push(existing_name);
                }
                EdgeDirection::CandidateCallsExisting => {
                    node.outgoing.push(existing_name);
                    self.nodes[edge.existing].incoming.push(name.clone());
                }
            }
        }
    }

    /// Walk backward from `start` through incoming edges, raising each
    /// caller's subtree-recency to the newest value seen. The visited set
    /// guards against cycles; each node is expanded once.
    fn propagate_recency(&mut self, start: usize) {
        let index_of: HashMap<String, usize> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.display_name(), i))
            .collect();

        let mut visited = HashSet::new();
        visited.insert(start);
        let mut work = vec![start];

        while let Some(v) = work.pop() {
            let stamp = self.nodes[v].last_update_time_of_children;
            let callers: Vec<usize> = self.nodes[v]
                .incoming
                .iter()
                .filter_map(|name| index_of.get(name).copied())
                .collect();
            for caller in callers {
                if visited.insert(caller) {
                    if self.nodes[caller].last_update_time_of_children < stamp {
                        self.nodes[caller].last_update_time_of_children = stamp;
                    }
                    work.push(caller);
                }
            }
        }
    }

    /// Persist the minimal reconstruction records. Failures are logged and
    /// swallowed; only durability is lost.
    fn persist(&self) {
        let snapshot: Vec<PersistedFunction> =
            self.nodes.iter().map(PersistedFunction::from_node).collect();
        if let Err(err) = self.store.save(&snapshot) {
            warn!("failed to persist tracked functions: {err}");
        }
    }

    fn notify(&self, event: ChangeEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }
}
