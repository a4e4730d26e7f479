//! Heuristic Call Detection
//!
//! Calls are recognized by plain substring containment: if one tracked
//! body mentions another function's call-site name, an edge is recorded.
//! Deliberately imprecise. An identifier inside a comment or string literal
//! counts, and a call through an alias or macro does not, but no parser or
//! symbol resolution is needed at all. Swapping in a real resolver only
//! means replacing this type.

use crate::domain::node::FunctionNode;
use crate::domain::tracker::{CallEdgeResolver, EdgeDirection, ResolvedEdge};

pub struct SubstringEdgeResolver;

impl CallEdgeResolver for SubstringEdgeResolver {
    fn resolve(&self, candidate: &FunctionNode, existing: &[FunctionNode]) -> Vec<ResolvedEdge> {
        let mut edges = Vec::new();

        for (index, node) in existing.iter().enumerate() {
            // Both directions are checked independently; a mutually
            // recursive pair yields one edge each way. An empty name would
            // match every body.
            if !candidate.call_site_name.is_empty()
                && node.content.contains(&candidate.call_site_name)
            {
                edges.push(ResolvedEdge {
                    existing: index,
                    direction: EdgeDirection::ExistingCallsCandidate,
                });
            }

            if !node.call_site_name.is_empty()
                && candidate.content.contains(&node.call_site_name)
            {
                edges.push(ResolvedEdge {
                    existing: index,
                    direction: EdgeDirection::CandidateCallsExisting,
                });
            }
        }

        edges
    }
}
