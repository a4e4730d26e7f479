//! Indented Outline Renderer
//!
//! One line per tracked function in the materialized caller-first order;
//! a function is indented one level deeper than the nearest preceding
//! caller.

use crate::domain::node::outgoing_adjacency;
use crate::domain::tracker::FunctionTracker;

pub fn render_outline(tracker: &mut FunctionTracker) -> String {
    let order = tracker.sorted();
    let sequence = order.sequence();
    let nodes = tracker.nodes();
    let adjacency = outgoing_adjacency(nodes);

    let mut indent = vec![0usize; sequence.len()];
    let mut out = String::new();

    for i in 0..sequence.len() {
        // The nearest preceding caller in the sequence decides the indent;
        // a function nobody earlier calls starts a new hierarchy at the
        // left margin.
        for j in (0..i).rev() {
            if adjacency[sequence[j]].contains(&sequence[i]) {
                indent[i] = indent[j] + 1;
                break;
            }
        }

        out.push_str(&" ".repeat(indent[i]));
        out.push_str(nodes[sequence[i]].short_name());
        out.push('\n');
    }

    out
}
