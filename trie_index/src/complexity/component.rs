// A complexity component: the maximal region of short nodes (length < K)
// reachable from a seed by walking edges in both directions, together
// with the long nodes feeding it (incoming) and fed by it (outgoing).

use gfa_graph::{Graph, NodeId};
use std::collections::HashSet;

#[derive(Debug)]
pub struct ComplexityComponent {
    pub incoming: Vec<NodeId>,
    pub outgoing: Vec<NodeId>,
    pub internal: Vec<NodeId>,
}

impl ComplexityComponent {
    pub fn build(graph: &Graph, seed: NodeId, trie_depth: u32) -> ComplexityComponent {
        let is_short =
            |node: NodeId| (graph.node(node).seg.len() as u32) < trie_depth;
        debug_assert!(is_short(seed));

        let mut incoming = Vec::new();
        let mut outgoing = Vec::new();
        let mut q = vec![seed];
        let mut in_q: HashSet<NodeId> = HashSet::from([seed]);

        let mut qp = 0;
        while qp < q.len() {
            let crnt = q[qp];
            qp += 1;
            for t in graph.forward_from(crnt) {
                if is_short(t.node_id) {
                    if in_q.insert(t.node_id) {
                        q.push(t.node_id);
                    }
                } else {
                    outgoing.push(t.node_id);
                }
            }
            for t in graph.backward_from(crnt) {
                if is_short(t.node_id) {
                    if in_q.insert(t.node_id) {
                        q.push(t.node_id);
                    }
                } else {
                    incoming.push(t.node_id);
                }
            }
        }

        incoming.sort_unstable();
        incoming.dedup();
        outgoing.sort_unstable();
        outgoing.dedup();

        ComplexityComponent {
            incoming,
            outgoing,
            internal: q,
        }
    }
}
