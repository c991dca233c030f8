// Topological order by iterative DFS. Nodes are numbered at finish time,
// so a larger index means earlier in topological order; on cyclic graphs
// the numbering is still total and back-edges are the ones that do not
// decrease it.

use crate::graph::{Graph, NodeId, INVALID_ID};

#[derive(Debug)]
pub struct TopOrder {
    pub idx: Vec<u32>,
}

impl TopOrder {
    pub fn build(graph: &Graph) -> TopOrder {
        let n = graph.num_nodes() as usize;
        let mut idx = vec![INVALID_ID; n];
        let mut in_stk = vec![false; n];
        let mut next_idx = 0u32;
        // stack of (node, next edge to walk)
        let mut stk: Vec<(NodeId, u32)> = Vec::new();

        let push = |stk: &mut Vec<(NodeId, u32)>, in_stk: &mut Vec<bool>, g: &Graph, node: NodeId| {
            let ei = g
                .forward_from(node)
                .next()
                .map(|t| t.edge_id)
                .unwrap_or(INVALID_ID);
            stk.push((node, ei));
            in_stk[node as usize] = true;
        };

        for start in 0..graph.num_nodes() {
            if in_stk[start as usize] {
                continue;
            }
            push(&mut stk, &mut in_stk, graph, start);
            while let Some((ni, ei)) = stk.pop() {
                if ei == INVALID_ID {
                    idx[ni as usize] = next_idx;
                    next_idx += 1;
                } else {
                    stk.push((ni, graph.next_forward_edge(ei)));
                    let to = graph.edge_target(ei);
                    if !in_stk[to as usize] {
                        push(&mut stk, &mut in_stk, graph, to);
                    }
                }
            }
        }
        TopOrder { idx }
    }

    /// True iff the edge does not strictly decrease the numbering, i.e. it
    /// closes a cycle (self loops included).
    pub fn is_backedge(&self, from: NodeId, to: NodeId) -> bool {
        self.idx[from as usize] <= self.idx[to as usize]
    }

    /// Nodes in topological order, sources first.
    pub fn ordered_nodes(&self) -> Vec<NodeId> {
        let n = self.idx.len();
        let mut res = vec![0u32; n];
        for (i, &ix) in self.idx.iter().enumerate() {
            res[n - 1 - ix as usize] = i as u32;
        }
        res
    }
}
