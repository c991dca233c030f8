// Per-node upper bounds on k-mer fan-out. starts[n] bounds the number of
// distinct depth-K k-mers anchored at the first letter of node n; ends[n]
// bounds the k-mers whose final letter is the last letter of n. Both are
// computed by sweeps in topological order; back-edges start out with a
// configured contribution, are re-propagated a bounded number of times,
// and clamp to the hard ceiling sigma^(K-1) if they still have not
// settled.

use gfa_graph::top_order::TopOrder;
use gfa_graph::{Graph, SIGMA};
use log::debug;

pub struct ComplexityEstimator<'a> {
    graph: &'a Graph,
    top_ord: &'a TopOrder,
    trie_depth: u32,
    backedge_init: u32,
    backedge_max_trav: u32,
}

pub struct ComplexityEstimate {
    pub starts: Vec<u32>,
    pub ends: Vec<u32>,
}

impl<'a> ComplexityEstimator<'a> {
    pub fn new(
        graph: &'a Graph,
        top_ord: &'a TopOrder,
        trie_depth: u32,
        backedge_init: u32,
        backedge_max_trav: u32,
    ) -> Self {
        ComplexityEstimator {
            graph,
            top_ord,
            trie_depth,
            backedge_init,
            backedge_max_trav,
        }
    }

    pub fn compute(&self) -> ComplexityEstimate {
        let n = self.graph.num_nodes() as usize;
        let cap = (SIGMA as u64).saturating_pow(self.trie_depth - 1).min(u32::MAX as u64) as u32;
        let order = self.top_ord.ordered_nodes();
        let has_backedges = self
            .graph
            .forward_edges()
            .any(|e| self.top_ord.is_backedge(e.from, e.to));

        let mut starts = vec![0u32; n];
        let mut ends = vec![0u32; n];

        let sweep = |starts: &mut Vec<u32>, ends: &mut Vec<u32>, be: &dyn Fn(u32) -> u32| {
            for &nd in &order {
                let mut sum: u64 = 0;
                for t in self.graph.backward_from(nd) {
                    let m = t.node_id;
                    let contrib = if self.top_ord.is_backedge(m, nd) {
                        be(m)
                    } else {
                        ends[m as usize]
                    };
                    sum += contrib as u64;
                }
                starts[nd as usize] = sum.max(1).min(u32::MAX as u64) as u32;
                ends[nd as usize] =
                    if self.graph.node(nd).seg.len() as u32 >= self.trie_depth {
                        1
                    } else {
                        starts[nd as usize].min(cap)
                    };
            }
        };

        let init = self.backedge_init;
        sweep(&mut starts, &mut ends, &|_| init);

        if has_backedges {
            let mut before = ends.clone();
            for _ in 0..self.backedge_max_trav {
                let input = ends.clone();
                sweep(&mut starts, &mut ends, &|m| input[m as usize]);
                before = input;
            }
            // sources that kept moving get clamped to the ceiling
            let final_in = ends.clone();
            sweep(&mut starts, &mut ends, &|m| {
                if final_in[m as usize] != before[m as usize] {
                    cap
                } else {
                    final_in[m as usize]
                }
            });
            debug!("complexity estimate converged with back-edge clamping");
        }

        ComplexityEstimate { starts, ends }
    }
}
