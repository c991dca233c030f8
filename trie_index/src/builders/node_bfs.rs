// Node BFS: nodes are processed in topological priority order, each one
// rolling a k-mer across its letters. Nodes at least K letters long only
// depend on their entering k-mers for the first K - 1 positions; after
// that the k-mer is determined by the node itself, so the tail is walked
// once. Terminal k-mers are handed to the successors.

use crate::builders::KmerLists;
use crate::kmer::{Kmer, KmerSettings};
use crate::trie_data::KmerCodec;
use common::VectorPairs;
use gfa_graph::connected::ConnectedComponents;
use gfa_graph::dna_string::DnaString;
use gfa_graph::top_order::TopOrder;
use gfa_graph::{Graph, LetterLoc, LetterLocData, NodeId, NodePos};
use std::collections::BinaryHeap;

const SET_CUTOFF: u32 = 500;

pub struct TrieBuilderNbfs<'a> {
    graph: &'a Graph,
    lloc: &'a LetterLocData,
    settings: &'a KmerSettings,
    codec: KmerCodec,
}

impl<'a> TrieBuilderNbfs<'a> {
    pub fn new(
        graph: &'a Graph,
        lloc: &'a LetterLocData,
        settings: &'a KmerSettings,
        codec: KmerCodec,
    ) -> Self {
        TrieBuilderNbfs {
            graph,
            lloc,
            settings,
            codec,
        }
    }

    pub fn compute_pairs(&self, pairs: &mut VectorPairs<u32, LetterLoc>) {
        let s = self.settings;
        let top_ord = TopOrder::build(self.graph);
        let mut kd = KmerLists::new(self.graph.num_nodes() as usize, SET_CUTOFF);
        // max-heap on the topological numbering: higher index pops first,
        // which is earlier in topological order
        let mut queue: BinaryHeap<(u32, NodeId)> = BinaryHeap::new();
        let mut in_q = vec![false; self.graph.num_nodes() as usize];

        let starts = ConnectedComponents::new(self.graph).starting_points(self.graph);
        for node in starts {
            kd.add(node as usize, Kmer::empty(s));
            in_q[node as usize] = true;
            queue.push((top_ord.idx[node as usize], node));
        }

        while let Some((_, nid)) = queue.pop() {
            in_q[nid as usize] = false;
            let seg = &self.graph.node(nid).seg;
            let loc = self.lloc.compress(NodePos::new(nid, 0));

            if seg.len() as u32 >= s.k {
                let mut last: Option<Kmer> = None;
                loop {
                    let idx = kd.done[nid as usize] as usize;
                    if idx >= kd.num(nid as usize) {
                        break;
                    }
                    kd.done[nid as usize] += 1;
                    let mut kmer = kd.get(nid as usize, idx);
                    if kmer.is_complete(s) {
                        pairs.push(self.codec.to_int(kmer, s), loc);
                    }
                    self.walk_node(&mut kmer, seg, loc, 1, s.k, pairs);
                    last = Some(kmer);
                }
                // from position K on, every entering k-mer has rolled into
                // the same node-determined one
                if let Some(mut kmer) = last {
                    self.walk_node(&mut kmer, seg, loc, s.k, seg.len() as u32, pairs);
                    kmer.push(seg.back(), s);
                    self.push_neighbours(kmer, nid, &mut kd, &mut in_q, &mut queue, &top_ord, pairs);
                }
            } else {
                loop {
                    let idx = kd.done[nid as usize] as usize;
                    if idx >= kd.num(nid as usize) {
                        break;
                    }
                    kd.done[nid as usize] += 1;
                    let mut kmer = kd.get(nid as usize, idx);
                    if kmer.is_complete(s) {
                        pairs.push(self.codec.to_int(kmer, s), loc);
                    }
                    self.walk_node(&mut kmer, seg, loc, 1, seg.len() as u32, pairs);
                    kmer.push(seg.back(), s);
                    self.push_neighbours(kmer, nid, &mut kd, &mut in_q, &mut queue, &top_ord, pairs);
                }
            }
        }
    }

    // Push letters start-1 .. end-2, recording each completion at its
    // letter location.
    fn walk_node(
        &self,
        kmer: &mut Kmer,
        seg: &DnaString,
        loc: LetterLoc,
        start: u32,
        end: u32,
        pairs: &mut VectorPairs<u32, LetterLoc>,
    ) {
        let s = self.settings;
        for i in start..end {
            kmer.push(seg.get(i as usize - 1), s);
            if kmer.is_complete(s) {
                pairs.push(self.codec.to_int(*kmer, s), loc + i);
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn push_neighbours(
        &self,
        kmer: Kmer,
        nid: NodeId,
        kd: &mut KmerLists,
        in_q: &mut [bool],
        queue: &mut BinaryHeap<(u32, NodeId)>,
        top_ord: &TopOrder,
        pairs: &mut VectorPairs<u32, LetterLoc>,
    ) {
        let s = self.settings;
        let mut any = false;
        for t in self.graph.forward_from(nid) {
            any = true;
            let to = t.node_id as usize;
            if !kd.exists(to, kmer) {
                kd.add(to, kmer);
                if !in_q[to] {
                    in_q[to] = true;
                    queue.push((top_ord.idx[to], t.node_id));
                }
            }
        }
        if !any && kmer.is_complete(s) && !self.graph.settings.add_extends {
            // matched through the very last letter of the graph; skipped on
            // graphs with extend sinks, same as the back-track builder
            pairs.push(self.codec.to_int(kmer, s), self.lloc.num_locations);
        }
    }
}
