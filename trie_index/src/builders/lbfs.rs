// Location BFS: the live partial k-mers of every letter location. Each
// processed location extends its fresh k-mers by its letter and pushes
// them to the successor locations; completed k-mers are collected at the
// end. K-mers matching past the final letter of a dead-end node land on
// the pseudo location one past the last letter of the graph.

use crate::builders::KmerLists;
use crate::error::BuildError;
use crate::kmer::{Kmer, KmerSettings};
use crate::trie_data::KmerCodec;
use common::VectorPairs;
use gfa_graph::connected::ConnectedComponents;
use gfa_graph::{Graph, LetterLoc, LetterLocData, NodePos};
use log::debug;
use smallvec::SmallVec;
use std::collections::VecDeque;

pub struct LbfsSettings {
    /// Per-location count at which membership checks switch from a linear
    /// scan to a hash set.
    pub set_cutoff: u32,
}

impl Default for LbfsSettings {
    fn default() -> Self {
        LbfsSettings { set_cutoff: 500 }
    }
}

pub struct TrieBuilderLbfs<'a> {
    graph: &'a Graph,
    lloc: &'a LetterLocData,
    settings: &'a KmerSettings,
    codec: KmerCodec,
    cfg: LbfsSettings,
}

impl<'a> TrieBuilderLbfs<'a> {
    pub fn new(
        graph: &'a Graph,
        lloc: &'a LetterLocData,
        settings: &'a KmerSettings,
        codec: KmerCodec,
    ) -> Self {
        TrieBuilderLbfs {
            graph,
            lloc,
            settings,
            codec,
            cfg: LbfsSettings::default(),
        }
    }

    pub fn with_settings(mut self, cfg: LbfsSettings) -> Self {
        self.cfg = cfg;
        self
    }

    /// Walk the whole graph and append the pair set.
    pub fn compute_pairs(&self, pairs: &mut VectorPairs<u32, LetterLoc>) -> Result<(), BuildError> {
        let s = self.settings;
        let num = self.lloc.num_locations;
        // one extra slot for k-mers that match to the end of the graph
        let mut kb = KmerLists::new(num as usize + 1, self.cfg.set_cutoff);
        let mut queue: VecDeque<LetterLoc> = VecDeque::new();

        let starts = ConnectedComponents::new(self.graph).starting_points(self.graph);
        debug!("lbfs: {} starting points", starts.len());
        for node in starts {
            let loc = self.lloc.compress(NodePos::new(node, 0));
            kb.add(loc as usize, Kmer::empty(s));
            queue.push_back(loc);
        }

        while let Some(loc) = queue.pop_front() {
            if loc == num {
                // the pseudo location has no letter and no successors
                kb.done[loc as usize] = kb.num(loc as usize) as u32;
                continue;
            }
            let np = self.lloc.expand(loc);
            let seg = &self.graph.node(np.node).seg;
            let letter = seg.get(np.pos as usize);

            let mut targets: SmallVec<[LetterLoc; 4]> = SmallVec::new();
            if np.pos as usize + 1 == seg.len() {
                for t in self.graph.forward_from(np.node) {
                    targets.push(self.lloc.compress(NodePos::new(t.node_id, 0)));
                }
                if targets.is_empty() && !self.graph.settings.add_extends {
                    // collect windows matching to the very end of the graph
                    targets.push(num);
                }
            } else {
                targets.push(loc + 1);
            }

            loop {
                let idx = kb.done[loc as usize] as usize;
                if idx >= kb.num(loc as usize) {
                    break;
                }
                kb.done[loc as usize] += 1;
                let mut kmer = kb.get(loc as usize, idx);
                kmer.push(letter, s);
                for &t in &targets {
                    if kb.exists(t as usize, kmer) {
                        continue;
                    }
                    let t_done = kb.done[t as usize] as usize;
                    let nk = kb.add(t as usize, kmer);
                    if nk > u32::MAX as usize {
                        return Err(BuildError::TooManyKmers(t));
                    }
                    // enqueue the target only if it was fully drained
                    if t_done + 1 == nk {
                        queue.push_back(t);
                    }
                }
            }
        }

        let total: usize = (0..=num).map(|loc| kb.num(loc as usize)).sum();
        pairs.reserve(total);
        for loc in 0..=num {
            for idx in 0..kb.num(loc as usize) {
                let kmer = kb.get(loc as usize, idx);
                if kmer.is_complete(s) {
                    pairs.push(self.codec.to_int(kmer, s), loc);
                }
            }
        }
        Ok(())
    }
}
