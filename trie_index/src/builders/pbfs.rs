// Point BFS: an independent depth-bounded BFS per start position, with
// the partial k-mer as state. With a cut-early threshold set, a frontier
// that grows past the threshold is recorded as-is (inner k-mers keyed
// into the trie) and its positions are rescheduled as fresh starts.
// That is what makes this the hotspot algorithm: fan-out inside a
// complexity component is paid for once, not once per upstream window.

use crate::kmer::{Kmer, KmerSettings};
use crate::trie_data::KmerCodec;
use common::VectorPairs;
use gfa_graph::{Graph, LetterLoc, LetterLocData, NodePos};
use log::debug;
use std::collections::{HashSet, VecDeque};

#[derive(Default)]
pub struct PbfsSettings {
    /// Abandon a start once a frontier reaches this many states.
    pub cut_early_threshold: Option<u32>,
}

pub struct TrieBuilderPbfs<'a> {
    graph: &'a Graph,
    lloc: &'a LetterLocData,
    settings: &'a KmerSettings,
    codec: KmerCodec,
    cfg: PbfsSettings,
}

impl<'a> TrieBuilderPbfs<'a> {
    pub fn new(
        graph: &'a Graph,
        lloc: &'a LetterLocData,
        settings: &'a KmerSettings,
        codec: KmerCodec,
    ) -> Self {
        TrieBuilderPbfs {
            graph,
            lloc,
            settings,
            codec,
            cfg: PbfsSettings::default(),
        }
    }

    pub fn with_settings(mut self, cfg: PbfsSettings) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn compute_pairs(
        &self,
        starts: impl IntoIterator<Item = NodePos>,
        pairs: &mut VectorPairs<u32, LetterLoc>,
    ) {
        let s = self.settings;
        let num = self.lloc.num_locations;
        let mut queue: VecDeque<LetterLoc> = VecDeque::new();
        let mut scheduled: HashSet<LetterLoc> = HashSet::new();
        for np in starts {
            let loc = self.lloc.compress(np);
            if scheduled.insert(loc) {
                queue.push_back(loc);
            }
        }

        let mut cuts = 0u32;
        while let Some(start) = queue.pop_front() {
            let mut frontier: Vec<(Kmer, LetterLoc)> = vec![(Kmer::empty(s), start)];
            for _depth in 0..=s.k {
                let mut next: Vec<(Kmer, LetterLoc)> = Vec::new();
                for &(kmer, loc) in &frontier {
                    if kmer.is_complete(s) {
                        pairs.push(self.codec.to_int(kmer, s), loc);
                        continue;
                    }
                    if loc == num {
                        // incomplete at the end of the graph, dead branch
                        continue;
                    }
                    let np = self.lloc.expand(loc);
                    let seg = &self.graph.node(np.node).seg;
                    let mut nkmer = kmer;
                    nkmer.push(seg.get(np.pos as usize), s);
                    if np.pos as usize + 1 == seg.len() {
                        let mut any = false;
                        for t in self.graph.forward_from(np.node) {
                            any = true;
                            next.push((
                                nkmer,
                                self.lloc.compress(NodePos::new(t.node_id, 0)),
                            ));
                        }
                        if !any && nkmer.is_complete(s) && !self.graph.settings.add_extends {
                            next.push((nkmer, num));
                        }
                    } else {
                        next.push((nkmer, loc + 1));
                    }
                }
                if next.is_empty() {
                    break;
                }
                next.sort_unstable();
                next.dedup();

                if let Some(threshold) = self.cfg.cut_early_threshold {
                    if next.len() >= threshold as usize {
                        // record the frontier as inner k-mers and hand the
                        // positions back as fresh starts
                        cuts += 1;
                        for &(kmer, loc) in &next {
                            pairs.push(self.codec.to_int(kmer, s), loc);
                            if loc < num && scheduled.insert(loc) {
                                queue.push_back(loc);
                            }
                        }
                        break;
                    }
                }
                frontier = next;
            }
        }
        if cuts > 0 {
            debug!("pbfs: cut early {} times", cuts);
        }
    }
}
