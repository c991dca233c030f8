// Back-track: depth-first from every start position, rolling one mutable
// k-mer down every outgoing path until it completes. No per-location
// memo, so the same pair can be emitted many times; the sort+unique in
// the trie data build collapses them.

use crate::kmer::{Kmer, KmerSettings};
use crate::trie_data::KmerCodec;
use common::VectorPairs;
use gfa_graph::{Graph, LetterLoc, LetterLocData, NodePos};

pub struct TrieBuilderBt<'a> {
    graph: &'a Graph,
    lloc: &'a LetterLocData,
    settings: &'a KmerSettings,
    codec: KmerCodec,
}

impl<'a> TrieBuilderBt<'a> {
    pub fn new(
        graph: &'a Graph,
        lloc: &'a LetterLocData,
        settings: &'a KmerSettings,
        codec: KmerCodec,
    ) -> Self {
        TrieBuilderBt {
            graph,
            lloc,
            settings,
            codec,
        }
    }

    /// Append pairs for every k-mer window starting at one of `starts`.
    pub fn compute_pairs(
        &self,
        starts: impl IntoIterator<Item = NodePos>,
        pairs: &mut VectorPairs<u32, LetterLoc>,
    ) {
        let mut kmer = Kmer::empty(self.settings);
        for np in starts {
            debug_assert!(kmer.is_empty(self.settings));
            self.back_track(np, &mut kmer, pairs);
        }
    }

    fn back_track(&self, np: NodePos, kmer: &mut Kmer, pairs: &mut VectorPairs<u32, LetterLoc>) {
        let s = self.settings;
        if kmer.is_complete(s) {
            pairs.push(self.codec.to_int(*kmer, s), self.lloc.compress(np));
            return;
        }

        let seg = &self.graph.node(np.node).seg;
        kmer.push(seg.get(np.pos as usize), s);
        if np.pos as usize + 1 == seg.len() {
            let mut any = false;
            for t in self.graph.forward_from(np.node) {
                any = true;
                self.back_track(NodePos::new(t.node_id, 0), kmer, pairs);
            }
            if !any && kmer.is_complete(s) && !self.graph.settings.add_extends {
                // matched through the very last letter of the graph; with
                // extend sinks the window would carry a synthetic letter,
                // so it is only recorded on undecorated graphs
                pairs.push(self.codec.to_int(*kmer, s), self.lloc.num_locations);
            }
        } else {
            self.back_track(NodePos::new(np.node, np.pos + 1), kmer, pairs);
        }
        kmer.pop(s);
    }
}
