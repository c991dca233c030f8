// The facade: one owner for the graph, the letter-location table and the
// trie data, plus the traversal surface over handles. Iterators borrow
// this owner and never outlive it.

use crate::edge_iter::EditEdgeIter;
use crate::handle::Handle;
use crate::kmer::{Kmer, KmerSettings};
use crate::prev_iter::PrevHandleIter;
use crate::trie_data::TrieData;
use gfa_graph::{DnaSlice, Graph, LetterLocData};

pub struct TrieGraphData {
    pub graph: Graph,
    pub letter_loc: LetterLocData,
    pub trie_data: TrieData,
}

pub struct TrieGraph {
    pub data: TrieGraphData,
}

impl TrieGraph {
    pub fn new(graph: Graph, letter_loc: LetterLocData, trie_data: TrieData) -> TrieGraph {
        TrieGraph {
            data: TrieGraphData {
                graph,
                letter_loc,
                trie_data,
            },
        }
    }

    pub fn kmer_settings(&self) -> &KmerSettings {
        self.data.trie_data.settings()
    }

    pub fn trie_depth(&self) -> u32 {
        self.kmer_settings().k
    }

    /// The trie root: the empty k-mer.
    pub fn root_handle(&self) -> Handle {
        Handle::Trie(Kmer::empty(self.kmer_settings()))
    }

    /// Lazy edit-edge sequence out of a handle.
    pub fn next_edit_edges(&self, h: Handle) -> EditEdgeIter<'_> {
        EditEdgeIter::make(h, &self.data)
    }

    /// Predecessor positions on the letter ribbon: within the node, or the
    /// last letters of graph predecessors at offset 0.
    pub fn prev_graph_handles(&self, h: Handle) -> PrevHandleIter<'_> {
        PrevHandleIter::make_graph(&self.data.graph, h)
    }

    /// Trie-side predecessors: the parent k-mer, or for a graph handle
    /// every complete k-mer terminating there.
    pub fn prev_trie_handles(&self, h: Handle) -> PrevHandleIter<'_> {
        PrevHandleIter::make_trie(&self.data, h)
    }

    /// Pop one letter of a trie handle.
    pub fn up_trie_handle(&self, h: Handle) -> Handle {
        match h.kmer() {
            Some(mut kmer) => {
                kmer.pop(self.kmer_settings());
                Handle::Trie(kmer)
            }
            None => Handle::Invalid,
        }
    }

    /// The same letter on the reverse-complement twin. Needs the graph to
    /// have been built with twins.
    pub fn reverse(&self, h: Handle) -> Handle {
        if !self.data.graph.settings.add_reverse_complement {
            return Handle::Invalid;
        }
        match h.nodepos() {
            Some(np) => Handle::Graph(np.reverse(&self.data.graph)),
            None => Handle::Invalid,
        }
    }

    /// Longest prefix of `view` matching the node letters from the handle
    /// onward. Zero for anything but a graph handle.
    pub fn next_match_many(&self, h: Handle, view: &DnaSlice) -> u32 {
        match h.nodepos() {
            Some(np) => {
                let seg = &self.data.graph.node(np.node).seg;
                let nview = seg.slice(np.pos as usize, seg.len());
                nview.fast_match(view) as u32
            }
            None => 0,
        }
    }

    /// If the query is short enough and the trie holds it, the matching
    /// trie handle; invalid otherwise.
    pub fn exact_short_match(&self, view: &DnaSlice) -> Handle {
        let s = self.kmer_settings();
        if view.len() as u32 > s.k {
            return Handle::Invalid;
        }
        let kmer = Kmer::from_letters(view.iter(), s);
        if self.data.trie_data.trie_contains(kmer) {
            Handle::Trie(kmer)
        } else {
            Handle::Invalid
        }
    }

    /// (nodes, edge records, letters) of the underlying graph.
    pub fn graph_size(&self) -> (u32, u32, u32) {
        (
            self.data.graph.num_nodes(),
            self.data.graph.num_edges(),
            self.data.letter_loc.num_locations,
        )
    }
}
