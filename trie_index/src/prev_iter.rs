// Predecessor enumeration. On the letter-location ribbon a graph handle
// steps back within its node or fans out over graph predecessors; on the
// trie side a handle walks to its parent, and a graph handle recovers
// every complete k-mer that terminates at it.

use crate::handle::Handle;
use crate::triegraph::TrieGraphData;
use gfa_graph::graph::Targets;
use gfa_graph::Graph;

pub enum PrevHandleIter<'a> {
    Single(Option<Handle>),
    Split {
        graph: &'a Graph,
        targets: Targets<'a>,
    },
    GraphToTrie(Box<dyn Iterator<Item = Handle> + 'a>),
}

impl<'a> Iterator for PrevHandleIter<'a> {
    type Item = Handle;

    fn next(&mut self) -> Option<Handle> {
        match self {
            PrevHandleIter::Single(h) => h.take().filter(Handle::is_valid),
            PrevHandleIter::Split { graph, targets } => targets.next().map(|t| {
                let len = graph.node(t.node_id).seg.len() as u32;
                Handle::graph(t.node_id, len - 1)
            }),
            PrevHandleIter::GraphToTrie(it) => it.next(),
        }
    }
}

impl<'a> PrevHandleIter<'a> {
    /// Predecessors on the letter-location ribbon.
    pub fn make_graph(graph: &'a Graph, h: Handle) -> PrevHandleIter<'a> {
        match h.nodepos() {
            None => PrevHandleIter::Single(None),
            Some(np) if np.pos == 0 => PrevHandleIter::Split {
                graph,
                targets: graph.backward_from(np.node),
            },
            Some(np) => PrevHandleIter::Single(Some(Handle::graph(np.node, np.pos - 1))),
        }
    }

    /// Predecessors on the trie side.
    pub fn make_trie(data: &'a TrieGraphData, h: Handle) -> PrevHandleIter<'a> {
        let s = data.trie_data.settings();
        match h {
            Handle::Trie(kmer) => {
                if kmer.len(s) == 0 {
                    PrevHandleIter::Single(None)
                } else {
                    let mut parent = kmer;
                    parent.pop(s);
                    PrevHandleIter::Single(Some(Handle::Trie(parent)))
                }
            }
            Handle::Graph(np) => {
                let loc = data.letter_loc.compress(np);
                PrevHandleIter::GraphToTrie(Box::new(
                    data.trie_data.g2t_values_for(loc).map(Handle::Trie),
                ))
            }
            Handle::Invalid => PrevHandleIter::Single(None),
        }
    }
}
