// Lazy enumeration of the edit edges leaving a handle. Four shapes exist:
//
//  - graph-fwd: mid-node position; sub/match into the next position, then
//    inserts staying put, then one delete into the next position;
//  - graph-split: last letter of a node; a sub/match + delete block per
//    outgoing node, then the insert block (no successors: inserts only);
//  - trie-inner: a sub/match + delete block per live child of the trie
//    node, then inserts staying at the node;
//  - trie-to-graph: a complete k-mer fans out to each letter location it
//    anchors at, dispatching to the two graph shapes.
//
// The iterators are single pass and borrow the index; nothing is mutated
// while they run.

use crate::handle::{EditEdge, EditKind, Handle};
use crate::kmer::{Kmer, KmerSettings};
use crate::triegraph::TrieGraphData;
use gfa_graph::graph::Targets;
use gfa_graph::{Letter, NodePos, EPS, SIGMA};

/// Edges from a mid-node position.
pub struct GraphFwdEdges {
    actual: Letter,
    p0: NodePos,
    state: u32,
}

impl GraphFwdEdges {
    pub fn new(actual: Letter, p0: NodePos) -> Self {
        GraphFwdEdges {
            actual,
            p0,
            state: 0,
        }
    }
}

impl Iterator for GraphFwdEdges {
    type Item = EditEdge;

    fn next(&mut self) -> Option<EditEdge> {
        let next_pos = Handle::graph(self.p0.node, self.p0.pos + 1);
        let edge = if self.state < SIGMA {
            let c = self.state as Letter;
            EditEdge::new(
                next_pos,
                if c == self.actual {
                    EditKind::Match
                } else {
                    EditKind::Sub
                },
                c,
            )
        } else if self.state < 2 * SIGMA {
            EditEdge::new(
                Handle::Graph(self.p0),
                EditKind::Ins,
                (self.state - SIGMA) as Letter,
            )
        } else if self.state == 2 * SIGMA {
            EditEdge::new(next_pos, EditKind::Del, EPS)
        } else {
            return None;
        };
        self.state += 1;
        Some(edge)
    }
}

/// Edges from the last letter of a node.
pub struct GraphSplitEdges<'a> {
    actual: Letter,
    p0: NodePos,
    targets: Targets<'a>,
    cur: Option<u32>,
    state: u32,
    ins: u32,
}

impl<'a> GraphSplitEdges<'a> {
    pub fn new(actual: Letter, p0: NodePos, mut targets: Targets<'a>) -> Self {
        let cur = targets.next().map(|t| t.node_id);
        GraphSplitEdges {
            actual,
            p0,
            targets,
            cur,
            state: 0,
            ins: 0,
        }
    }
}

impl<'a> Iterator for GraphSplitEdges<'a> {
    type Item = EditEdge;

    fn next(&mut self) -> Option<EditEdge> {
        if let Some(to) = self.cur {
            let target = Handle::graph(to, 0);
            let edge = if self.state < SIGMA {
                let c = self.state as Letter;
                EditEdge::new(
                    target,
                    if c == self.actual {
                        EditKind::Match
                    } else {
                        EditKind::Sub
                    },
                    c,
                )
            } else {
                EditEdge::new(target, EditKind::Del, EPS)
            };
            self.state += 1;
            if self.state > SIGMA {
                self.state = 0;
                self.cur = self.targets.next().map(|t| t.node_id);
            }
            return Some(edge);
        }
        if self.ins < SIGMA {
            let c = self.ins as Letter;
            self.ins += 1;
            return Some(EditEdge::new(Handle::Graph(self.p0), EditKind::Ins, c));
        }
        None
    }
}

/// Edges from an inner trie node, over the children flagged in `opts`.
pub struct TrieInnerEdges<'a> {
    settings: &'a KmerSettings,
    kmer: Kmer,
    opts: u32,
    child: u32,
    state: u32,
    ins: u32,
}

impl<'a> TrieInnerEdges<'a> {
    pub fn new(settings: &'a KmerSettings, kmer: Kmer, opts: u32) -> Self {
        TrieInnerEdges {
            settings,
            kmer,
            opts,
            child: 0,
            state: 0,
            ins: 0,
        }
    }
}

impl<'a> Iterator for TrieInnerEdges<'a> {
    type Item = EditEdge;

    fn next(&mut self) -> Option<EditEdge> {
        while self.child < SIGMA && (self.opts >> self.child) & 1 == 0 {
            self.child += 1;
        }
        if self.child < SIGMA {
            let mut nkmer = self.kmer;
            nkmer.push(self.child as Letter, self.settings);
            let target = Handle::Trie(nkmer);
            let edge = if self.state < SIGMA {
                let c = self.state as Letter;
                EditEdge::new(
                    target,
                    if c == self.child as Letter {
                        EditKind::Match
                    } else {
                        EditKind::Sub
                    },
                    c,
                )
            } else {
                EditEdge::new(target, EditKind::Del, EPS)
            };
            self.state += 1;
            if self.state > SIGMA {
                self.state = 0;
                self.child += 1;
            }
            return Some(edge);
        }
        if self.ins < SIGMA {
            let c = self.ins as Letter;
            self.ins += 1;
            return Some(EditEdge::new(Handle::Trie(self.kmer), EditKind::Ins, c));
        }
        None
    }
}

/// Either graph shape, as produced when landing on a letter location.
pub enum GraphPointEdges<'a> {
    Fwd(GraphFwdEdges),
    Split(GraphSplitEdges<'a>),
}

impl<'a> Iterator for GraphPointEdges<'a> {
    type Item = EditEdge;

    fn next(&mut self) -> Option<EditEdge> {
        match self {
            GraphPointEdges::Fwd(it) => it.next(),
            GraphPointEdges::Split(it) => it.next(),
        }
    }
}

fn graph_point_edges(data: &TrieGraphData, loc: u32) -> GraphPointEdges<'_> {
    if loc == data.letter_loc.num_locations {
        // a k-mer that matched to the very end of the graph: inserts only
        let last = data.graph.num_nodes() - 1;
        let len = data.graph.node(last).seg.len() as u32;
        return GraphPointEdges::Split(GraphSplitEdges::new(
            EPS,
            NodePos::new(last, len),
            data.graph.no_targets(),
        ));
    }
    let np = data.letter_loc.expand(loc);
    graph_edges_at(data, np)
}

fn graph_edges_at(data: &TrieGraphData, np: NodePos) -> GraphPointEdges<'_> {
    let seg = &data.graph.node(np.node).seg;
    if np.pos + 1 < seg.len() as u32 {
        GraphPointEdges::Fwd(GraphFwdEdges::new(seg.get(np.pos as usize), np))
    } else {
        let actual = if np.pos as usize == seg.len() {
            EPS
        } else {
            seg.get(np.pos as usize)
        };
        GraphPointEdges::Split(GraphSplitEdges::new(
            actual,
            np,
            data.graph.forward_from(np.node),
        ))
    }
}

/// Edges from a complete trie k-mer: each anchored letter location in turn.
pub struct TrieToGraphEdges<'a> {
    data: &'a TrieGraphData,
    locs: Box<dyn Iterator<Item = u32> + 'a>,
    cur: Option<GraphPointEdges<'a>>,
}

impl<'a> TrieToGraphEdges<'a> {
    pub fn new(kmer: Kmer, data: &'a TrieGraphData) -> Self {
        TrieToGraphEdges {
            data,
            locs: Box::new(data.trie_data.t2g_values_for(kmer)),
            cur: None,
        }
    }
}

impl<'a> Iterator for TrieToGraphEdges<'a> {
    type Item = EditEdge;

    fn next(&mut self) -> Option<EditEdge> {
        loop {
            if let Some(it) = self.cur.as_mut() {
                if let Some(edge) = it.next() {
                    return Some(edge);
                }
            }
            let loc = self.locs.next()?;
            self.cur = Some(graph_point_edges(self.data, loc));
        }
    }
}

/// The unified edit-edge iterator.
pub enum EditEdgeIter<'a> {
    Empty,
    GraphFwd(GraphFwdEdges),
    GraphSplit(GraphSplitEdges<'a>),
    TrieInner(TrieInnerEdges<'a>),
    TrieToGraph(TrieToGraphEdges<'a>),
}

impl<'a> Iterator for EditEdgeIter<'a> {
    type Item = EditEdge;

    fn next(&mut self) -> Option<EditEdge> {
        match self {
            EditEdgeIter::Empty => None,
            EditEdgeIter::GraphFwd(it) => it.next(),
            EditEdgeIter::GraphSplit(it) => it.next(),
            EditEdgeIter::TrieInner(it) => it.next(),
            EditEdgeIter::TrieToGraph(it) => it.next(),
        }
    }
}

impl<'a> EditEdgeIter<'a> {
    /// Build the right shape for a handle.
    pub fn make(h: Handle, data: &'a TrieGraphData) -> EditEdgeIter<'a> {
        let s = data.trie_data.settings();
        match h {
            Handle::Invalid => EditEdgeIter::Empty,
            Handle::Trie(kmer) => {
                let depth = kmer.len(s);
                if depth + 1 < s.k {
                    // children exist when the presence bitset says so
                    let mut opts = 0u32;
                    let mut nkmer = kmer;
                    for l in 0..SIGMA {
                        nkmer.push(l as Letter, s);
                        if data.trie_data.trie_inner_contains(nkmer) {
                            opts |= 1 << l;
                        }
                        nkmer.pop(s);
                    }
                    EditEdgeIter::TrieInner(TrieInnerEdges::new(s, kmer, opts))
                } else if depth + 1 == s.k {
                    // children are leaves: consult the leaf table
                    let mut opts = 0u32;
                    let mut nkmer = kmer;
                    for l in 0..SIGMA {
                        nkmer.push(l as Letter, s);
                        if data.trie_data.t2g_contains(nkmer) {
                            opts |= 1 << l;
                        }
                        nkmer.pop(s);
                    }
                    EditEdgeIter::TrieInner(TrieInnerEdges::new(s, kmer, opts))
                } else {
                    EditEdgeIter::TrieToGraph(TrieToGraphEdges::new(kmer, data))
                }
            }
            Handle::Graph(np) => match graph_edges_at(data, np) {
                GraphPointEdges::Fwd(it) => EditEdgeIter::GraphFwd(it),
                GraphPointEdges::Split(it) => EditEdgeIter::GraphSplit(it),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::EditKind::{Del, Ins, Match, Sub};
    use crate::test_helpers::{make_graph, make_triegraph, plain_settings};
    use gfa_graph::graph::GraphSettings;
    use pretty_assertions::assert_eq;

    fn sorted(mut edges: Vec<EditEdge>) -> Vec<EditEdge> {
        edges.sort();
        edges
    }

    #[test]
    fn test_graph_fwd_order() {
        let got: Vec<EditEdge> = GraphFwdEdges::new(1, NodePos::new(4, 2)).collect();
        let expected = vec![
            EditEdge::new(Handle::graph(4, 3), Sub, 0),
            EditEdge::new(Handle::graph(4, 3), Match, 1),
            EditEdge::new(Handle::graph(4, 3), Sub, 2),
            EditEdge::new(Handle::graph(4, 3), Sub, 3),
            EditEdge::new(Handle::graph(4, 2), Ins, 0),
            EditEdge::new(Handle::graph(4, 2), Ins, 1),
            EditEdge::new(Handle::graph(4, 2), Ins, 2),
            EditEdge::new(Handle::graph(4, 2), Ins, 3),
            EditEdge::new(Handle::graph(4, 3), Del, EPS),
        ];
        assert_eq!(got, expected);
    }

    #[test]
    fn test_graph_split_order() {
        let g = make_graph(
            plain_settings(),
            &[("s1", "a"), ("s2", "c"), ("s3", "g")],
            &[("s1", "s3"), ("s1", "s2")],
        );
        // adjacency lists are LIFO over insertion: s2 first, then s3
        let got: Vec<EditEdge> =
            GraphSplitEdges::new(0, NodePos::new(0, 0), g.forward_from(0)).collect();
        let expected = vec![
            EditEdge::new(Handle::graph(1, 0), Match, 0),
            EditEdge::new(Handle::graph(1, 0), Sub, 1),
            EditEdge::new(Handle::graph(1, 0), Sub, 2),
            EditEdge::new(Handle::graph(1, 0), Sub, 3),
            EditEdge::new(Handle::graph(1, 0), Del, EPS),
            EditEdge::new(Handle::graph(2, 0), Match, 0),
            EditEdge::new(Handle::graph(2, 0), Sub, 1),
            EditEdge::new(Handle::graph(2, 0), Sub, 2),
            EditEdge::new(Handle::graph(2, 0), Sub, 3),
            EditEdge::new(Handle::graph(2, 0), Del, EPS),
            EditEdge::new(Handle::graph(0, 0), Ins, 0),
            EditEdge::new(Handle::graph(0, 0), Ins, 1),
            EditEdge::new(Handle::graph(0, 0), Ins, 2),
            EditEdge::new(Handle::graph(0, 0), Ins, 3),
        ];
        assert_eq!(got, expected);
    }

    #[test]
    fn test_graph_split_no_successors_ins_only() {
        let g = make_graph(
            plain_settings(),
            &[("s1", "a"), ("s2", "c")],
            &[("s1", "s2")],
        );
        let got: Vec<EditEdge> =
            GraphSplitEdges::new(2, NodePos::new(1, 0), g.forward_from(1)).collect();
        let expected = vec![
            EditEdge::new(Handle::graph(1, 0), Ins, 0),
            EditEdge::new(Handle::graph(1, 0), Ins, 1),
            EditEdge::new(Handle::graph(1, 0), Ins, 2),
            EditEdge::new(Handle::graph(1, 0), Ins, 3),
        ];
        assert_eq!(got, expected);
    }

    #[test]
    fn test_trie_inner_children_blocks() {
        // children mask {C, G} from "cg": two sub/match/del blocks plus the
        // insert block, 14 edges in the DNA alphabet
        let s = &KmerSettings::from_depth(4).unwrap();
        let kmer = Kmer::from_str("cg", s);
        let got: Vec<EditEdge> =
            TrieInnerEdges::new(s, kmer, (1 << 1) | (1 << 2)).collect();
        assert_eq!(got.len(), 14);

        let cga = Handle::Trie(Kmer::from_str("cga", s));
        let cgg = Handle::Trie(Kmer::from_str("cgg", s));
        let at = Handle::Trie(kmer);
        let expected = vec![
            EditEdge::new(cga, Sub, 0),
            EditEdge::new(cga, Match, 1),
            EditEdge::new(cga, Sub, 2),
            EditEdge::new(cga, Sub, 3),
            EditEdge::new(cga, Del, EPS),
            EditEdge::new(cgg, Sub, 0),
            EditEdge::new(cgg, Sub, 1),
            EditEdge::new(cgg, Match, 2),
            EditEdge::new(cgg, Sub, 3),
            EditEdge::new(cgg, Del, EPS),
            EditEdge::new(at, Ins, 0),
            EditEdge::new(at, Ins, 1),
            EditEdge::new(at, Ins, 2),
            EditEdge::new(at, Ins, 3),
        ];
        assert_eq!(sorted(got), sorted(expected));
    }

    #[test]
    fn test_trie_inner_match_placement() {
        // the C-child block: match on C, subs elsewhere, against "cga"
        let tg = make_triegraph(
            make_graph(plain_settings(), &[("s1", "acgac")], &[]),
            4,
        );
        let s = tg.kmer_settings();
        let it = EditEdgeIter::make(Handle::Trie(Kmer::from_str("a", s)), &tg.data);
        let edges: Vec<EditEdge> = it.collect();
        let ac = Handle::Trie(Kmer::from_str("ac", s));
        // only child is 'c': one block of 5 plus 4 inserts
        assert_eq!(edges.len(), 9);
        assert!(edges.contains(&EditEdge::new(ac, Match, 1)));
        assert!(edges.contains(&EditEdge::new(ac, Sub, 0)));
        assert!(edges.contains(&EditEdge::new(ac, Del, EPS)));
    }

    #[test]
    fn test_trie_to_graph() {
        /*
         *      [1]
         *  [0] gg   [3]
         *  ac /  \ ac
         *  01 \[2]/ 78  (+ extends)
         *      acg
         *      456
         */
        let g = make_graph(
            GraphSettings {
                add_reverse_complement: false,
                add_extends: true,
            },
            &[("s1", "ac"), ("s2", "gg"), ("s3", "acg"), ("s4", "ac")],
            &[("s1", "s2"), ("s1", "s3"), ("s2", "s4"), ("s3", "s4")],
        );
        let tg = make_triegraph(g, 2);
        let s = tg.kmer_settings();

        // "ac" terminates at locations 2 (s2,0), 4 (s3,0), 6 (s3,2) and 9
        // (the extend of s4)
        let it = EditEdgeIter::make(Handle::Trie(Kmer::from_str("ac", s)), &tg.data);
        let got: Vec<EditEdge> = it.collect();

        let mut expected = Vec::new();
        // (s2, 0): mid-node fwd over letter g
        expected.extend([
            EditEdge::new(Handle::graph(1, 1), Sub, 0),
            EditEdge::new(Handle::graph(1, 1), Sub, 1),
            EditEdge::new(Handle::graph(1, 1), Match, 2),
            EditEdge::new(Handle::graph(1, 1), Sub, 3),
            EditEdge::new(Handle::graph(1, 0), Ins, 0),
            EditEdge::new(Handle::graph(1, 0), Ins, 1),
            EditEdge::new(Handle::graph(1, 0), Ins, 2),
            EditEdge::new(Handle::graph(1, 0), Ins, 3),
            EditEdge::new(Handle::graph(1, 1), Del, EPS),
        ]);
        // (s3, 0): mid-node fwd over letter a
        expected.extend([
            EditEdge::new(Handle::graph(2, 1), Match, 0),
            EditEdge::new(Handle::graph(2, 1), Sub, 1),
            EditEdge::new(Handle::graph(2, 1), Sub, 2),
            EditEdge::new(Handle::graph(2, 1), Sub, 3),
            EditEdge::new(Handle::graph(2, 0), Ins, 0),
            EditEdge::new(Handle::graph(2, 0), Ins, 1),
            EditEdge::new(Handle::graph(2, 0), Ins, 2),
            EditEdge::new(Handle::graph(2, 0), Ins, 3),
            EditEdge::new(Handle::graph(2, 1), Del, EPS),
        ]);
        // (s3, 2): last letter g, splitting into s4
        expected.extend([
            EditEdge::new(Handle::graph(3, 0), Sub, 0),
            EditEdge::new(Handle::graph(3, 0), Sub, 1),
            EditEdge::new(Handle::graph(3, 0), Match, 2),
            EditEdge::new(Handle::graph(3, 0), Sub, 3),
            EditEdge::new(Handle::graph(3, 0), Del, EPS),
            EditEdge::new(Handle::graph(2, 2), Ins, 0),
            EditEdge::new(Handle::graph(2, 2), Ins, 1),
            EditEdge::new(Handle::graph(2, 2), Ins, 2),
            EditEdge::new(Handle::graph(2, 2), Ins, 3),
        ]);
        // (extend of s4, 0): last letter, no successors: inserts only
        expected.extend([
            EditEdge::new(Handle::graph(4, 0), Ins, 0),
            EditEdge::new(Handle::graph(4, 0), Ins, 1),
            EditEdge::new(Handle::graph(4, 0), Ins, 2),
            EditEdge::new(Handle::graph(4, 0), Ins, 3),
        ]);
        assert_eq!(sorted(got), sorted(expected));
    }

    #[test]
    fn test_invalid_handle_yields_nothing() {
        let tg = make_triegraph(make_graph(plain_settings(), &[("s1", "acgt")], &[]), 2);
        let it = EditEdgeIter::make(Handle::invalid(), &tg.data);
        assert_eq!(it.count(), 0);
    }
}
