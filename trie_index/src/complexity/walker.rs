// Partitions every letter location into the positions the hotspot
// algorithm should handle (inside the components, plus the window tails
// of the incoming long nodes) and everything else. A k-mer window of
// length K starting earlier than the last K - 1 letters of an incoming
// node cannot reach inside the component, which fixes the boundary.

use crate::complexity::component::ComplexityComponent;
use gfa_graph::{Graph, NodeId, NodePos};
use log::warn;

#[derive(Debug)]
pub struct ComplexityComponentWalker {
    pub ccs: Vec<ComplexityComponent>,
    external: Vec<NodeId>,
    incoming: Vec<NodeId>,
}

impl ComplexityComponentWalker {
    pub fn build(
        graph: &Graph,
        seeds: impl IntoIterator<Item = NodeId>,
        trie_depth: u32,
    ) -> ComplexityComponentWalker {
        let n = graph.num_nodes() as usize;
        let mut ccs: Vec<ComplexityComponent> = Vec::new();
        let mut in_cc = vec![false; n];
        let mut in_cci = vec![false; n];

        for seed in seeds {
            if graph.node(seed).seg.len() as u32 >= trie_depth {
                // long nodes never exceed the cutoff on their own
                warn!("ignoring long hotspot seed {}", seed);
                continue;
            }
            if in_cc[seed as usize] {
                continue;
            }
            let cc = ComplexityComponent::build(graph, seed, trie_depth);
            for &node in &cc.internal {
                in_cc[node as usize] = true;
            }
            for &node in &cc.incoming {
                in_cci[node as usize] = true;
            }
            ccs.push(cc);
        }

        let mut external = Vec::new();
        let mut incoming = Vec::new();
        for i in 0..n {
            if in_cci[i] {
                incoming.push(i as u32);
            } else if !in_cc[i] {
                external.push(i as u32);
            }
        }

        ComplexityComponentWalker {
            ccs,
            external,
            incoming,
        }
    }

    /// Positions for the hotspot algorithm: every internal letter plus the
    /// last trie_depth - 1 letters of each incoming node.
    pub fn cc_starts<'a>(
        &'a self,
        graph: &'a Graph,
        trie_depth: u32,
    ) -> impl Iterator<Item = NodePos> + 'a {
        let internal = self.ccs.iter().flat_map(move |cc| {
            cc.internal.iter().flat_map(move |&node| {
                (0..graph.node(node).seg.len() as u32).map(move |pos| NodePos::new(node, pos))
            })
        });
        let tails = self.incoming.iter().flat_map(move |&node| {
            let len = graph.node(node).seg.len() as u32;
            (len - (trie_depth - 1)..len).map(move |pos| NodePos::new(node, pos))
        });
        internal.chain(tails)
    }

    /// All remaining positions, for the fast algorithm.
    pub fn non_cc_starts<'a>(
        &'a self,
        graph: &'a Graph,
        trie_depth: u32,
    ) -> impl Iterator<Item = NodePos> + 'a {
        let external = self.external.iter().flat_map(move |&node| {
            (0..graph.node(node).seg.len() as u32).map(move |pos| NodePos::new(node, pos))
        });
        let heads = self.incoming.iter().flat_map(move |&node| {
            let len = graph.node(node).seg.len() as u32;
            (0..len - (trie_depth - 1)).map(move |pos| NodePos::new(node, pos))
        });
        external.chain(heads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gfa_graph::dna_string::DnaString;
    use gfa_graph::graph::{GraphBuilder, GraphSettings};
    use gfa_graph::LetterLocData;
    use pretty_assertions::assert_eq;

    fn lattice_graph() -> Graph {
        let mut b = GraphBuilder::new(GraphSettings {
            add_reverse_complement: false,
            add_extends: false,
        });
        b.add_node(DnaString::from_dna_str("acgtacgt").unwrap(), "in")
            .add_node(DnaString::from_dna_str("a").unwrap(), "x0")
            .add_node(DnaString::from_dna_str("c").unwrap(), "x1")
            .add_node(DnaString::from_dna_str("g").unwrap(), "y0")
            .add_node(DnaString::from_dna_str("t").unwrap(), "y1")
            .add_node(DnaString::from_dna_str("ccccgggg").unwrap(), "out");
        for (from, to) in [
            ("in", "x0"),
            ("in", "x1"),
            ("x0", "y0"),
            ("x0", "y1"),
            ("x1", "y0"),
            ("x1", "y1"),
            ("y0", "out"),
            ("y1", "out"),
        ] {
            b.add_edge(from, to).unwrap();
        }
        b.build().unwrap()
    }

    #[test]
    fn test_partition_covers_all_locations() {
        let g = lattice_graph();
        let lloc = LetterLocData::new(&g);
        let walker = ComplexityComponentWalker::build(&g, [1u32], 4);

        let mut all: Vec<u32> = walker
            .cc_starts(&g, 4)
            .chain(walker.non_cc_starts(&g, 4))
            .map(|np| lloc.compress(np))
            .collect();
        all.sort_unstable();
        let expected: Vec<u32> = (0..lloc.num_locations).collect();
        assert_eq!(all, expected);
    }

    #[test]
    fn test_boundary_split() {
        let g = lattice_graph();
        let walker = ComplexityComponentWalker::build(&g, [1u32], 4);

        let cc: Vec<NodePos> = walker.cc_starts(&g, 4).collect();
        // internal letters of the four short nodes
        for node in 1..=4u32 {
            assert!(cc.contains(&NodePos::new(node, 0)));
        }
        // the last K-1 = 3 letters of the incoming node
        for pos in 5..8u32 {
            assert!(cc.contains(&NodePos::new(0, pos)));
        }
        assert!(!cc.contains(&NodePos::new(0, 4)));
        assert_eq!(cc.len(), 4 + 3);

        let non: Vec<NodePos> = walker.non_cc_starts(&g, 4).collect();
        assert!(non.contains(&NodePos::new(0, 0)));
        assert!(non.contains(&NodePos::new(0, 4)));
        // the outgoing node is plain external
        for pos in 0..8u32 {
            assert!(non.contains(&NodePos::new(5, pos)));
        }
    }

    #[test]
    fn test_no_seeds_everything_external() {
        let g = lattice_graph();
        let lloc = LetterLocData::new(&g);
        let walker = ComplexityComponentWalker::build(&g, [], 4);
        assert_eq!(walker.cc_starts(&g, 4).count(), 0);
        assert_eq!(
            walker.non_cc_starts(&g, 4).count() as u32,
            lloc.num_locations
        );
    }
}
