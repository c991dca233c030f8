// Shared scaffolding for the crate tests: tiny graphs and a one-call
// index build.

use crate::builders::TrieBuilderBt;
use crate::kmer::KmerSettings;
use crate::trie_data::{KmerCodec, TrieData, TrieDataImpl};
use crate::triegraph::TrieGraph;
use common::VectorPairs;
use gfa_graph::dna_string::DnaString;
use gfa_graph::graph::{Graph, GraphBuilder, GraphSettings};
use gfa_graph::LetterLocData;

pub fn plain_settings() -> GraphSettings {
    GraphSettings {
        add_reverse_complement: false,
        add_extends: false,
    }
}

/// Assemble a graph from (id, seq) nodes and (from, to) edges.
pub fn make_graph(
    settings: GraphSettings,
    nodes: &[(&str, &str)],
    edges: &[(&str, &str)],
) -> Graph {
    let mut b = GraphBuilder::new(settings);
    for (id, seq) in nodes {
        b.add_node(DnaString::from_dna_str(seq).unwrap(), id);
    }
    for (from, to) in edges {
        b.add_edge(from, to).unwrap();
    }
    b.build().unwrap()
}

/// Build a full index with the back-track builder.
pub fn make_triegraph(graph: Graph, k: u32) -> TrieGraph {
    let settings = KmerSettings::from_depth(k).unwrap();
    let lloc = LetterLocData::new(&graph);
    let codec = KmerCodec::new(false);
    let mut pairs = VectorPairs::new_dual();
    TrieBuilderBt::new(&graph, &lloc, &settings, codec).compute_pairs(lloc.iter(&graph), &mut pairs);
    let trie_data = TrieData::new(pairs, lloc.num_locations, &settings, false, TrieDataImpl::default());
    TrieGraph::new(graph, lloc, trie_data)
}
