// Orchestration: read the graph, resolve the k-mer settings, produce the
// pair set with either one algorithm or the complexity-partitioned pair
// of algorithms, then hand everything to the trie data build.

use crate::builders::{
    AlgoKind, TrieBuilderBt, TrieBuilderLbfs, TrieBuilderNbfs, TrieBuilderPbfs,
};
use crate::builders::lbfs::LbfsSettings;
use crate::builders::pbfs::PbfsSettings;
use crate::complexity::{ComplexityComponentWalker, ComplexityEstimator};
use crate::error::{BuildError, ConfigError};
use crate::kmer::KmerSettings;
use crate::trie_data::{KmerCodec, TrieData, TrieDataImpl};
use crate::triegraph::TrieGraph;
use crate::utils::config::RunConfiguration;
use common::VectorPairs;
use gfa_graph::top_order::TopOrder;
use gfa_graph::{
    Graph, GraphError, GraphSettings, LetterLoc, LetterLocData, NodePos,
};
use itertools::Itertools;
use log::{debug, info};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("graph input: {0}")]
    Graph(#[from] GraphError),
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("build: {0}")]
    Build(#[from] BuildError),
}

/// Run one builder over the given start positions (the BFS builders walk
/// the whole graph regardless and only support the full run).
pub fn pairs_from_graph(
    kind: AlgoKind,
    graph: &Graph,
    lloc: &LetterLocData,
    settings: &KmerSettings,
    codec: KmerCodec,
    config: &RunConfiguration,
    starts: Option<Box<dyn Iterator<Item = NodePos> + '_>>,
) -> Result<VectorPairs<u32, LetterLoc>, RunError> {
    let mut pairs = VectorPairs::new_dual();
    match kind {
        AlgoKind::Lbfs => {
            if starts.is_some() {
                return Err(ConfigError::SubsetUnsupported("bfs").into());
            }
            TrieBuilderLbfs::new(graph, lloc, settings, codec)
                .with_settings(LbfsSettings {
                    set_cutoff: config.lbfs_set_cutoff,
                })
                .compute_pairs(&mut pairs)?;
        }
        AlgoKind::NodeBfs => {
            if starts.is_some() {
                return Err(ConfigError::SubsetUnsupported("node_bfs").into());
            }
            TrieBuilderNbfs::new(graph, lloc, settings, codec).compute_pairs(&mut pairs);
        }
        AlgoKind::BackTrack => {
            let bt = TrieBuilderBt::new(graph, lloc, settings, codec);
            match starts {
                Some(starts) => bt.compute_pairs(starts, &mut pairs),
                None => bt.compute_pairs(lloc.iter(graph), &mut pairs),
            }
        }
        AlgoKind::Pbfs => {
            let cut = if codec.allow_inner {
                Some(config.pbfs_cut_early_threshold)
            } else {
                None
            };
            let pb = TrieBuilderPbfs::new(graph, lloc, settings, codec).with_settings(
                PbfsSettings {
                    cut_early_threshold: cut,
                },
            );
            match starts {
                Some(starts) => pb.compute_pairs(starts, &mut pairs),
                None => pb.compute_pairs(lloc.iter(graph), &mut pairs),
            }
        }
    }
    Ok(pairs)
}

/// Build the whole index per the run configuration.
pub fn run_build(config: &RunConfiguration) -> Result<TrieGraph, RunError> {
    info!("reading graph {}", config.graph_file);
    let graph = Graph::from_file(
        &config.graph_file,
        GraphSettings {
            add_reverse_complement: config.add_reverse_complement,
            add_extends: config.add_extends,
        },
    )?;
    let lloc = LetterLocData::new(&graph);
    info!(
        "graph has {} nodes / {} letters",
        graph.num_nodes(),
        lloc.num_locations
    );

    let settings = KmerSettings::from_config(
        lloc.num_locations,
        config.trie_depth,
        config.trie_depth_rel,
        config.trie_kmer_on_mask,
    )?;
    info!("trie depth {}", settings.k);

    let (pairs, allow_inner) = if config.complexity {
        let allow_inner = true;
        let codec = KmerCodec::new(allow_inner);
        let algo_fast: AlgoKind = config.algo_fast.parse()?;
        let algo_slow: AlgoKind = config.algo_slow.parse()?;

        info!("estimating per-node complexity");
        let top_ord = TopOrder::build(&graph);
        let estimate = ComplexityEstimator::new(
            &graph,
            &top_ord,
            settings.k,
            config.cc_backedge_init,
            config.cc_backedge_max_trav,
        )
        .compute();

        let seeds = estimate
            .ends
            .iter()
            .positions(|&e| e >= config.cc_cutoff)
            .map(|n| n as u32);
        let walker = ComplexityComponentWalker::build(&graph, seeds, settings.k);

        let num_cc = walker.cc_starts(&graph, settings.k).count();
        info!(
            "complexity partition: {} hotspot starts of {}",
            num_cc, lloc.num_locations
        );

        let mut pairs = pairs_from_graph(
            algo_fast,
            &graph,
            &lloc,
            &settings,
            codec,
            config,
            Some(Box::new(walker.non_cc_starts(&graph, settings.k))),
        )?;
        let slow_pairs = pairs_from_graph(
            algo_slow,
            &graph,
            &lloc,
            &settings,
            codec,
            config,
            Some(Box::new(walker.cc_starts(&graph, settings.k))),
        )?;
        pairs.append(slow_pairs);
        (pairs, allow_inner)
    } else {
        let allow_inner = false;
        let codec = KmerCodec::new(allow_inner);
        let kind: AlgoKind = config.algo.parse()?;
        (
            pairs_from_graph(kind, &graph, &lloc, &settings, codec, config, None)?,
            allow_inner,
        )
    };

    info!("collected {} raw pairs", pairs.len());
    let trie_data = TrieData::new(
        pairs,
        lloc.num_locations,
        &settings,
        allow_inner,
        TrieDataImpl::default(),
    );
    info!("{}", trie_data.stats());
    debug!("t2g run lengths:\n{}", trie_data.t2g_histogram());
    debug!("g2t run lengths:\n{}", trie_data.g2t_histogram());

    Ok(TrieGraph::new(graph, lloc, trie_data))
}

/// Dump the sorted pair set with expanded node positions.
pub fn print_pairs(tg: &TrieGraph) {
    let s = tg.kmer_settings();
    for (kmer, loc) in tg.data.trie_data.iter_pairs() {
        if loc < tg.data.letter_loc.num_locations {
            let np = tg.data.letter_loc.expand(loc);
            let node = tg.data.graph.node(np.node);
            println!(
                "{} -> {} {}({}):{}/{}",
                kmer.to_str(s),
                loc,
                np.node,
                node.seg_id,
                np.pos,
                node.seg.len()
            );
        } else {
            println!("{} -> {} (end of graph)", kmer.to_str(s), loc);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write_gfa() -> tempfile::NamedTempFile {
        let mut f = tempfile::Builder::new().suffix(".gfa").tempfile().unwrap();
        writeln!(f, "H\tVN:Z:1.0").unwrap();
        writeln!(f, "S\ts1\tacgtac").unwrap();
        writeln!(f, "S\ts2\tg").unwrap();
        writeln!(f, "S\ts3\tt").unwrap();
        writeln!(f, "S\ts4\tccgtaa").unwrap();
        writeln!(f, "L\ts1\t+\ts2\t+\t0M").unwrap();
        writeln!(f, "L\ts1\t+\ts3\t+\t0M").unwrap();
        writeln!(f, "L\ts2\t+\ts4\t+\t0M").unwrap();
        writeln!(f, "L\ts3\t+\ts4\t+\t0M").unwrap();
        f
    }

    fn config_for(path: &str) -> RunConfiguration {
        RunConfiguration {
            graph_file: path.to_string(),
            trie_depth: 4,
            trie_depth_rel: 0,
            trie_kmer_on_mask: None,
            algo: "back_track".to_string(),
            complexity: false,
            algo_fast: "back_track".to_string(),
            algo_slow: "pbfs".to_string(),
            cc_cutoff: 512,
            cc_backedge_init: 4,
            cc_backedge_max_trav: 2,
            lbfs_set_cutoff: 500,
            pbfs_cut_early_threshold: 256,
            add_reverse_complement: true,
            add_extends: true,
            print_pairs: false,
        }
    }

    fn complete_pairs(tg: &crate::triegraph::TrieGraph) -> Vec<(String, u32)> {
        let s = tg.kmer_settings();
        tg.data
            .trie_data
            .iter_pairs()
            .filter(|(k, _)| k.is_complete(s))
            .map(|(k, loc)| (k.to_str(s), loc))
            .collect()
    }

    #[test]
    fn test_run_build_single_algo() {
        let f = write_gfa();
        let config = config_for(f.path().to_str().unwrap());
        let tg = run_build(&config).unwrap();
        assert_eq!(tg.trie_depth(), 4);
        assert!(tg.data.trie_data.num_pairs() > 0);
        // twins doubled the nodes, extends capped the dead ends
        let (nodes, _, letters) = tg.graph_size();
        assert!(nodes >= 8);
        assert!(letters >= 28);
    }

    #[test]
    fn test_algos_agree_through_runner() {
        let f = write_gfa();
        let mut config = config_for(f.path().to_str().unwrap());
        let base = complete_pairs(&run_build(&config).unwrap());
        assert!(!base.is_empty());
        for algo in ["bfs", "pbfs", "node_bfs"] {
            config.algo = algo.to_string();
            let tg = run_build(&config).unwrap();
            assert_eq!(complete_pairs(&tg), base, "{}", algo);
        }
    }

    #[test]
    fn test_complexity_pipeline_matches_single_algo() {
        let f = write_gfa();
        let mut config = config_for(f.path().to_str().unwrap());
        let base = complete_pairs(&run_build(&config).unwrap());
        // no cut-early at this threshold, so the complete pairs must agree
        config.complexity = true;
        let tg = run_build(&config).unwrap();
        assert_eq!(complete_pairs(&tg), base);
    }

    #[test]
    fn test_complexity_pipeline_with_real_components() {
        // a short-node lattice between two long nodes: the y layer exceeds
        // a cutoff of 2 and seeds a component
        let mut f = tempfile::Builder::new().suffix(".gfa").tempfile().unwrap();
        writeln!(f, "S\tin\tacgtac").unwrap();
        writeln!(f, "S\tx0\ta").unwrap();
        writeln!(f, "S\tx1\tc").unwrap();
        writeln!(f, "S\ty0\tg").unwrap();
        writeln!(f, "S\ty1\tt").unwrap();
        writeln!(f, "S\tout\tccgtaa").unwrap();
        for (a, b) in [
            ("in", "x0"),
            ("in", "x1"),
            ("x0", "y0"),
            ("x0", "y1"),
            ("x1", "y0"),
            ("x1", "y1"),
            ("y0", "out"),
            ("y1", "out"),
        ] {
            writeln!(f, "L\t{}\t+\t{}\t+\t0M", a, b).unwrap();
        }

        let mut config = config_for(f.path().to_str().unwrap());
        let base = complete_pairs(&run_build(&config).unwrap());

        config.complexity = true;
        config.cc_cutoff = 2;
        // threshold high enough that pbfs never cuts, so the partitioned
        // run reproduces the full pair set exactly
        config.pbfs_cut_early_threshold = 256;
        let tg = run_build(&config).unwrap();
        assert_eq!(complete_pairs(&tg), base);
    }

    #[test]
    fn test_unknown_algo_is_config_error() {
        let f = write_gfa();
        let mut config = config_for(f.path().to_str().unwrap());
        config.algo = "dijkstra".to_string();
        assert!(matches!(
            run_build(&config),
            Err(RunError::Config(ConfigError::UnknownAlgo(_)))
        ));
    }

    #[test]
    fn test_missing_file_is_graph_error() {
        let mut config = config_for("no_such_file.gfa");
        config.graph_file = "no_such_file.gfa".to_string();
        assert!(matches!(run_build(&config), Err(RunError::Graph(_))));
    }
}
