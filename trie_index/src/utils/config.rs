// The run configuration, assembled from the command line or from a YAML
// file whose keys mirror the flag names. A config file overrides the
// command line wholesale for the keys it names.

use super::cli::Cli;
use log::info;
use serde::Deserialize;
use std::fs;

#[derive(Debug)]
pub struct RunConfiguration {
    // graph_file: the input graph, .gfa/.rgfa/.fa/.fasta.
    // trie_depth / trie_depth_rel: absolute K, or K relative to log4 of
    // the letter count; exclusive.
    // algo: the single-pass builder; used when complexity is off.
    // complexity + algo_fast/algo_slow + cc_*: the partitioned build.
    // The remaining knobs are builder internals with sane defaults.
    pub graph_file: String,
    pub trie_depth: u32,
    pub trie_depth_rel: i32,
    pub trie_kmer_on_mask: Option<u32>,
    pub algo: String,
    pub complexity: bool,
    pub algo_fast: String,
    pub algo_slow: String,
    pub cc_cutoff: u32,
    pub cc_backedge_init: u32,
    pub cc_backedge_max_trav: u32,
    pub lbfs_set_cutoff: u32,
    pub pbfs_cut_early_threshold: u32,
    pub add_reverse_complement: bool,
    pub add_extends: bool,
    pub print_pairs: bool,
}

/// The YAML surface. Every key is optional; kebab-case, matching the
/// command line flags.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct ConfigFile {
    graph: Option<String>,
    trie_depth: Option<u32>,
    trie_depth_rel: Option<i32>,
    trie_kmer_on_mask: Option<u32>,
    algo: Option<String>,
    complexity: Option<bool>,
    algo_fast: Option<String>,
    algo_slow: Option<String>,
    cc_cutoff: Option<u32>,
    cc_backedge_init: Option<u32>,
    cc_backedge_max_trav: Option<u32>,
    trie_builder_lbfs_set_cutoff: Option<u32>,
    trie_builder_pbfs_cut_early_threshold: Option<u32>,
    no_reverse_complement: Option<bool>,
    no_extends: Option<bool>,
    print_pairs: Option<bool>,
}

pub fn build_config_from_args(args: &Cli) -> RunConfiguration {
    RunConfiguration {
        graph_file: args.graph.clone(),
        trie_depth: args.trie_depth,
        trie_depth_rel: args.trie_depth_rel,
        trie_kmer_on_mask: args.trie_kmer_on_mask,
        algo: args.algo.clone(),
        complexity: args.complexity,
        algo_fast: args.algo_fast.clone(),
        algo_slow: args.algo_slow.clone(),
        cc_cutoff: args.cc_cutoff,
        cc_backedge_init: args.cc_backedge_init,
        cc_backedge_max_trav: args.cc_backedge_max_trav,
        lbfs_set_cutoff: args.trie_builder_lbfs_set_cutoff,
        pbfs_cut_early_threshold: args.trie_builder_pbfs_cut_early_threshold,
        add_reverse_complement: !args.no_reverse_complement,
        add_extends: !args.no_extends,
        print_pairs: args.print_pairs,
    }
}

/// Layer a YAML config file over the command-line configuration.
pub fn apply_config_yaml(
    mut config: RunConfiguration,
    path: &str,
) -> Result<RunConfiguration, serde_yaml::Error> {
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        panic!("could not read config file {}: {}", path, e);
    });
    let file: ConfigFile = serde_yaml::from_str(&text)?;

    if let Some(v) = file.graph {
        config.graph_file = v;
    }
    if let Some(v) = file.trie_depth {
        config.trie_depth = v;
    }
    if let Some(v) = file.trie_depth_rel {
        config.trie_depth_rel = v;
    }
    if file.trie_kmer_on_mask.is_some() {
        config.trie_kmer_on_mask = file.trie_kmer_on_mask;
    }
    if let Some(v) = file.algo {
        config.algo = v;
    }
    if let Some(v) = file.complexity {
        config.complexity = v;
    }
    if let Some(v) = file.algo_fast {
        config.algo_fast = v;
    }
    if let Some(v) = file.algo_slow {
        config.algo_slow = v;
    }
    if let Some(v) = file.cc_cutoff {
        config.cc_cutoff = v;
    }
    if let Some(v) = file.cc_backedge_init {
        config.cc_backedge_init = v;
    }
    if let Some(v) = file.cc_backedge_max_trav {
        config.cc_backedge_max_trav = v;
    }
    if let Some(v) = file.trie_builder_lbfs_set_cutoff {
        config.lbfs_set_cutoff = v;
    }
    if let Some(v) = file.trie_builder_pbfs_cut_early_threshold {
        config.pbfs_cut_early_threshold = v;
    }
    if let Some(v) = file.no_reverse_complement {
        config.add_reverse_complement = !v;
    }
    if let Some(v) = file.no_extends {
        config.add_extends = !v;
    }
    if let Some(v) = file.print_pairs {
        config.print_pairs = v;
    }
    Ok(config)
}

impl RunConfiguration {
    /// Log the effective configuration, as a record of the run.
    pub fn print(&self) {
        info!("Building trie index for {} with...", self.graph_file);
        if self.trie_depth != 0 {
            info!("  >trie depth: {}", self.trie_depth);
        } else {
            info!("  >trie depth: log4(letters) {:+}", self.trie_depth_rel);
        }
        if self.complexity {
            info!(
                "  >partitioned build: fast={} slow={} cutoff={}",
                self.algo_fast, self.algo_slow, self.cc_cutoff
            );
        } else {
            info!("  >algorithm: {}", self.algo);
        }
        info!(
            "  >reverse complement: {}, extends: {}",
            self.add_reverse_complement, self.add_extends
        );
    }
}
