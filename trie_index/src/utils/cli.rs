use clap::Parser;

/// Build a k-mer trie index over a DNA variation graph and report its
/// statistics.
#[derive(Parser, Debug)]
#[command(name = "build_index", version, about)]
pub struct Cli {
    /// Input graph file (.gfa, .rgfa, .fa or .fasta)
    #[arg(long)]
    pub graph: String,

    /// Absolute trie depth K. 0 means derive it from the graph size.
    #[arg(long, default_value_t = 0)]
    pub trie_depth: u32,

    /// Trie depth relative to log4 of the letter count. Exclusive with
    /// --trie-depth.
    #[arg(long, default_value_t = 0)]
    pub trie_depth_rel: i32,

    /// Override the k-mer on-mask (default: the top bit of the word).
    #[arg(long)]
    pub trie_kmer_on_mask: Option<u32>,

    /// Algorithm for a single-pass build: bfs, back_track, pbfs, node_bfs.
    #[arg(long, default_value = "back_track")]
    pub algo: String,

    /// Split the build between a fast and a hotspot algorithm using the
    /// complexity machinery.
    #[arg(long)]
    pub complexity: bool,

    /// Fast algorithm for positions outside complexity components.
    #[arg(long, default_value = "back_track")]
    pub algo_fast: String,

    /// Hotspot algorithm for positions inside complexity components.
    #[arg(long, default_value = "pbfs")]
    pub algo_slow: String,

    /// Fan-out estimate above which a node seeds a complexity component.
    #[arg(long, default_value_t = 512)]
    pub cc_cutoff: u32,

    /// Initial fan-out contribution of a back-edge.
    #[arg(long, default_value_t = 4)]
    pub cc_backedge_init: u32,

    /// How many times a back-edge is re-propagated before clamping.
    #[arg(long, default_value_t = 2)]
    pub cc_backedge_max_trav: u32,

    /// Per-location list size at which the bfs builder switches to hash
    /// sets.
    #[arg(long, default_value_t = 500)]
    pub trie_builder_lbfs_set_cutoff: u32,

    /// Frontier size at which pbfs abandons a start position.
    #[arg(long, default_value_t = 256)]
    pub trie_builder_pbfs_cut_early_threshold: u32,

    /// Do not synthesise reverse-complement twin nodes.
    #[arg(long)]
    pub no_reverse_complement: bool,

    /// Do not synthesise single-letter extend sinks on dead ends.
    #[arg(long)]
    pub no_extends: bool,

    /// Dump the sorted pair set after building.
    #[arg(long)]
    pub print_pairs: bool,

    /// Log level: trace, debug, info, warn, error or off.
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Log file destination.
    #[arg(long, default_value = "trie_index.log")]
    pub log_dest: String,

    /// Optional YAML configuration file; its values override the command
    /// line.
    #[arg(long, default_value = "")]
    pub config: String,
}
