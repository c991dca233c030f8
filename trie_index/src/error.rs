use thiserror::Error;

/// Configuration problems caught before any building starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("trie depth {0} out of range (the k-mer word supports 1..=15)")]
    DepthOutOfRange(u32),
    #[error("trie-depth and trie-depth-rel are exclusive")]
    ConflictingDepth,
    #[error("trie-depth-rel needs a non-empty graph to work")]
    RelDepthNeedsGraph,
    #[error("unknown algorithm '{0}' (expected bfs, back_track, pbfs or node_bfs)")]
    UnknownAlgo(String),
    #[error("algorithm '{0}' cannot run over a subset of positions")]
    SubsetUnsupported(&'static str),
}

/// Fatal problems during index construction.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("too many live k-mers at location {0}")]
    TooManyKmers(u32),
}
