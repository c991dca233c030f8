// The trie side of the index: k-mers and their settings, the
// bidirectional trie data, the four pair builders, the complexity
// machinery that partitions the graph between them, and the TrieGraph
// facade with its edit-edge traversal.

pub mod builders;
pub mod complexity;
pub mod edge_iter;
pub mod error;
pub mod handle;
pub mod kmer;
pub mod presence;
pub mod prev_iter;
pub mod trie_data;
pub mod triegraph;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use edge_iter::EditEdgeIter;
pub use error::{BuildError, ConfigError};
pub use handle::{EditEdge, EditKind, Handle};
pub use kmer::{Kmer, KmerSettings, MAX_K};
pub use presence::TriePresence;
pub use trie_data::{KmerCodec, TrieData, TrieDataImpl};
pub use triegraph::{TrieGraph, TrieGraphData};
