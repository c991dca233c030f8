// Shared container types used by the graph and trie crates. These are all
// plain integer containers tuned for the index build: bit-packed vectors,
// a diff-encoded sorted vector, a dual-column pair store and the CSR-style
// multimap they combine into.

pub mod compact_vector;
pub mod dense_multimap;
pub mod pow_histogram;
pub mod sorted_vector;
pub mod vector_pairs;

pub use compact_vector::CompactVector;
pub use dense_multimap::{DenseMultimap, IntStore};
pub use pow_histogram::PowHistogram;
pub use sorted_vector::SortedVector;
pub use vector_pairs::VectorPairs;
