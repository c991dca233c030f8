// The four pair producers. Each walks the graph its own way and emits
// (compressed k-mer, letter location) pairs into a shared VectorPairs;
// duplicates are fine, the trie data build sorts and dedups. For a fixed
// graph and depth all four agree on the final pair multiset.

pub mod back_track;
pub mod lbfs;
pub mod node_bfs;
pub mod pbfs;

use crate::error::ConfigError;
use crate::kmer::Kmer;
use smallvec::SmallVec;
use std::collections::HashSet;
use std::str::FromStr;

pub use back_track::TrieBuilderBt;
pub use lbfs::TrieBuilderLbfs;
pub use node_bfs::TrieBuilderNbfs;
pub use pbfs::TrieBuilderPbfs;

/// Builder selection by name, as configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgoKind {
    Lbfs,
    BackTrack,
    Pbfs,
    NodeBfs,
}

impl FromStr for AlgoKind {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, ConfigError> {
        match name {
            "bfs" => Ok(AlgoKind::Lbfs),
            "back_track" => Ok(AlgoKind::BackTrack),
            "pbfs" => Ok(AlgoKind::Pbfs),
            "node_bfs" => Ok(AlgoKind::NodeBfs),
            other => Err(ConfigError::UnknownAlgo(other.to_string())),
        }
    }
}

/// Per-slot live k-mer lists for the BFS builders. Small lists stay in a
/// small vector and are scanned linearly; past the cutoff a hash set takes
/// over membership checks.
pub(crate) struct KmerLists {
    kmers: Vec<SmallVec<[Kmer; 2]>>,
    sets: Vec<HashSet<Kmer>>,
    pub done: Vec<u32>,
    cutoff: usize,
}

impl KmerLists {
    pub fn new(slots: usize, cutoff: u32) -> Self {
        KmerLists {
            kmers: vec![SmallVec::new(); slots],
            sets: vec![HashSet::new(); slots],
            done: vec![0; slots],
            cutoff: cutoff.max(1) as usize,
        }
    }

    pub fn exists(&self, slot: usize, kmer: Kmer) -> bool {
        let list = &self.kmers[slot];
        if list.len() >= self.cutoff {
            self.sets[slot].contains(&kmer)
        } else {
            list.contains(&kmer)
        }
    }

    /// Append; returns the new count at the slot.
    pub fn add(&mut self, slot: usize, kmer: Kmer) -> usize {
        let list = &mut self.kmers[slot];
        list.push(kmer);
        if list.len() == self.cutoff {
            let set = &mut self.sets[slot];
            set.extend(list.iter().copied());
        } else if list.len() > self.cutoff {
            self.sets[slot].insert(kmer);
        }
        list.len()
    }

    pub fn num(&self, slot: usize) -> usize {
        self.kmers[slot].len()
    }

    pub fn get(&self, slot: usize, idx: usize) -> Kmer {
        self.kmers[slot][idx]
    }
}
