// The bidirectional k-mer <-> letter-location multimap. Both directions
// are CSR multimaps with diff-encoded starts and bit-packed elements; a
// presence bitset summarises which inner trie nodes lead anywhere.
//
// Keys are compressed k-mer indices: leaf compression when only complete
// k-mers are indexed, full compression when inner k-mers are allowed
// (the pbfs cut-early path produces those).

use crate::kmer::{Kmer, KmerSettings};
use crate::presence::TriePresence;
use common::{CompactVector, DenseMultimap, PowHistogram, SortedVector, VectorPairs};
use gfa_graph::LetterLoc;
use log::{debug, info};
use std::fmt;

/// Converts between k-mers and the integer keys stored in the maps.
#[derive(Debug, Clone, Copy)]
pub struct KmerCodec {
    pub allow_inner: bool,
}

impl KmerCodec {
    pub fn new(allow_inner: bool) -> Self {
        KmerCodec { allow_inner }
    }

    #[inline]
    pub fn to_int(&self, kmer: Kmer, s: &KmerSettings) -> u32 {
        if self.allow_inner {
            kmer.compress(s)
        } else {
            kmer.compress_leaf(s)
        }
    }

    #[inline]
    pub fn to_ext(&self, h: u32, s: &KmerSettings) -> Kmer {
        if self.allow_inner {
            Kmer::from_compressed(h, s)
        } else {
            Kmer::from_compressed_leaf(h, s)
        }
    }

    /// Total number of representable keys.
    pub fn key_space(&self, s: &KmerSettings) -> u32 {
        if self.allow_inner {
            s.num_compressed
        } else {
            s.num_leaves
        }
    }
}

/// Which construction path to use. All three produce identical maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrieDataImpl {
    /// fwd-sort, build t2g, rev-sort, build g2t.
    Simple,
    /// rev-sort first, build g2t from the columns, then fwd-sort for t2g.
    #[default]
    DualDense,
    /// rev-sort once; derive the t2g side through a sort permutation and
    /// binary searches over the g2t starts, so the only transient
    /// allocation is the permutation array.
    ZeroOverhead,
}

type Map = DenseMultimap<SortedVector, CompactVector>;

pub struct TrieData {
    trie2graph: Map,
    graph2trie: Map,
    presence: TriePresence,
    codec: KmerCodec,
    settings: KmerSettings,
}

impl TrieData {
    /// Consume a pair set (compressed k-mer, letter location) and build
    /// both map directions plus the presence bitset. `num_locations` is
    /// the graph letter count; locations up to and including it appear
    /// (the end-of-graph pseudo location).
    pub fn new(
        mut pairs: VectorPairs<u32, LetterLoc>,
        num_locations: LetterLoc,
        settings: &KmerSettings,
        allow_inner: bool,
        impl_kind: TrieDataImpl,
    ) -> TrieData {
        let codec = KmerCodec::new(allow_inner);
        let kmer_bits = CompactVector::bits_for(codec.key_space(settings).saturating_sub(1) as u64);
        let loc_bits = CompactVector::bits_for(num_locations as u64);

        let (trie2graph, graph2trie) = match impl_kind {
            TrieDataImpl::Simple => {
                debug!("trie data: simple build over {} pairs", pairs.len());
                pairs.sort_by_fwd();
                pairs.unique();
                let t2g = DenseMultimap::build(
                    SortedVector::new(),
                    CompactVector::with_bits(loc_bits),
                    pairs.iter_fwd(),
                );
                pairs.sort_by_rev();
                let g2t = DenseMultimap::build(
                    SortedVector::new(),
                    CompactVector::with_bits(kmer_bits),
                    pairs.iter_rev(),
                );
                (t2g, g2t)
            }
            TrieDataImpl::DualDense => {
                debug!("trie data: dual-dense build over {} pairs", pairs.len());
                pairs.sort_by_rev();
                pairs.unique();
                let g2t = DenseMultimap::build(
                    SortedVector::new(),
                    CompactVector::with_bits(kmer_bits),
                    pairs.iter_rev(),
                );
                pairs.sort_by_fwd();
                let t2g = DenseMultimap::build(
                    SortedVector::new(),
                    CompactVector::with_bits(loc_bits),
                    pairs.iter_fwd(),
                );
                (t2g, g2t)
            }
            TrieDataImpl::ZeroOverhead => {
                debug!("trie data: zero-overhead build over {} pairs", pairs.len());
                pairs.sort_by_rev();
                pairs.unique();
                let (kmers, locs) = pairs.take_columns();

                let g2t = DenseMultimap::build(
                    SortedVector::new(),
                    CompactVector::with_bits(kmer_bits),
                    locs.iter().copied().zip(kmers.iter().copied()),
                );
                drop(locs); // run boundaries live on in the g2t starts

                // the permutation that fwd-sorts the k-mer column; ties
                // keep index order, which is ascending location
                let mut perm: Vec<u32> = (0..kmers.len() as u32).collect();
                perm.sort_unstable_by_key(|&i| (kmers[i as usize], i));

                let mut t_starts = SortedVector::new();
                let mut pos = 0u32;
                for &i in &perm {
                    let key = kmers[i as usize];
                    while t_starts.len() <= key as usize {
                        t_starts.push(pos);
                    }
                    pos += 1;
                }
                t_starts.push(pos);
                drop(kmers);

                // rewrite the permutation in place into locations
                let g_starts = g2t.starts();
                for slot in perm.iter_mut() {
                    *slot = g_starts.binary_search(*slot) as u32;
                }
                let mut t_elems = CompactVector::with_bits(loc_bits);
                t_elems.reserve(perm.len());
                t_elems.extend(perm.iter().map(|&l| l as u64));

                (DenseMultimap::from_parts(t_starts, t_elems), g2t)
            }
        };

        let presence = TriePresence::new(
            settings,
            allow_inner,
            trie2graph.keys().map(|h| codec.to_ext(h, settings)),
        );
        info!(
            "trie data built: {} pairs, {} distinct k-mers, {} distinct locations",
            trie2graph.len(),
            trie2graph.keys().count(),
            graph2trie.keys().count(),
        );

        TrieData {
            trie2graph,
            graph2trie,
            presence,
            codec,
            settings: settings.clone(),
        }
    }

    pub fn settings(&self) -> &KmerSettings {
        &self.settings
    }

    pub fn num_pairs(&self) -> usize {
        self.trie2graph.len()
    }

    /// Locations a k-mer anchors to.
    pub fn t2g_values_for(&self, kmer: Kmer) -> impl Iterator<Item = LetterLoc> + '_ {
        self.trie2graph
            .values_for(self.codec.to_int(kmer, &self.settings))
    }

    pub fn t2g_contains(&self, kmer: Kmer) -> bool {
        self.trie2graph
            .contains(self.codec.to_int(kmer, &self.settings))
    }

    /// K-mers terminating at a location.
    pub fn g2t_values_for(&self, loc: LetterLoc) -> impl Iterator<Item = Kmer> + '_ {
        self.graph2trie
            .values_for(loc)
            .map(move |h| self.codec.to_ext(h, &self.settings))
    }

    pub fn g2t_contains(&self, loc: LetterLoc) -> bool {
        self.graph2trie.contains(loc)
    }

    pub fn trie_inner_contains(&self, kmer: Kmer) -> bool {
        self.presence.contains(kmer, &self.settings)
    }

    /// Presence at any depth: the leaf table for complete k-mers, the
    /// presence bitset for inner ones.
    pub fn trie_contains(&self, kmer: Kmer) -> bool {
        if kmer.is_complete(&self.settings) {
            self.t2g_contains(kmer)
        } else {
            self.trie_inner_contains(kmer)
        }
    }

    /// All (k-mer, location) pairs in key order.
    pub fn iter_pairs(&self) -> impl Iterator<Item = (Kmer, LetterLoc)> + '_ {
        self.trie2graph
            .iter()
            .map(move |(h, loc)| (self.codec.to_ext(h, &self.settings), loc))
    }

    /// All (location, k-mer) pairs in location order.
    pub fn iter_rev_pairs(&self) -> impl Iterator<Item = (LetterLoc, Kmer)> + '_ {
        self.graph2trie
            .iter()
            .map(move |(loc, h)| (loc, self.codec.to_ext(h, &self.settings)))
    }

    pub fn stats(&self) -> TrieStats {
        TrieStats {
            num_pairs: self.trie2graph.len(),
            num_kmers: self.trie2graph.keys().count(),
            num_locs: self.graph2trie.keys().count(),
        }
    }

    /// Distribution of per-k-mer run lengths.
    pub fn t2g_histogram(&self) -> PowHistogram {
        PowHistogram::new(
            self.trie2graph
                .keys()
                .map(|k| self.trie2graph.values_for(k).len() as u64),
        )
    }

    /// Distribution of per-location run lengths.
    pub fn g2t_histogram(&self) -> PowHistogram {
        PowHistogram::new(
            self.graph2trie
                .keys()
                .map(|k| self.graph2trie.values_for(k).len() as u64),
        )
    }
}

pub struct TrieStats {
    pub num_pairs: usize,
    pub num_kmers: usize,
    pub num_locs: usize,
}

impl fmt::Display for TrieStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "pairs: {} / kmers: {} / locs: {} / ff: {:.3}",
            self.num_pairs,
            self.num_kmers,
            self.num_locs,
            self.num_kmers as f64 / self.num_locs.max(1) as f64
        )
    }
}
