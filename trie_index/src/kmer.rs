// Variable-length k-mers packed into one u32 word. The word carries, from
// the top: the on-mask bit (so an empty k-mer is distinguishable from a
// numeric zero), an incomplete flag, a two-tier length field, and the
// letters themselves with the oldest letter highest. Pushing into a
// complete k-mer rolls the oldest letter out.
//
// Two dense numberings exist: compress_leaf maps complete k-mers onto
// [0, 4^K), and compress maps k-mers of every length onto [0, BEG[K+1])
// level by level, with BEG precomputed in the settings.
//
// K and the on-mask are fixed once in KmerSettings, before any k-mer is
// created, and every operation takes the settings by reference.

use crate::error::ConfigError;
use gfa_graph::{base_to_bits, bits_to_base, Letter, LETTER_BITS, SIGMA};

/// Highest K representable in a u32 word with one bit kept for the
/// incomplete flag.
pub const MAX_K: u32 = (32 - 1) / LETTER_BITS;

const L2_MASK: u32 = 0x3;
const L3_MASK: u32 = 0x3f;

/// Process-wide k-mer parameters plus everything derived from them.
#[derive(Debug, Clone)]
pub struct KmerSettings {
    pub k: u32,
    pub on_mask: u32,
    kmer_mask: u32,
    l1_mask: u32,
    l2_shift: u32,
    l3_shift: u32,
    empty: u32,
    /// beg[l] = first compressed index of level l, for l in 0..=k+1.
    pub beg: Vec<u32>,
    pub num_leaves: u32,
    pub num_compressed: u32,
}

impl KmerSettings {
    /// The default on-mask: the top bit of the k-mer word.
    pub fn default_on_mask() -> u32 {
        1u32 << 31
    }

    pub fn from_depth(k: u32) -> Result<Self, ConfigError> {
        Self::with_on_mask(k, Self::default_on_mask())
    }

    pub fn with_on_mask(k: u32, on_mask: u32) -> Result<Self, ConfigError> {
        if k == 0 || k > MAX_K {
            return Err(ConfigError::DepthOutOfRange(k));
        }
        let l1_mask = 1u32 << (MAX_K * LETTER_BITS);
        let l2_shift = (MAX_K - 1) * LETTER_BITS;
        let l3_shift = (MAX_K - 4) * LETTER_BITS;
        let kmer_mask = letters_mask(k);
        let empty = if k > L2_MASK + 1 {
            on_mask | l1_mask | (L2_MASK << l2_shift) | ((k - L2_MASK - 1) << l3_shift)
        } else {
            on_mask | l1_mask | ((k - 1) << l2_shift)
        };

        let mut beg = Vec::with_capacity(k as usize + 2);
        let mut lvl_size: u64 = 1;
        let mut total: u64 = 0;
        for _ in 0..=k + 1 {
            beg.push(total as u32);
            total += lvl_size;
            lvl_size *= SIGMA as u64;
        }
        let num_compressed = beg[k as usize + 1];
        let num_leaves = (SIGMA as u64).pow(k) as u32;

        Ok(KmerSettings {
            k,
            on_mask,
            kmer_mask,
            l1_mask,
            l2_shift,
            l3_shift,
            empty,
            beg,
            num_leaves,
            num_compressed,
        })
    }

    /// Resolve the depth from the configuration surface: an absolute
    /// `trie-depth`, or `trie-depth-rel` relative to log4 of the graph
    /// size. The two are exclusive.
    pub fn from_config(
        num_locations: u32,
        trie_depth: u32,
        trie_depth_rel: i32,
        on_mask: Option<u32>,
    ) -> Result<Self, ConfigError> {
        if trie_depth != 0 && trie_depth_rel != 0 {
            return Err(ConfigError::ConflictingDepth);
        }
        if trie_depth == 0 && num_locations == 0 {
            return Err(ConfigError::RelDepthNeedsGraph);
        }
        let k = if trie_depth != 0 {
            trie_depth as i64
        } else {
            log4_ceil(num_locations as u64) as i64 + trie_depth_rel as i64
        };
        if k <= 0 || k > MAX_K as i64 {
            return Err(ConfigError::DepthOutOfRange(k.max(0) as u32));
        }
        Self::with_on_mask(k as u32, on_mask.unwrap_or_else(Self::default_on_mask))
    }
}

/// Smallest k with 4^k >= value.
pub fn log4_ceil(value: u64) -> u32 {
    let mut res = 0;
    let mut pow = 1u64;
    while pow < value {
        res += 1;
        pow *= 4;
    }
    res
}

#[inline(always)]
fn letters_mask(len: u32) -> u32 {
    (1u32 << (len * LETTER_BITS)) - 1
}

/// A bit-packed k-mer of length 0..=K.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Kmer {
    pub data: u32,
}

impl Kmer {
    pub fn empty(s: &KmerSettings) -> Kmer {
        Kmer { data: s.empty }
    }

    #[inline]
    pub fn is_complete(&self, s: &KmerSettings) -> bool {
        self.data & s.l1_mask == 0
    }

    #[inline]
    fn l2(&self, s: &KmerSettings) -> u32 {
        (self.data >> s.l2_shift) & L2_MASK
    }

    #[inline]
    fn l3(&self, s: &KmerSettings) -> u32 {
        (self.data >> s.l3_shift) & L3_MASK
    }

    fn set_l2(&mut self, s: &KmerSettings, l2: u32) {
        self.data &= !(L2_MASK << s.l2_shift);
        self.data |= l2 << s.l2_shift;
    }

    fn set_l3(&mut self, s: &KmerSettings, l3: u32) {
        self.data &= !(L3_MASK << s.l3_shift);
        self.data |= l3 << s.l3_shift;
    }

    /// Current length. The anti-length K - len is stored off by one in the
    /// primary field, overflowing into the secondary one.
    pub fn len(&self, s: &KmerSettings) -> u32 {
        if self.is_complete(s) {
            return s.k;
        }
        let l2 = self.l2(s);
        if l2 == L2_MASK {
            s.k - (1 + L2_MASK + self.l3(s))
        } else {
            s.k - (1 + l2)
        }
    }

    pub fn is_empty(&self, s: &KmerSettings) -> bool {
        self.len(s) == 0
    }

    /// Append one letter. A complete k-mer rolls: the oldest letter drops
    /// out and the length stays K.
    pub fn push(&mut self, l: Letter, s: &KmerSettings) {
        debug_assert!((l as u32) < SIGMA);
        if self.is_complete(s) {
            self.data = (((self.data << LETTER_BITS) | l as u32) & s.kmer_mask) | s.on_mask;
        } else {
            let mask = self.inc_len(s);
            self.data = (self.data & !mask) | (((self.data << LETTER_BITS) | l as u32) & mask);
        }
    }

    // Bump the length tag; returns the mask that will contain the letters
    // after the push.
    fn inc_len(&mut self, s: &KmerSettings) -> u32 {
        let l2 = self.l2(s);
        if l2 == L2_MASK {
            let l3 = self.l3(s);
            if l3 != 0 {
                self.set_l3(s, l3 - 1);
                return letters_mask(s.k - (1 + L2_MASK + (l3 - 1)));
            }
            // secondary tier exhausted, fall back to the primary field
        } else if l2 == 0 {
            self.data ^= s.l1_mask;
            return s.kmer_mask;
        }
        self.set_l2(s, l2 - 1);
        letters_mask(s.k - l2)
    }

    /// Remove the most recent letter. Does nothing at length 0.
    pub fn pop(&mut self, s: &KmerSettings) {
        let len = self.len(s);
        if len == 0 {
            return;
        }
        let mask = letters_mask(len);
        self.data = (self.data & !mask) | ((self.data & mask) >> LETTER_BITS);
        let alen = s.k - len;
        if alen == 0 {
            self.data |= s.l1_mask;
        } else if alen <= L2_MASK {
            self.set_l2(s, alen);
        } else {
            self.set_l3(s, alen - L2_MASK);
        }
    }

    /// The i-th letter from the front (oldest first).
    pub fn get(&self, i: u32, s: &KmerSettings) -> Letter {
        debug_assert!(i < self.len(s));
        ((self.data >> ((self.len(s) - 1 - i) * LETTER_BITS)) & 0x3) as Letter
    }

    /// Dense index of a complete k-mer in [0, 4^K).
    pub fn compress_leaf(&self, s: &KmerSettings) -> u32 {
        debug_assert!(self.is_complete(s));
        self.data & s.kmer_mask
    }

    pub fn from_compressed_leaf(h: u32, s: &KmerSettings) -> Kmer {
        Kmer {
            data: s.on_mask | (h & s.kmer_mask),
        }
    }

    /// Dense index across all levels, in [0, BEG[K+1]).
    pub fn compress(&self, s: &KmerSettings) -> u32 {
        let len = self.len(s);
        s.beg[len as usize] + (self.data & letters_mask(len))
    }

    pub fn from_compressed(h: u32, s: &KmerSettings) -> Kmer {
        let len = s.beg[..=s.k as usize].partition_point(|&b| b <= h) as u32 - 1;
        let mut kmer = Kmer {
            data: s.on_mask | ((h - s.beg[len as usize]) & letters_mask(len)),
        };
        kmer.set_len(s, len);
        kmer
    }

    fn set_len(&mut self, s: &KmerSettings, len: u32) {
        let alen = s.k - len;
        if alen == 0 {
            // complete: the incomplete flag is already clear
        } else if alen <= L2_MASK {
            self.data |= s.l1_mask;
            self.set_l2(s, alen - 1);
        } else {
            self.data |= s.l1_mask;
            self.set_l2(s, L2_MASK);
            self.set_l3(s, alen - L2_MASK - 1);
        }
    }

    pub fn from_letters(letters: impl IntoIterator<Item = Letter>, s: &KmerSettings) -> Kmer {
        let mut kmer = Kmer::empty(s);
        for l in letters {
            kmer.push(l, s);
        }
        kmer
    }

    /// Parse from an ACGT string; only usable with valid bases.
    pub fn from_str(text: &str, s: &KmerSettings) -> Kmer {
        Kmer::from_letters(
            text.bytes().map(|c| {
                let b = base_to_bits(c);
                assert!(b < 4, "invalid letter '{}'", c as char);
                b
            }),
            s,
        )
    }

    pub fn letters<'a>(&self, s: &'a KmerSettings) -> impl Iterator<Item = Letter> + 'a {
        let kmer = *self;
        (0..self.len(s)).map(move |i| kmer.get(i, s))
    }

    pub fn to_str(&self, s: &KmerSettings) -> String {
        self.letters(s).map(bits_to_base).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn s4() -> KmerSettings {
        KmerSettings::from_depth(4).unwrap()
    }

    #[test]
    fn test_settings_levels() {
        let s = s4();
        assert_eq!(s.beg, vec![0, 1, 5, 21, 85, 341]);
        assert_eq!(s.num_leaves, 256);
        assert_eq!(s.num_compressed, 341);
        assert!(KmerSettings::from_depth(0).is_err());
        assert!(KmerSettings::from_depth(MAX_K + 1).is_err());
        assert!(KmerSettings::from_depth(MAX_K).is_ok());
    }

    #[test]
    fn test_from_config() {
        // 4^3 < 100 <= 4^4
        let s = KmerSettings::from_config(100, 0, 0, None).unwrap();
        assert_eq!(s.k, 4);
        let s = KmerSettings::from_config(100, 0, 2, None).unwrap();
        assert_eq!(s.k, 6);
        let s = KmerSettings::from_config(100, 9, 0, None).unwrap();
        assert_eq!(s.k, 9);
        assert!(KmerSettings::from_config(100, 9, 1, None).is_err());
        assert!(KmerSettings::from_config(0, 0, 1, None).is_err());
    }

    #[test]
    fn test_push_pop_lengths() {
        // k = 8 exercises both length tiers
        let s = KmerSettings::from_depth(8).unwrap();
        let mut kmer = Kmer::empty(&s);
        assert_eq!(kmer.len(&s), 0);
        assert!(!kmer.is_complete(&s));
        for i in 0..8u32 {
            kmer.push((i % 4) as u8, &s);
            assert_eq!(kmer.len(&s), i + 1);
        }
        assert!(kmer.is_complete(&s));
        for i in (0..8u32).rev() {
            kmer.pop(&s);
            assert_eq!(kmer.len(&s), i);
        }
        assert_eq!(kmer, Kmer::empty(&s));
        // popping an empty k-mer is a no-op
        kmer.pop(&s);
        assert_eq!(kmer, Kmer::empty(&s));
    }

    #[test]
    fn test_ring_roll() {
        let s = s4();
        let mut kmer = Kmer::from_str("acgt", &s);
        kmer.push(0, &s); // rolls 'a' out
        assert_eq!(kmer.to_str(&s), "cgta");
        assert_eq!(kmer.len(&s), 4);
        kmer.push(3, &s);
        assert_eq!(kmer.to_str(&s), "gtat");
    }

    #[test]
    fn test_indexing() {
        let s = s4();
        let kmer = Kmer::from_str("acg", &s);
        assert_eq!(kmer.get(0, &s), 0);
        assert_eq!(kmer.get(1, &s), 1);
        assert_eq!(kmer.get(2, &s), 2);
        assert_eq!(kmer.to_str(&s), "acg");
    }

    #[test]
    fn test_leaf_compress_round_trip() {
        let s = s4();
        let kmer = Kmer::from_str("acgt", &s);
        assert_eq!(kmer.compress_leaf(&s), 0b00_01_10_11);
        for h in 0..s.num_leaves {
            let k = Kmer::from_compressed_leaf(h, &s);
            assert!(k.is_complete(&s));
            assert_eq!(k.compress_leaf(&s), h);
        }
    }

    #[test]
    fn test_compress_round_trip_all_levels() {
        for depth in [1u32, 3, 4, 8, 15] {
            let s = KmerSettings::from_depth(depth).unwrap();
            for h in 0..s.num_compressed.min(6000) {
                let kmer = Kmer::from_compressed(h, &s);
                assert_eq!(kmer.compress(&s), h, "depth {} index {}", depth, h);
            }
            // the empty k-mer is index 0
            assert_eq!(Kmer::empty(&s).compress(&s), 0);
        }
    }

    #[test]
    fn test_compress_matches_letters() {
        let s = s4();
        // "cg" is at level 2: beg[2] + (1*4 + 2)
        let kmer = Kmer::from_str("cg", &s);
        assert_eq!(kmer.compress(&s), 5 + 6);
        let back = Kmer::from_compressed(11, &s);
        assert_eq!(back.to_str(&s), "cg");
    }

    #[test]
    fn test_push_pop_random_walk() {
        use rand::{Rng, SeedableRng};
        let mut rng = rand::rngs::StdRng::seed_from_u64(29);
        for depth in [2u32, 4, 7, 15] {
            let s = KmerSettings::from_depth(depth).unwrap();
            let mut kmer = Kmer::empty(&s);
            let mut model: Vec<u8> = Vec::new();
            for _ in 0..2000 {
                if !model.is_empty() && rng.gen_bool(0.4) {
                    kmer.pop(&s);
                    model.pop();
                } else {
                    let l = rng.gen_range(0..4u8);
                    kmer.push(l, &s);
                    if model.len() == depth as usize {
                        model.remove(0);
                    }
                    model.push(l);
                }
                assert_eq!(kmer.len(&s) as usize, model.len());
                let letters: Vec<u8> = kmer.letters(&s).collect();
                assert_eq!(letters, model);
            }
        }
    }
}
