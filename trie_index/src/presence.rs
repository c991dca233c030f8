// One bit per inner trie node, set iff some indexed leaf descends from it.
// Built in two passes: mark the parents of the indexed k-mers, then sweep
// the levels bottom-up, marking every node with a marked child.

use crate::kmer::{Kmer, KmerSettings};
use bit_set::BitSet;
use log::debug;

#[derive(Debug)]
pub struct TriePresence {
    present: BitSet,
}

impl TriePresence {
    /// Build from the indexed k-mers. With `allow_inner`, keys shorter
    /// than K mark their own bit; complete keys always mark their parent.
    pub fn new(
        s: &KmerSettings,
        allow_inner: bool,
        keys: impl IntoIterator<Item = Kmer>,
    ) -> Self {
        let table = s.beg[s.k as usize] as usize;
        let mut present = BitSet::with_capacity(table);

        for mut kmer in keys {
            if allow_inner && kmer.len(s) < s.k {
                present.insert(kmer.compress(s) as usize);
            } else {
                kmer.pop(s);
                present.insert(kmer.compress(s) as usize);
            }
        }

        // propagate upward from the last-but-one level
        for lvl in (0..s.k.saturating_sub(1)).rev() {
            let lvl_beg = s.beg[lvl as usize];
            let lvl_end = s.beg[lvl as usize + 1];
            let child_beg = lvl_end;
            for pos in lvl_beg..lvl_end {
                if allow_inner && present.contains(pos as usize) {
                    continue;
                }
                let child_base = child_beg + ((pos - lvl_beg) << 2);
                for c in 0..4u32 {
                    if present.contains((child_base + c) as usize) {
                        present.insert(pos as usize);
                        break;
                    }
                }
            }
        }
        debug!("presence bitset: {} of {} bits set", present.len(), table);

        TriePresence { present }
    }

    /// Whether the inner trie node named by `kmer` has any indexed
    /// descendant. Only meaningful for k-mers shorter than K.
    pub fn contains(&self, kmer: Kmer, s: &KmerSettings) -> bool {
        self.present.contains(kmer.compress(s) as usize)
    }
}
