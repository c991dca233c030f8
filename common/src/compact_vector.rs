// A vector of B-bit unsigned values packed into u64 words. B does not have
// to divide 64, so a value may straddle two words; reads and writes always
// combine at most two words. The bit width is fixed before the first push.

/// Bit-packed vector of B-bit values.
#[derive(Debug, Default)]
pub struct CompactVector {
    data: Vec<u64>,
    bits: u32,
    mask: u64,
    len: usize,
}

const WORD_BITS: usize = 64;

impl CompactVector {
    /// Create an empty vector holding `bits`-wide values (1..=64).
    pub fn with_bits(bits: u32) -> Self {
        assert!(bits >= 1 && bits <= 64, "unsupported bit width {}", bits);
        let mask = if bits == 64 { !0u64 } else { (1u64 << bits) - 1 };
        CompactVector {
            data: Vec::new(),
            bits,
            mask,
            len: 0,
        }
    }

    /// Number of bits needed to store values up to and including `max_value`.
    pub fn bits_for(max_value: u64) -> u32 {
        (64 - max_value.leading_zeros()).max(1)
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn reserve(&mut self, additional: usize) {
        let words = Self::words_for(self.len + additional, self.bits);
        if words > self.data.capacity() {
            self.data.reserve(words - self.data.len());
        }
    }

    fn words_for(len: usize, bits: u32) -> usize {
        (len * bits as usize + WORD_BITS - 1) / WORD_BITS
    }

    #[inline(always)]
    fn addr(&self, idx: usize) -> (usize, usize) {
        let bit = idx * self.bits as usize;
        (bit / WORD_BITS, bit % WORD_BITS)
    }

    pub fn push(&mut self, value: u64) {
        let needed = Self::words_for(self.len + 1, self.bits);
        while self.data.len() < needed {
            self.data.push(0);
        }
        self.len += 1;
        self.set(self.len - 1, value);
    }

    /// Read the value at `idx`.
    #[inline]
    pub fn get(&self, idx: usize) -> u64 {
        debug_assert!(idx < self.len);
        let (word, off) = self.addr(idx);
        let mut val = self.data[word] >> off;
        if off + self.bits as usize > WORD_BITS {
            val |= self.data[word + 1] << (WORD_BITS - off);
        }
        val & self.mask
    }

    /// Overwrite the value at `idx`. Bits above the configured width are
    /// dropped.
    #[inline]
    pub fn set(&mut self, idx: usize, value: u64) {
        debug_assert!(idx < self.len);
        let (word, off) = self.addr(idx);
        let value = value & self.mask;
        self.data[word] &= !(self.mask << off);
        self.data[word] |= value << off;
        if off + self.bits as usize > WORD_BITS {
            let spill = WORD_BITS - off;
            self.data[word + 1] &= !(self.mask >> spill);
            self.data[word + 1] |= value >> spill;
        }
    }

    pub fn swap(&mut self, a: usize, b: usize) {
        if a != b {
            let tmp = self.get(a);
            self.set(a, self.get(b));
            self.set(b, tmp);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        (0..self.len).map(move |i| self.get(i))
    }

    /// In-place unstable sort. Generic slice sorts can not run over packed
    /// storage, so a small index-based introsort lives here: insertion sort
    /// for short ranges, Hoare partition above that.
    pub fn sort_unstable(&mut self) {
        if self.len > 1 {
            self.quicksort(0, self.len - 1);
        }
    }

    fn quicksort(&mut self, lo: usize, hi: usize) {
        let mut lo = lo;
        let mut hi = hi;
        loop {
            if hi - lo < 16 {
                self.insertion_sort(lo, hi);
                return;
            }
            let p = self.partition(lo, hi);
            // recurse into the smaller side, loop on the larger
            if p - lo < hi - p {
                self.quicksort(lo, p);
                lo = p + 1;
            } else {
                self.quicksort(p + 1, hi);
                hi = p;
            }
        }
    }

    fn insertion_sort(&mut self, lo: usize, hi: usize) {
        for i in lo + 1..=hi {
            let mut j = i;
            let val = self.get(i);
            while j > lo && self.get(j - 1) > val {
                self.set(j, self.get(j - 1));
                j -= 1;
            }
            self.set(j, val);
        }
    }

    fn partition(&mut self, lo: usize, hi: usize) -> usize {
        // median-of-three pivot
        let mid = lo + (hi - lo) / 2;
        let (a, b, c) = (self.get(lo), self.get(mid), self.get(hi));
        let pivot = if (a <= b) == (b <= c) {
            b
        } else if (b <= a) == (a <= c) {
            a
        } else {
            c
        };

        let mut i = lo;
        let mut j = hi;
        loop {
            while self.get(i) < pivot {
                i += 1;
            }
            while self.get(j) > pivot {
                j -= 1;
            }
            if i >= j {
                return j;
            }
            self.swap(i, j);
            i += 1;
            j -= 1;
        }
    }
}

impl Extend<u64> for CompactVector {
    fn extend<T: IntoIterator<Item = u64>>(&mut self, iter: T) {
        for v in iter {
            self.push(v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_push_get() {
        let mut cv = CompactVector::with_bits(3);
        for v in [1u64, 7, 0, 5, 2, 6] {
            cv.push(v);
        }
        let out: Vec<u64> = cv.iter().collect();
        assert_eq!(out, vec![1, 7, 0, 5, 2, 6]);
    }

    #[test]
    fn test_straddling_values() {
        // 13-bit values force straddles at word boundaries
        let mut cv = CompactVector::with_bits(13);
        let vals: Vec<u64> = (0..100).map(|i| (i * 83) % (1 << 13)).collect();
        for &v in &vals {
            cv.push(v);
        }
        let out: Vec<u64> = cv.iter().collect();
        assert_eq!(out, vals);
    }

    #[test]
    fn test_set_truncates_to_width() {
        let mut cv = CompactVector::with_bits(4);
        cv.push(0);
        cv.set(0, 0x1f);
        assert_eq!(cv.get(0), 0xf);
    }

    #[test]
    fn test_random_round_trip_many_widths() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        for bits in [1u32, 2, 5, 8, 12, 17, 31, 32, 33, 63, 64] {
            let max = if bits == 64 { u64::MAX } else { (1 << bits) - 1 };
            let vals: Vec<u64> = (0..257).map(|_| rng.gen::<u64>() & max).collect();
            let mut cv = CompactVector::with_bits(bits);
            cv.reserve(vals.len());
            for &v in &vals {
                cv.push(v);
            }
            let out: Vec<u64> = cv.iter().collect();
            assert_eq!(out, vals, "width {}", bits);
        }
    }

    #[test]
    fn test_sort() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(11);
        let mut vals: Vec<u64> = (0..500).map(|_| rng.gen_range(0..1 << 11)).collect();
        let mut cv = CompactVector::with_bits(11);
        for &v in &vals {
            cv.push(v);
        }
        cv.sort_unstable();
        vals.sort_unstable();
        let out: Vec<u64> = cv.iter().collect();
        assert_eq!(out, vals);
    }

    #[test]
    fn test_bits_for() {
        assert_eq!(CompactVector::bits_for(0), 1);
        assert_eq!(CompactVector::bits_for(1), 1);
        assert_eq!(CompactVector::bits_for(2), 2);
        assert_eq!(CompactVector::bits_for(255), 8);
        assert_eq!(CompactVector::bits_for(256), 9);
        assert_eq!(CompactVector::bits_for(u64::MAX), 64);
    }
}
