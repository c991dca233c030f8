// A 2-bit packed DNA sequence. Letters pack LSB-first into u64 blocks, 32
// letters per block, so letter i lives at bits (2i % 64) of block (i / 32).
// Slices are (base, start, length) views over a parent string and carry a
// word-accelerated longest-common-prefix match that works at any alignment.

use crate::{base_to_bits, bits_to_base, complement, GraphError, LETTER_MASK};
use std::fmt;

const WIDTH: usize = 2;
const BLOCK_LETTERS: usize = 32;

/// A container for a sequence of DNA bases.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct DnaString {
    storage: Vec<u64>,
    len: usize,
}

impl DnaString {
    /// Create an empty DNA string.
    pub fn new() -> DnaString {
        DnaString {
            storage: Vec::new(),
            len: 0,
        }
    }

    /// Create a new instance with a given capacity in letters.
    pub fn with_capacity(n: usize) -> Self {
        DnaString {
            storage: Vec::with_capacity((n + BLOCK_LETTERS - 1) / BLOCK_LETTERS),
            len: 0,
        }
    }

    /// Length of the sequence in letters.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Parse an ACGT string. Anything else is an invalid-letter error.
    pub fn from_dna_str(dna: &str) -> Result<DnaString, GraphError> {
        let mut s = DnaString::with_capacity(dna.len());
        for c in dna.chars() {
            let b = base_to_bits(c as u8);
            if b >= 4 {
                return Err(GraphError::InvalidLetter(c));
            }
            s.push(b);
        }
        Ok(s)
    }

    /// Create a DnaString from 0-3 encoded bytes.
    pub fn from_bytes(bytes: &[u8]) -> DnaString {
        let mut s = DnaString::with_capacity(bytes.len());
        for &b in bytes {
            s.push(b);
        }
        s
    }

    #[inline(always)]
    fn addr(i: usize) -> (usize, usize) {
        let bit = i * WIDTH;
        (bit / 64, bit % 64)
    }

    /// Append a 0-3 encoded base.
    #[inline]
    pub fn push(&mut self, value: u8) {
        debug_assert!(value < 4);
        let (block, bit) = Self::addr(self.len);
        if bit == 0 {
            self.storage.push(0);
        }
        self.storage[block] |= (value as u64) << bit;
        self.len += 1;
    }

    /// Get the base at position `i`.
    #[inline(always)]
    pub fn get(&self, i: usize) -> u8 {
        debug_assert!(i < self.len);
        let (block, bit) = Self::addr(i);
        ((self.storage[block] >> bit) & LETTER_MASK) as u8
    }

    pub fn front(&self) -> u8 {
        self.get(0)
    }

    pub fn back(&self) -> u8 {
        self.get(self.len - 1)
    }

    /// Iterate over stored bases (unpacked into bytes).
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..self.len).map(move |i| self.get(i))
    }

    /// The reverse complement of the string.
    pub fn rc(&self) -> DnaString {
        let mut out = DnaString::with_capacity(self.len);
        for i in (0..self.len).rev() {
            out.push(complement(self.get(i)));
        }
        out
    }

    /// Up to 32 letters starting at `pos`, packed LSB-first; the caller
    /// masks to the count it wants. Correct for any bit alignment.
    #[inline]
    fn window(&self, pos: usize) -> u64 {
        let (block, bit) = Self::addr(pos);
        let mut w = self.storage[block] >> bit;
        if bit > 0 && block + 1 < self.storage.len() {
            w |= self.storage[block + 1] << (64 - bit);
        }
        w
    }

    /// View of the interval [`start`, `end`).
    pub fn slice(&self, start: usize, end: usize) -> DnaSlice<'_> {
        assert!(start <= end && end <= self.len, "slice out of bounds");
        DnaSlice {
            dna_string: self,
            start,
            length: end - start,
        }
    }

    /// The length `k` prefix.
    pub fn prefix(&self, k: usize) -> DnaSlice<'_> {
        self.slice(0, k)
    }

    /// The length `k` suffix.
    pub fn suffix(&self, k: usize) -> DnaSlice<'_> {
        self.slice(self.len - k, self.len)
    }

    pub fn as_slice(&self) -> DnaSlice<'_> {
        self.slice(0, self.len)
    }
}

impl fmt::Display for DnaString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for v in self.iter() {
            write!(f, "{}", bits_to_base(v))?;
        }
        Ok(())
    }
}

impl fmt::Debug for DnaString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Extend<u8> for DnaString {
    fn extend<T: IntoIterator<Item = u8>>(&mut self, iter: T) {
        for b in iter {
            self.push(b);
        }
    }
}

/// An immutable view into a DnaString.
#[derive(Clone, Copy)]
pub struct DnaSlice<'a> {
    pub dna_string: &'a DnaString,
    pub start: usize,
    pub length: usize,
}

impl<'a> DnaSlice<'a> {
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Get the base at position `i` of the view.
    #[inline(always)]
    pub fn get(&self, i: usize) -> u8 {
        debug_assert!(i < self.length);
        self.dna_string.get(self.start + i)
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + 'a {
        let s = *self;
        (0..s.length).map(move |i| s.get(i))
    }

    /// Length of the longest common prefix of the two views. Compares 32
    /// letters per step via XOR regardless of how either view is aligned
    /// within its storage words.
    pub fn fast_match(&self, other: &DnaSlice) -> usize {
        let n = self.length.min(other.length);
        let mut i = 0;
        while i < n {
            let chunk = (n - i).min(BLOCK_LETTERS);
            let a = self.dna_string.window(self.start + i);
            let b = other.dna_string.window(other.start + i);
            let mask = if chunk == BLOCK_LETTERS {
                !0u64
            } else {
                (1u64 << (chunk * WIDTH)) - 1
            };
            let diff = (a ^ b) & mask;
            if diff != 0 {
                return i + diff.trailing_zeros() as usize / WIDTH;
            }
            i += chunk;
        }
        n
    }

    pub fn to_owned(&self) -> DnaString {
        let mut s = DnaString::with_capacity(self.length);
        s.extend(self.iter());
        s
    }
}

impl<'a> PartialEq for DnaSlice<'a> {
    fn eq(&self, other: &DnaSlice) -> bool {
        self.length == other.length && self.fast_match(other) == self.length
    }
}

impl<'a> Eq for DnaSlice<'a> {}

impl<'a> fmt::Display for DnaSlice<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for v in self.iter() {
            write!(f, "{}", bits_to_base(v))?;
        }
        Ok(())
    }
}

impl<'a> fmt::Debug for DnaSlice<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
