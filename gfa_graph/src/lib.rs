// DNA alphabet codec, bit-packed sequences and the variation graph those
// sequences hang off of. The graph is read from GFA or FASTA; reverse
// complement twin nodes and single-letter extend sinks can be synthesised
// on top of the parsed input.

use thiserror::Error;

pub mod connected;
pub mod dna_string;
pub mod graph;
pub mod letter_loc;
pub mod top_order;

pub use dna_string::{DnaSlice, DnaString};
pub use graph::{Graph, GraphSettings, NodeId};
pub use letter_loc::{LetterLoc, LetterLocData, NodePos};

/// A 2-bit encoded base. 0,1,2,3 = a,c,g,t.
pub type Letter = u8;

/// Alphabet size.
pub const SIGMA: u32 = 4;
/// Bits per stored letter.
pub const LETTER_BITS: u32 = 2;
/// Low-bit mask of one letter.
pub const LETTER_MASK: u64 = 0x3;
/// Sentinel letter labelling deletion edges. Never stored in sequences.
pub const EPS: Letter = 4;

/// Convert an ASCII base to its 2-bit representation. Anything that is not
/// ACGT (either case) maps to 4, which sequences reject as invalid.
#[inline]
pub fn base_to_bits(c: u8) -> u8 {
    match c {
        b'A' | b'a' => 0u8,
        b'C' | b'c' => 1u8,
        b'G' | b'g' => 2u8,
        b'T' | b't' => 3u8,
        _ => 4u8,
    }
}

#[inline]
pub fn is_valid_base(c: u8) -> bool {
    matches!(c, b'A' | b'C' | b'G' | b'T' | b'a' | b'c' | b'g' | b't')
}

/// Convert a 2-bit base back to a char. EPS renders as 'E'.
#[inline]
pub fn bits_to_base(b: u8) -> char {
    match b {
        0u8 => 'a',
        1u8 => 'c',
        2u8 => 'g',
        3u8 => 't',
        _ => 'E',
    }
}

/// The complement of a 2-bit encoded base.
#[inline(always)]
pub fn complement(base: u8) -> u8 {
    (!base) & 0x3u8
}

/// Errors raised while reading or assembling a graph.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("invalid letter '{0}' in sequence")]
    InvalidLetter(char),
    #[error("unknown record type '{0}' in graph file")]
    UnknownRecord(char),
    #[error("malformed {0} record")]
    MalformedRecord(&'static str),
    #[error("link overlap '{0}' not supported, only 0M")]
    NonZeroOverlap(String),
    #[error("link references unknown segment '{0}'")]
    UnknownSegment(String),
    #[error("link directions {0}{1} need reverse-complement nodes, which are disabled")]
    DirectionMismatch(char, char),
    #[error("unsupported graph file extension: {0}")]
    UnknownFormat(String),
    #[error("graph contains no nodes")]
    EmptyGraph,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
