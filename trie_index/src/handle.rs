// A handle names a position in the combined structure: a trie node (by
// its k-mer) or a graph letter position, with an explicit invalid state.
// Edit edges are single-letter transitions between handles.

use crate::kmer::Kmer;
use gfa_graph::{Letter, NodePos};

/// Tagged position: trie k-mer, graph letter position, or invalid.
/// Ordering puts all trie handles before all graph handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Handle {
    Trie(Kmer),
    Graph(NodePos),
    Invalid,
}

impl Handle {
    pub fn invalid() -> Handle {
        Handle::Invalid
    }

    pub fn graph(node: u32, pos: u32) -> Handle {
        Handle::Graph(NodePos::new(node, pos))
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, Handle::Invalid)
    }

    pub fn is_trie(&self) -> bool {
        matches!(self, Handle::Trie(_))
    }

    pub fn is_graph(&self) -> bool {
        matches!(self, Handle::Graph(_))
    }

    pub fn kmer(&self) -> Option<Kmer> {
        match self {
            Handle::Trie(k) => Some(*k),
            _ => None,
        }
    }

    pub fn nodepos(&self) -> Option<NodePos> {
        match self {
            Handle::Graph(np) => Some(*np),
            _ => None,
        }
    }
}

/// The kind of a single-letter transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EditKind {
    Match,
    Sub,
    Ins,
    Del,
}

/// One edit transition: where it leads, what it does, and with which
/// letter (EPS for deletions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EditEdge {
    pub target: Handle,
    pub kind: EditKind,
    pub letter: Letter,
}

impl EditEdge {
    pub fn new(target: Handle, kind: EditKind, letter: Letter) -> Self {
        EditEdge {
            target,
            kind,
            letter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kmer::KmerSettings;

    #[test]
    fn test_accessors() {
        let s = KmerSettings::from_depth(4).unwrap();
        let t = Handle::Trie(Kmer::from_str("ac", &s));
        let g = Handle::graph(3, 1);
        let i = Handle::invalid();
        assert!(t.is_trie() && t.is_valid() && !t.is_graph());
        assert!(g.is_graph() && g.is_valid() && !g.is_trie());
        assert!(!i.is_valid());
        assert_eq!(g.nodepos(), Some(NodePos::new(3, 1)));
        assert_eq!(t.nodepos(), None);
        assert!(t.kmer().is_some());
    }

    #[test]
    fn test_ordering_trie_before_graph() {
        let s = KmerSettings::from_depth(4).unwrap();
        let t = Handle::Trie(Kmer::from_str("tttt", &s));
        let g = Handle::graph(0, 0);
        assert!(t < g);
        assert!(g < Handle::invalid());
    }
}
