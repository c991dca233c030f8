// Letter locations: every letter of every node gets one integer name.
// compress/expand convert between (node, offset) pairs and those names via
// per-node prefix sums; a small skip index over loc >> shift keeps the
// expand binary search short.

use crate::graph::{Graph, NodeId};
use std::fmt;

pub type LetterLoc = u32;

/// A (node, offset) position in the graph. Ordered node first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodePos {
    pub node: NodeId,
    pub pos: u32,
}

impl NodePos {
    pub fn new(node: NodeId, pos: u32) -> Self {
        NodePos { node, pos }
    }

    /// The same letter on the reverse-complement twin node. Only meaningful
    /// when the graph was built with twins adjacent at id ^ 1.
    pub fn reverse(&self, graph: &Graph) -> NodePos {
        let len = graph.node(self.node).seg.len() as u32;
        NodePos::new(self.node ^ 1, len - 1 - self.pos)
    }
}

impl fmt::Display for NodePos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.node, self.pos)
    }
}

const DEFAULT_IDX_SHIFT: u32 = 4;

/// Bijection between letter locations [0, num_locations) and node positions.
#[derive(Debug)]
pub struct LetterLocData {
    node_start: Vec<LetterLoc>,
    pub num_locations: LetterLoc,
    index: Vec<NodeId>,
    shift: u32,
}

impl LetterLocData {
    pub fn new(graph: &Graph) -> Self {
        Self::with_shift(graph, DEFAULT_IDX_SHIFT)
    }

    pub fn with_shift(graph: &Graph, shift: u32) -> Self {
        let mut node_start = Vec::with_capacity(graph.num_nodes() as usize);
        let mut num_locations = 0;
        for i in 0..graph.num_nodes() {
            node_start.push(num_locations);
            num_locations += graph.node(i).seg.len() as u32;
        }

        // skip index: for each bucket of 1 << shift locations, the node
        // containing the bucket's first location
        let buckets = if num_locations == 0 {
            0
        } else {
            (((num_locations - 1) >> shift) + 1) as usize
        };
        let mut index = Vec::with_capacity(buckets);
        let mut node = 0u32;
        for b in 0..buckets {
            let loc = (b as u32) << shift;
            while node + 1 < graph.num_nodes() && node_start[node as usize + 1] <= loc {
                node += 1;
            }
            index.push(node);
        }

        LetterLocData {
            node_start,
            num_locations,
            index,
            shift,
        }
    }

    pub fn num_nodes(&self) -> u32 {
        self.node_start.len() as u32
    }

    /// The node owning location `loc`, by plain binary search.
    pub fn loc2node(&self, loc: LetterLoc) -> NodeId {
        debug_assert!(loc < self.num_locations);
        self.node_start.partition_point(|&s| s <= loc) as u32 - 1
    }

    /// Expand a location to its (node, offset), using the skip index to
    /// bound the search.
    pub fn expand(&self, loc: LetterLoc) -> NodePos {
        debug_assert!(loc < self.num_locations);
        let bucket = (loc >> self.shift) as usize;
        let lb = self.index[bucket] as usize;
        let ub = if bucket + 1 < self.index.len() {
            (self.index[bucket + 1] as usize + 1).min(self.node_start.len())
        } else {
            self.node_start.len()
        };
        let node = lb + self.node_start[lb..ub].partition_point(|&s| s <= loc) - 1;
        NodePos::new(node as u32, loc - self.node_start[node])
    }

    pub fn compress(&self, np: NodePos) -> LetterLoc {
        self.node_start[np.node as usize] + np.pos
    }

    /// Every (node, offset) in letter-location order.
    pub fn iter<'a>(&'a self, graph: &'a Graph) -> impl Iterator<Item = NodePos> + 'a {
        (0..graph.num_nodes()).flat_map(move |n| {
            (0..graph.node(n).seg.len() as u32).map(move |p| NodePos::new(n, p))
        })
    }
}
