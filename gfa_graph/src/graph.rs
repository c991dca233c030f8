// The variation graph. Storage is CSR-flavoured: nodes in one vector,
// edges in another, with per-node head indices and per-edge next links.
// Edges are appended in pairs, a forward edge at 2k and its backward
// companion at 2k + 1, so the two directions share one arena.
//
// Two synthetic decorations can be applied while building:
//  - reverse-complement twins: every node id n gets a twin at n ^ 1
//    carrying the reverse complement sequence, and every link is mirrored;
//  - extend sinks: every dead-end node grows a single-letter successor so
//    no real node has zero successors.

use crate::dna_string::DnaString;
use crate::GraphError;
use log::debug;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub type NodeId = u32;
pub type EdgeId = u32;

pub const INVALID_ID: u32 = u32::MAX;

#[derive(Debug)]
pub struct Node {
    pub seg: DnaString,
    pub seg_id: String,
}

#[derive(Debug, Clone, Copy)]
struct Edge {
    to: NodeId,
    next: EdgeId,
}

/// Which synthetic decorations the builder applies.
#[derive(Debug, Clone, Copy)]
pub struct GraphSettings {
    pub add_reverse_complement: bool,
    pub add_extends: bool,
}

impl Default for GraphSettings {
    fn default() -> Self {
        GraphSettings {
            add_reverse_complement: true,
            add_extends: true,
        }
    }
}

#[derive(Debug)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    edge_start: Vec<EdgeId>,
    redge_start: Vec<EdgeId>,
    pub settings: GraphSettings,
}

/// One target of a node's adjacency list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub node_id: NodeId,
    pub edge_id: EdgeId,
}

/// An edge with both endpoints resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeInfo {
    pub from: NodeId,
    pub to: NodeId,
    pub edge_id: EdgeId,
}

impl Graph {
    pub fn num_nodes(&self) -> u32 {
        self.nodes.len() as u32
    }

    /// Total directed edge records (each link contributes two).
    pub fn num_edges(&self) -> u32 {
        self.edges.len() as u32
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id as usize]
    }

    /// Successors of `id`.
    pub fn forward_from(&self, id: NodeId) -> Targets<'_> {
        Targets {
            edges: &self.edges,
            cur: self.edge_start[id as usize],
        }
    }

    /// Predecessors of `id`.
    pub fn backward_from(&self, id: NodeId) -> Targets<'_> {
        Targets {
            edges: &self.edges,
            cur: self.redge_start[id as usize],
        }
    }

    pub fn has_forward(&self, id: NodeId) -> bool {
        self.edge_start[id as usize] != INVALID_ID
    }

    /// An always-empty adjacency view.
    pub fn no_targets(&self) -> Targets<'_> {
        Targets {
            edges: &self.edges,
            cur: INVALID_ID,
        }
    }

    /// All forward edges, with endpoints resolved.
    pub fn forward_edges(&self) -> impl Iterator<Item = EdgeInfo> + '_ {
        (0..self.edges.len() as u32)
            .step_by(2)
            .map(move |edge_id| self.forward_edge(edge_id))
    }

    /// All backward edge records.
    pub fn reverse_edges(&self) -> impl Iterator<Item = EdgeInfo> + '_ {
        (0..self.edges.len() as u32)
            .skip(1)
            .step_by(2)
            .map(move |edge_id| EdgeInfo {
                from: self.edges[(edge_id ^ 1) as usize].to,
                to: self.edges[edge_id as usize].to,
                edge_id,
            })
    }

    fn forward_edge(&self, edge_id: EdgeId) -> EdgeInfo {
        EdgeInfo {
            // the paired reverse edge points back at the source
            from: self.edges[(edge_id ^ 1) as usize].to,
            to: self.edges[edge_id as usize].to,
            edge_id,
        }
    }

    pub fn next_forward_edge(&self, edge_id: EdgeId) -> EdgeId {
        self.edges[edge_id as usize].next
    }

    pub fn edge_target(&self, edge_id: EdgeId) -> NodeId {
        self.edges[edge_id as usize].to
    }

    /// Read a graph from a `.gfa`/`.rgfa` or `.fa`/`.fasta` file.
    pub fn from_file(path: &str, settings: GraphSettings) -> Result<Graph, GraphError> {
        let lower = path.to_lowercase();
        let reader = BufReader::new(File::open(Path::new(path))?);
        let mut builder = GraphBuilder::new(settings);
        if lower.ends_with(".gfa") || lower.ends_with(".rgfa") {
            read_gfa(reader, &mut builder)?;
        } else if lower.ends_with(".fa") || lower.ends_with(".fasta") {
            read_fasta(reader, &mut builder)?;
        } else {
            return Err(GraphError::UnknownFormat(path.to_string()));
        }
        let graph = builder.build()?;
        debug!(
            "read graph: {} nodes, {} edge records",
            graph.num_nodes(),
            graph.num_edges()
        );
        Ok(graph)
    }
}

/// Iterator over one adjacency list.
#[derive(Clone)]
pub struct Targets<'a> {
    edges: &'a [Edge],
    cur: EdgeId,
}

impl<'a> Iterator for Targets<'a> {
    type Item = Target;

    fn next(&mut self) -> Option<Target> {
        if self.cur == INVALID_ID {
            return None;
        }
        let edge_id = self.cur;
        let e = self.edges[edge_id as usize];
        self.cur = e.next;
        Some(Target {
            node_id: e.to,
            edge_id,
        })
    }
}

enum BuilderState {
    Nodes,
    Edges,
}

pub struct GraphBuilder {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    edge_start: Vec<EdgeId>,
    redge_start: Vec<EdgeId>,
    seg2id: HashMap<String, NodeId>,
    settings: GraphSettings,
    state: BuilderState,
}

impl GraphBuilder {
    pub fn new(settings: GraphSettings) -> Self {
        GraphBuilder {
            nodes: Vec::new(),
            edges: Vec::new(),
            edge_start: Vec::new(),
            redge_start: Vec::new(),
            seg2id: HashMap::new(),
            settings,
            state: BuilderState::Nodes,
        }
    }

    /// Add a segment; in twin mode its reverse complement lands right next
    /// to it, so twins sit at ids n and n ^ 1.
    pub fn add_node(&mut self, seg: DnaString, seg_id: &str) -> &mut Self {
        debug_assert!(matches!(self.state, BuilderState::Nodes));
        if self.settings.add_reverse_complement {
            let rc = seg.rc();
            self.push_node(seg, seg_id.to_string());
            self.push_node(rc, format!("revcomp:{}", seg_id));
        } else {
            self.push_node(seg, seg_id.to_string());
        }
        self
    }

    fn push_node(&mut self, seg: DnaString, seg_id: String) {
        self.nodes.push(Node { seg, seg_id });
    }

    fn prep_for_edges(&mut self) {
        if matches!(self.state, BuilderState::Nodes) {
            for (i, node) in self.nodes.iter().enumerate() {
                self.seg2id.insert(node.seg_id.clone(), i as NodeId);
            }
            self.edge_start.resize(self.nodes.len(), INVALID_ID);
            self.redge_start.resize(self.nodes.len(), INVALID_ID);
            self.state = BuilderState::Edges;
        }
    }

    /// Add a forward link between two segments by name.
    pub fn add_edge(&mut self, seg_a: &str, seg_b: &str) -> Result<&mut Self, GraphError> {
        self.add_edge_dir(seg_a, '+', seg_b, '+')
    }

    /// Add a link with orientations. In twin mode each link is mirrored
    /// onto the twins; without twins only same-orientation links work.
    pub fn add_edge_dir(
        &mut self,
        seg_a: &str,
        dir_a: char,
        seg_b: &str,
        dir_b: char,
    ) -> Result<&mut Self, GraphError> {
        self.prep_for_edges();
        if self.settings.add_reverse_complement {
            let a = self.lookup(seg_a, dir_a)?;
            let b = self.lookup(seg_b, dir_b)?;
            self.link(a, b);
            // mirrored link between the twins, reversed
            self.link(b ^ 1, a ^ 1);
        } else if dir_a == '+' && dir_b == '+' {
            let a = self.lookup(seg_a, '+')?;
            let b = self.lookup(seg_b, '+')?;
            self.link(a, b);
        } else if dir_a == '-' && dir_b == '-' {
            // a reversed link in plain mode is the forward link b -> a
            let a = self.lookup(seg_a, '+')?;
            let b = self.lookup(seg_b, '+')?;
            self.link(b, a);
        } else {
            return Err(GraphError::DirectionMismatch(dir_a, dir_b));
        }
        Ok(self)
    }

    fn lookup(&self, seg_id: &str, dir: char) -> Result<NodeId, GraphError> {
        let id = *self
            .seg2id
            .get(seg_id)
            .ok_or_else(|| GraphError::UnknownSegment(seg_id.to_string()))?;
        Ok(if dir == '-' { id ^ 1 } else { id })
    }

    fn link(&mut self, a: NodeId, b: NodeId) {
        self.edges.push(Edge {
            to: b,
            next: self.edge_start[a as usize],
        });
        self.edge_start[a as usize] = self.edges.len() as EdgeId - 1;
        self.edges.push(Edge {
            to: a,
            next: self.redge_start[b as usize],
        });
        self.redge_start[b as usize] = self.edges.len() as EdgeId - 1;
    }

    fn add_extends(&mut self) {
        // the range is fixed up front, new extend nodes do not cascade
        for i in 0..self.nodes.len() {
            if self.edge_start[i] == INVALID_ID {
                let seg_id = format!("extend:{}", self.nodes[i].seg_id);
                let ext = self.nodes.len() as NodeId;
                self.push_node(DnaString::from_bytes(&[0]), seg_id.clone());
                self.edge_start.push(INVALID_ID);
                self.redge_start.push(INVALID_ID);
                if self.settings.add_reverse_complement {
                    // keep the twin-at-id-xor-1 invariant for extends too
                    self.push_node(DnaString::from_bytes(&[3]), format!("revcomp:{}", seg_id));
                    self.edge_start.push(INVALID_ID);
                    self.redge_start.push(INVALID_ID);
                }
                self.link(i as NodeId, ext);
            }
        }
    }

    pub fn build(mut self) -> Result<Graph, GraphError> {
        self.prep_for_edges();
        if self.settings.add_extends {
            self.add_extends();
        }
        if self.nodes.is_empty() {
            return Err(GraphError::EmptyGraph);
        }
        Ok(Graph {
            nodes: self.nodes,
            edges: self.edges,
            edge_start: self.edge_start,
            redge_start: self.redge_start,
            settings: self.settings,
        })
    }
}

fn read_gfa(reader: impl BufRead, builder: &mut GraphBuilder) -> Result<(), GraphError> {
    for line in reader.lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let head = fields.next().unwrap();
        match head {
            "S" => {
                let seg_id = fields.next().ok_or(GraphError::MalformedRecord("S"))?;
                let seq = fields.next().ok_or(GraphError::MalformedRecord("S"))?;
                builder.add_node(DnaString::from_dna_str(seq)?, seg_id);
            }
            "L" => {
                let seg_a = fields.next().ok_or(GraphError::MalformedRecord("L"))?;
                let dir_a = fields.next().ok_or(GraphError::MalformedRecord("L"))?;
                let seg_b = fields.next().ok_or(GraphError::MalformedRecord("L"))?;
                let dir_b = fields.next().ok_or(GraphError::MalformedRecord("L"))?;
                let cigar = fields.next().ok_or(GraphError::MalformedRecord("L"))?;
                if cigar != "0M" {
                    return Err(GraphError::NonZeroOverlap(cigar.to_string()));
                }
                let (dir_a, dir_b) = match (dir_a.chars().next(), dir_b.chars().next()) {
                    (Some(a @ ('+' | '-')), Some(b @ ('+' | '-'))) => (a, b),
                    _ => return Err(GraphError::MalformedRecord("L")),
                };
                builder.add_edge_dir(seg_a, dir_a, seg_b, dir_b)?;
            }
            // headers and comments are fine, anything else is not
            "H" | "#" => {}
            other => {
                return Err(GraphError::UnknownRecord(
                    other.chars().next().unwrap_or('?'),
                ));
            }
        }
    }
    Ok(())
}

fn read_fasta(reader: impl BufRead, builder: &mut GraphBuilder) -> Result<(), GraphError> {
    let mut seg_id = String::new();
    let mut seq = String::new();
    let finish = |builder: &mut GraphBuilder,
                  seg_id: &str,
                  seq: &mut String|
     -> Result<(), GraphError> {
        if !seg_id.is_empty() && !seq.is_empty() {
            builder.add_node(DnaString::from_dna_str(seq)?, seg_id);
        }
        seq.clear();
        Ok(())
    };

    for line in reader.lines() {
        let line = line?;
        if let Some(rest) = line.strip_prefix('>') {
            finish(builder, &seg_id, &mut seq)?;
            seg_id = rest.trim().to_string();
        } else if line.starts_with(';') {
            continue;
        } else {
            seq.push_str(line.trim());
        }
    }
    finish(builder, &seg_id, &mut seq)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn plain() -> GraphSettings {
        GraphSettings {
            add_reverse_complement: false,
            add_extends: false,
        }
    }

    fn targets(g: &Graph, id: NodeId) -> Vec<String> {
        let mut v: Vec<String> = g
            .forward_from(id)
            .map(|t| g.node(t.node_id).seg_id.clone())
            .collect();
        v.sort();
        v
    }

    #[test]
    fn test_builder_basic() {
        let mut b = GraphBuilder::new(plain());
        b.add_node(DnaString::from_dna_str("acg").unwrap(), "s1")
            .add_node(DnaString::from_dna_str("t").unwrap(), "s2")
            .add_node(DnaString::from_dna_str("gg").unwrap(), "s3");
        b.add_edge("s1", "s2").unwrap();
        b.add_edge("s1", "s3").unwrap();
        let g = b.build().unwrap();
        assert_eq!(g.num_nodes(), 3);
        assert_eq!(targets(&g, 0), vec!["s2", "s3"]);
        assert_eq!(targets(&g, 1), Vec::<String>::new());
        let back: Vec<NodeId> = g.backward_from(1).map(|t| t.node_id).collect();
        assert_eq!(back, vec![0]);
    }

    #[test]
    fn test_revcomp_twins_adjacent() {
        let mut b = GraphBuilder::new(GraphSettings {
            add_reverse_complement: true,
            add_extends: false,
        });
        b.add_node(DnaString::from_dna_str("acgt").unwrap(), "s1")
            .add_node(DnaString::from_dna_str("ag").unwrap(), "s2");
        b.add_edge("s1", "s2").unwrap();
        let g = b.build().unwrap();
        assert_eq!(g.num_nodes(), 4);
        assert_eq!(g.node(0).seg.to_string(), "acgt");
        assert_eq!(g.node(1).seg.to_string(), "acgt"); // self-complementary
        assert_eq!(g.node(2).seg.to_string(), "ag");
        assert_eq!(g.node(3).seg.to_string(), "ct");
        assert_eq!(g.node(1).seg_id, "revcomp:s1");
        // the mirrored link runs revcomp:s2 -> revcomp:s1
        let fwd3: Vec<NodeId> = g.forward_from(3).map(|t| t.node_id).collect();
        assert_eq!(fwd3, vec![1]);
    }

    #[test]
    fn test_direction_mismatch_without_twins() {
        let mut b = GraphBuilder::new(plain());
        b.add_node(DnaString::from_dna_str("a").unwrap(), "s1")
            .add_node(DnaString::from_dna_str("c").unwrap(), "s2");
        assert!(matches!(
            b.add_edge_dir("s1", '+', "s2", '-'),
            Err(GraphError::DirectionMismatch('+', '-'))
        ));
    }

    #[test]
    fn test_extends_added_on_dead_ends() {
        let mut b = GraphBuilder::new(GraphSettings {
            add_reverse_complement: false,
            add_extends: true,
        });
        b.add_node(DnaString::from_dna_str("acg").unwrap(), "s1")
            .add_node(DnaString::from_dna_str("c").unwrap(), "s2")
            .add_node(DnaString::from_dna_str("g").unwrap(), "s3");
        b.add_edge("s1", "s2").unwrap();
        b.add_edge("s1", "s3").unwrap();
        let g = b.build().unwrap();
        assert_eq!(g.num_nodes(), 5);
        assert_eq!(g.node(3).seg_id, "extend:s2");
        assert_eq!(g.node(4).seg_id, "extend:s3");
        // every original node has a successor now
        for i in 0..3 {
            assert!(g.has_forward(i));
        }
        assert!(!g.has_forward(3));
    }

    #[test]
    fn test_edge_iteration() {
        let mut b = GraphBuilder::new(plain());
        b.add_node(DnaString::from_dna_str("a").unwrap(), "s1")
            .add_node(DnaString::from_dna_str("c").unwrap(), "s2")
            .add_node(DnaString::from_dna_str("g").unwrap(), "s3");
        b.add_edge("s1", "s2").unwrap();
        b.add_edge("s2", "s3").unwrap();
        let g = b.build().unwrap();

        let fwd: Vec<(NodeId, NodeId)> = g.forward_edges().map(|e| (e.from, e.to)).collect();
        assert_eq!(fwd, vec![(0, 1), (1, 2)]);
        // the paired backward records invert the endpoints
        let rev: Vec<(NodeId, NodeId)> = g.reverse_edges().map(|e| (e.from, e.to)).collect();
        assert_eq!(rev, vec![(1, 0), (2, 1)]);
    }

    #[test]
    fn test_gfa_parse() {
        let mut f = tempfile::Builder::new().suffix(".gfa").tempfile().unwrap();
        writeln!(f, "H\tVN:Z:1.0").unwrap();
        writeln!(f, "S\ts1\tacg").unwrap();
        writeln!(f, "S\ts2\tt").unwrap();
        writeln!(f, "L\ts1\t+\ts2\t+\t0M").unwrap();
        let g = Graph::from_file(f.path().to_str().unwrap(), plain()).unwrap();
        assert_eq!(g.num_nodes(), 2);
        assert_eq!(g.node(0).seg.to_string(), "acg");
        assert_eq!(targets(&g, 0), vec!["s2"]);
    }

    #[test]
    fn test_gfa_rejects_overlap() {
        let mut f = tempfile::Builder::new().suffix(".gfa").tempfile().unwrap();
        writeln!(f, "S\ts1\tacg").unwrap();
        writeln!(f, "S\ts2\tt").unwrap();
        writeln!(f, "L\ts1\t+\ts2\t+\t3M").unwrap();
        let err = Graph::from_file(f.path().to_str().unwrap(), plain());
        assert!(matches!(err, Err(GraphError::NonZeroOverlap(_))));
    }

    #[test]
    fn test_gfa_rejects_unknown_record() {
        let mut f = tempfile::Builder::new().suffix(".gfa").tempfile().unwrap();
        writeln!(f, "S\ts1\tacg").unwrap();
        writeln!(f, "P\tp1\ts1+\t*").unwrap();
        let err = Graph::from_file(f.path().to_str().unwrap(), plain());
        assert!(matches!(err, Err(GraphError::UnknownRecord('P'))));
    }

    #[test]
    fn test_fasta_parse() {
        let mut f = tempfile::Builder::new().suffix(".fa").tempfile().unwrap();
        writeln!(f, ">chr1 some description").unwrap();
        writeln!(f, "; a comment").unwrap();
        writeln!(f, "acgt").unwrap();
        writeln!(f, "acgt").unwrap();
        writeln!(f, ">chr2").unwrap();
        writeln!(f, "ttt").unwrap();
        let g = Graph::from_file(f.path().to_str().unwrap(), plain()).unwrap();
        assert_eq!(g.num_nodes(), 2);
        assert_eq!(g.node(0).seg.to_string(), "acgtacgt");
        assert_eq!(g.node(0).seg_id, "chr1 some description");
        assert_eq!(g.node(1).seg.to_string(), "ttt");
    }

    #[test]
    fn test_empty_graph_refused() {
        let f = tempfile::Builder::new().suffix(".gfa").tempfile().unwrap();
        let err = Graph::from_file(f.path().to_str().unwrap(), plain());
        assert!(matches!(err, Err(GraphError::EmptyGraph)));
    }
}
