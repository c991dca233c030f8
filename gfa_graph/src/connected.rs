// Undirected connected components over the graph, and one starting node
// per component: nodes without predecessors where they exist, an arbitrary
// member for purely cyclic components.

use crate::graph::{Graph, NodeId, INVALID_ID};
use std::collections::VecDeque;

#[derive(Debug)]
pub struct ConnectedComponents {
    pub comp_id: Vec<NodeId>,
    pub num_comp: u32,
}

impl ConnectedComponents {
    pub fn new(graph: &Graph) -> Self {
        let mut cc = ConnectedComponents {
            comp_id: vec![INVALID_ID; graph.num_nodes() as usize],
            num_comp: 0,
        };
        for i in 0..graph.num_nodes() {
            if cc.comp_id[i as usize] == INVALID_ID {
                cc.bfs_2way(graph, i, cc.num_comp);
                cc.num_comp += 1;
            }
        }
        cc
    }

    pub fn starting_points(&self, graph: &Graph) -> Vec<NodeId> {
        let mut starts = Vec::with_capacity(self.num_comp as usize);
        let mut done = vec![false; self.num_comp as usize];
        // obvious starting points first
        for i in 0..graph.num_nodes() {
            if graph.backward_from(i).next().is_none() {
                starts.push(i);
                done[self.comp_id[i as usize] as usize] = true;
            }
        }
        // cyclic components get an arbitrary internal node
        for i in 0..graph.num_nodes() {
            let c = self.comp_id[i as usize] as usize;
            if !done[c] {
                done[c] = true;
                starts.push(i);
            }
        }
        starts
    }

    fn bfs_2way(&mut self, graph: &Graph, start: NodeId, comp: u32) {
        let mut q = VecDeque::new();
        q.push_back(start);
        self.comp_id[start as usize] = comp;
        while let Some(crnt) = q.pop_front() {
            for t in graph.forward_from(crnt).chain(graph.backward_from(crnt)) {
                if self.comp_id[t.node_id as usize] == INVALID_ID {
                    self.comp_id[t.node_id as usize] = comp;
                    q.push_back(t.node_id);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dna_string::DnaString;
    use crate::graph::{GraphBuilder, GraphSettings};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_components_and_starts() {
        let mut b = GraphBuilder::new(GraphSettings {
            add_reverse_complement: false,
            add_extends: false,
        });
        for id in ["a1", "a2", "b1", "b2"] {
            b.add_node(DnaString::from_dna_str("a").unwrap(), id);
        }
        b.add_edge("a1", "a2").unwrap();
        // second component is a pure cycle
        b.add_edge("b1", "b2").unwrap();
        b.add_edge("b2", "b1").unwrap();
        let g = b.build().unwrap();

        let cc = ConnectedComponents::new(&g);
        assert_eq!(cc.num_comp, 2);
        assert_eq!(cc.comp_id[0], cc.comp_id[1]);
        assert_eq!(cc.comp_id[2], cc.comp_id[3]);
        assert_ne!(cc.comp_id[0], cc.comp_id[2]);

        let starts = cc.starting_points(&g);
        assert_eq!(starts.len(), 2);
        assert!(starts.contains(&0));
        // the cyclic component contributed one of its members
        assert!(starts.iter().any(|&s| s == 2 || s == 3));
    }
}
