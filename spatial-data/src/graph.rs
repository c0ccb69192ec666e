//! Arena-indexed spatial graph.
//!
//! Nodes and edges are dense integer indices; external node ids,
//! attribute maps, and adjacency lists are parallel arrays. The graph is
//! built once by [`GraphBuilder`] and immutable afterwards.

use crate::error::InputError;
use std::collections::{HashMap, VecDeque};

/// An undirected graph of spatial units with per-node numeric attributes.
///
/// Node indices are `0..num_nodes()`, edge indices `0..num_edges()`.
/// External ids are preserved for output correlation only; all internal
/// bookkeeping runs on the dense indices.
#[derive(Debug, Clone)]
pub struct SpatialGraph {
    node_ids: Vec<i64>,
    attributes: Vec<HashMap<Box<str>, f64>>,
    edges: Vec<(usize, usize)>,
    adjacency: Vec<Vec<(usize, usize)>>,
}

impl SpatialGraph {
    /// Number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.node_ids.len()
    }

    /// Number of undirected edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// External id of a node.
    pub fn node_id(&self, node: usize) -> i64 {
        self.node_ids[node]
    }

    /// External ids in node-enumeration order.
    pub fn node_ids(&self) -> &[i64] {
        &self.node_ids
    }

    /// Numeric attribute of a node, if present.
    pub fn attribute(&self, node: usize, name: &str) -> Option<f64> {
        self.attributes[node].get(name).copied()
    }

    /// Endpoint node indices of an edge.
    pub fn edge_endpoints(&self, edge: usize) -> (usize, usize) {
        self.edges[edge]
    }

    /// Neighbours of a node as `(neighbour, edge index)` pairs.
    pub fn neighbours(&self, node: usize) -> &[(usize, usize)] {
        &self.adjacency[node]
    }

    /// Whether every node is reachable from node 0.
    pub fn is_connected(&self) -> bool {
        let n = self.num_nodes();
        if n == 0 {
            return true;
        }
        let mut seen = vec![false; n];
        let mut queue = VecDeque::new();
        seen[0] = true;
        queue.push_back(0);
        let mut count = 1;
        while let Some(u) = queue.pop_front() {
            for &(v, _) in self.neighbours(u) {
                if !seen[v] {
                    seen[v] = true;
                    count += 1;
                    queue.push_back(v);
                }
            }
        }
        count == n
    }
}

/// Incremental construction of a [`SpatialGraph`].
#[derive(Debug, Default)]
pub struct GraphBuilder {
    node_ids: Vec<i64>,
    id_to_index: HashMap<i64, usize>,
    attributes: Vec<HashMap<Box<str>, f64>>,
    edges: Vec<(usize, usize)>,
}

impl GraphBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a node with an external id; returns its dense index.
    pub fn add_node(&mut self, id: i64) -> Result<usize, InputError> {
        if self.id_to_index.contains_key(&id) {
            return Err(InputError::DuplicateNode(id));
        }
        let index = self.node_ids.len();
        self.node_ids.push(id);
        self.attributes.push(HashMap::new());
        self.id_to_index.insert(id, index);
        Ok(index)
    }

    /// Attach a numeric attribute to a node.
    pub fn set_attribute(&mut self, node: usize, name: &str, value: f64) {
        self.attributes[node].insert(name.into(), value);
    }

    /// Dense index of a declared external id.
    pub fn node_index(&self, id: i64) -> Option<usize> {
        self.id_to_index.get(&id).copied()
    }

    /// Add an undirected edge between two external ids.
    ///
    /// Both endpoints must have been declared; self-loops are rejected.
    pub fn add_edge_by_id(&mut self, u_id: i64, v_id: i64) -> Result<(), InputError> {
        if u_id == v_id {
            return Err(InputError::SelfLoop(u_id));
        }
        let u = self
            .node_index(u_id)
            .ok_or(InputError::UnresolvedNeighbour { from: v_id, to: u_id })?;
        let v = self
            .node_index(v_id)
            .ok_or(InputError::UnresolvedNeighbour { from: u_id, to: v_id })?;
        self.edges.push((u, v));
        Ok(())
    }

    /// Freeze the builder into an immutable graph.
    pub fn build(self) -> SpatialGraph {
        let mut adjacency = vec![Vec::new(); self.node_ids.len()];
        for (e, &(u, v)) in self.edges.iter().enumerate() {
            adjacency[u].push((v, e));
            adjacency[v].push((u, e));
        }
        SpatialGraph {
            node_ids: self.node_ids,
            attributes: self.attributes,
            edges: self.edges,
            adjacency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_graph(n: i64) -> SpatialGraph {
        let mut b = GraphBuilder::new();
        for id in 1..=n {
            b.add_node(id * 10).unwrap();
        }
        for id in 1..n {
            b.add_edge_by_id(id * 10, (id + 1) * 10).unwrap();
        }
        b.build()
    }

    #[test]
    fn test_build_path() {
        let g = path_graph(4);
        assert_eq!(g.num_nodes(), 4);
        assert_eq!(g.num_edges(), 3);
        assert_eq!(g.node_ids(), &[10, 20, 30, 40]);
        assert_eq!(g.edge_endpoints(0), (0, 1));
        // middle node touches two edges
        assert_eq!(g.neighbours(1).len(), 2);
        assert!(g.is_connected());
    }

    #[test]
    fn test_attributes() {
        let mut b = GraphBuilder::new();
        let u = b.add_node(7).unwrap();
        b.set_attribute(u, "rate", 0.25);
        let g = b.build();
        assert_eq!(g.attribute(u, "rate"), Some(0.25));
        assert_eq!(g.attribute(u, "other"), None);
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let mut b = GraphBuilder::new();
        b.add_node(1).unwrap();
        assert!(matches!(b.add_node(1), Err(InputError::DuplicateNode(1))));
    }

    #[test]
    fn test_self_loop_rejected() {
        let mut b = GraphBuilder::new();
        b.add_node(1).unwrap();
        assert!(matches!(
            b.add_edge_by_id(1, 1),
            Err(InputError::SelfLoop(1))
        ));
    }

    #[test]
    fn test_unresolved_neighbour_rejected() {
        let mut b = GraphBuilder::new();
        b.add_node(1).unwrap();
        assert!(matches!(
            b.add_edge_by_id(1, 99),
            Err(InputError::UnresolvedNeighbour { from: 1, to: 99 })
        ));
    }

    #[test]
    fn test_disconnected_graph_detected() {
        let mut b = GraphBuilder::new();
        for id in 1..=4 {
            b.add_node(id).unwrap();
        }
        b.add_edge_by_id(1, 2).unwrap();
        b.add_edge_by_id(3, 4).unwrap();
        let g = b.build();
        assert!(!g.is_connected());
    }
}
