//! Minimum spanning tree via Kruskal's algorithm.
//!
//! Operates on the dense edge indexing of [`SpatialGraph`]: weights come
//! in as a slice parallel to the edge arena, membership goes out as a
//! boolean slice over the same indices. On a disconnected graph the
//! result is the minimum spanning forest. Ties are broken by edge index,
//! so the tree is deterministic for a fixed weight assignment.

use spatial_data::SpatialGraph;

struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        DisjointSet {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            // path halving
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Merge the sets of `a` and `b`; false if already joined.
    fn union(&mut self, a: usize, b: usize) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        true
    }
}

/// Compute a minimum spanning tree (forest) from edge weights.
///
/// * `graph` - the topology
/// * `weights` - one weight per edge index
/// * `tree` - output membership map, overwritten in place
pub fn kruskal(graph: &SpatialGraph, weights: &[f64], tree: &mut [bool]) {
    debug_assert_eq!(weights.len(), graph.num_edges());
    debug_assert_eq!(tree.len(), graph.num_edges());

    let mut order: Vec<usize> = (0..graph.num_edges()).collect();
    order.sort_by(|&a, &b| weights[a].total_cmp(&weights[b]).then(a.cmp(&b)));

    tree.fill(false);
    let mut components = DisjointSet::new(graph.num_nodes());
    for e in order {
        let (u, v) = graph.edge_endpoints(e);
        if components.union(u, v) {
            tree[e] = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spatial_data::GraphBuilder;

    fn square_with_diagonal() -> SpatialGraph {
        // 1-2-3-4-1 plus the diagonal 1-3
        let mut b = GraphBuilder::new();
        for id in 1..=4 {
            b.add_node(id).unwrap();
        }
        b.add_edge_by_id(1, 2).unwrap();
        b.add_edge_by_id(2, 3).unwrap();
        b.add_edge_by_id(3, 4).unwrap();
        b.add_edge_by_id(4, 1).unwrap();
        b.add_edge_by_id(1, 3).unwrap();
        b.build()
    }

    #[test]
    fn test_picks_lightest_edges() {
        let g = square_with_diagonal();
        let weights = [0.1, 0.9, 0.2, 0.8, 0.3];
        let mut tree = vec![false; g.num_edges()];
        kruskal(&g, &weights, &mut tree);

        assert_eq!(tree.iter().filter(|&&t| t).count(), g.num_nodes() - 1);
        // 0.1 (1-2), 0.2 (3-4), 0.3 (1-3) span; 0.8 and 0.9 close cycles
        assert_eq!(tree, vec![true, false, true, false, true]);
    }

    #[test]
    fn test_deterministic_under_ties() {
        let g = square_with_diagonal();
        let weights = [0.5; 5];
        let mut first = vec![false; g.num_edges()];
        let mut second = vec![false; g.num_edges()];
        kruskal(&g, &weights, &mut first);
        kruskal(&g, &weights, &mut second);
        assert_eq!(first, second);
        assert_eq!(first.iter().filter(|&&t| t).count(), 3);
    }

    #[test]
    fn test_spanning_forest_on_disconnected_graph() {
        let mut b = GraphBuilder::new();
        for id in 1..=4 {
            b.add_node(id).unwrap();
        }
        b.add_edge_by_id(1, 2).unwrap();
        b.add_edge_by_id(3, 4).unwrap();
        let g = b.build();

        let weights = [0.4, 0.6];
        let mut tree = vec![false; g.num_edges()];
        kruskal(&g, &weights, &mut tree);
        // one edge per component
        assert_eq!(tree, vec![true, true]);
    }

    #[test]
    fn test_tree_is_acyclic_and_connected() {
        let g = square_with_diagonal();
        let weights = [0.7, 0.1, 0.5, 0.2, 0.9];
        let mut tree = vec![false; g.num_edges()];
        kruskal(&g, &weights, &mut tree);

        // re-joining the chosen edges never closes a cycle
        let mut components = DisjointSet::new(g.num_nodes());
        let mut joined = 0;
        for e in 0..g.num_edges() {
            if tree[e] {
                let (u, v) = g.edge_endpoints(e);
                assert!(components.union(u, v));
                joined += 1;
            }
        }
        assert_eq!(joined, g.num_nodes() - 1);
    }
}
