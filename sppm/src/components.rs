//! Breadth-first connectivity under an edge-enabled filter.
//!
//! The partition sampler never materializes filtered subgraphs; it walks
//! the full adjacency structure and consults a boolean edge map. Scratch
//! buffers are caller-owned so repeated queries reuse their allocations.

use spatial_data::SpatialGraph;
use std::collections::VecDeque;

/// Mark every node reachable from `source` through enabled edges.
///
/// * `graph` - the topology
/// * `enabled` - one flag per edge index
/// * `source` - start node
/// * `reached` - output flags, cleared and resized to `num_nodes()`
pub fn reachable_from(
    graph: &SpatialGraph,
    enabled: &[bool],
    source: usize,
    reached: &mut Vec<bool>,
) {
    reached.clear();
    reached.resize(graph.num_nodes(), false);

    let mut queue = VecDeque::new();
    reached[source] = true;
    queue.push_back(source);
    while let Some(u) = queue.pop_front() {
        for &(v, e) in graph.neighbours(u) {
            if enabled[e] && !reached[v] {
                reached[v] = true;
                queue.push_back(v);
            }
        }
    }
}

/// Label every connected component with consecutive 1-based ids.
///
/// Components are discovered in node-enumeration order, so labels are
/// deterministic for a fixed filter. Returns the number of components.
///
/// * `graph` - the topology
/// * `enabled` - one flag per edge index
/// * `labels` - output labels, cleared and resized to `num_nodes()`
pub fn label_components(graph: &SpatialGraph, enabled: &[bool], labels: &mut Vec<usize>) -> usize {
    let n = graph.num_nodes();
    labels.clear();
    labels.resize(n, 0);

    let mut num_components = 0;
    let mut queue = VecDeque::new();
    for start in 0..n {
        if labels[start] != 0 {
            continue;
        }
        num_components += 1;
        labels[start] = num_components;
        queue.push_back(start);
        while let Some(u) = queue.pop_front() {
            for &(v, e) in graph.neighbours(u) {
                if enabled[e] && labels[v] == 0 {
                    labels[v] = num_components;
                    queue.push_back(v);
                }
            }
        }
    }
    num_components
}

#[cfg(test)]
mod tests {
    use super::*;
    use spatial_data::GraphBuilder;

    fn cycle(n: i64) -> SpatialGraph {
        let mut b = GraphBuilder::new();
        for id in 1..=n {
            b.add_node(id).unwrap();
        }
        for id in 1..n {
            b.add_edge_by_id(id, id + 1).unwrap();
        }
        b.add_edge_by_id(n, 1).unwrap();
        b.build()
    }

    #[test]
    fn test_reachable_full_filter() {
        let g = cycle(4);
        let enabled = vec![true; g.num_edges()];
        let mut reached = Vec::new();
        reachable_from(&g, &enabled, 0, &mut reached);
        assert_eq!(reached, vec![true; 4]);
    }

    #[test]
    fn test_reachable_split_cycle() {
        let g = cycle(4);
        // disable 2-3 and 4-1: components {1,2} and {3,4}
        let enabled = vec![true, false, true, false];
        let mut reached = Vec::new();

        reachable_from(&g, &enabled, 0, &mut reached);
        assert_eq!(reached, vec![true, true, false, false]);

        reachable_from(&g, &enabled, 2, &mut reached);
        assert_eq!(reached, vec![false, false, true, true]);
    }

    #[test]
    fn test_label_components() {
        let g = cycle(4);
        let enabled = vec![true, false, true, false];
        let mut labels = Vec::new();
        let c = label_components(&g, &enabled, &mut labels);
        assert_eq!(c, 2);
        assert_eq!(labels, vec![1, 1, 2, 2]);
    }

    #[test]
    fn test_label_all_disabled_is_singletons() {
        let g = cycle(5);
        let enabled = vec![false; g.num_edges()];
        let mut labels = Vec::new();
        let c = label_components(&g, &enabled, &mut labels);
        assert_eq!(c, 5);
        assert_eq!(labels, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_labels_are_contiguous() {
        let g = cycle(6);
        let enabled = vec![true, false, true, false, true, false];
        let mut labels = Vec::new();
        let c = label_components(&g, &enabled, &mut labels);
        for &l in &labels {
            assert!(l >= 1 && l <= c);
        }
        for want in 1..=c {
            assert!(labels.iter().any(|&l| l == want));
        }
    }
}
