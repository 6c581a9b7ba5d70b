use std::{cmp::Reverse, collections::BinaryHeap};

use tracing::debug;

use super::{union_find::UnionFind, Edge, MetricGraph};
use crate::math::kbn_sum;

/// Spanning tree of a [MetricGraph] with minimum total weight
#[derive(Debug, Clone)]
pub struct MinimumSpanningTree {
    edges: Vec<Edge>,
    weight: f64,
}

impl MinimumSpanningTree {
    /// Compute the MST with Kruskal's algorithm in O(E log(E)) time.
    ///
    /// Edges of equal weight keep the graph's edge order, so the tree is reproducible.
    ///
    /// <https://en.wikipedia.org/wiki/Kruskal%27s_algorithm>
    pub fn kruskal(graph: &MetricGraph) -> Self {
        let n = graph.size();
        let mut sorted = graph.edges().to_vec();
        // Stable, so ties stay in input order
        sorted.sort_by(|a, b| a.weight.total_cmp(&b.weight));

        let mut components = UnionFind::new(n);
        let mut edges = Vec::with_capacity(n.saturating_sub(1));
        for edge in sorted {
            if components.unite(edge.u, edge.v) {
                edges.push(edge);
                if edges.len() == n.saturating_sub(1) {
                    // Early stopping condition, MST already has all the edges
                    break;
                }
            }
        }

        let weight = kbn_sum(edges.iter().map(|edge| edge.weight));
        debug!("MST has {} edges, weight {}", edges.len(), weight);
        Self { edges, weight }
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// True iff the edges form a tree touching all `n` vertices: `n - 1` edges and no cycles
    pub fn is_spanning_tree(&self, n: usize) -> bool {
        if self.edges.len() != n.saturating_sub(1) {
            return false;
        }
        let mut components = UnionFind::new(n);
        self.edges
            .iter()
            .all(|edge| edge.u < n && edge.v < n && components.unite(edge.u, edge.v))
    }
}

#[derive(Debug, PartialEq)]
struct PriorityQueueEdge {
    weight: f64,
    to: usize,
}

impl Eq for PriorityQueueEdge {}

impl PartialOrd for PriorityQueueEdge {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PriorityQueueEdge {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.weight
            .total_cmp(&other.weight)
            .then(self.to.cmp(&other.to))
    }
}

/// Weight of the MST found with Prim's algorithm in O(E log(V)) time.
///
/// Shares no code with [MinimumSpanningTree::kruskal], which makes it useful for cross-checking.
pub fn prim_weight(graph: &MetricGraph) -> f64 {
    let n = graph.size();
    let mut in_mst = vec![false; n];
    let mut edge_priority_queue = BinaryHeap::new();
    let mut weights = Vec::with_capacity(n.saturating_sub(1));

    // Kickstart MST with 1 vertex
    if n > 0 {
        edge_priority_queue.push(Reverse(PriorityQueueEdge { weight: 0., to: 0 }));
    }

    while let Some(Reverse(shortest_edge)) = edge_priority_queue.pop() {
        // Edge would not add a new vertex to the MST
        if in_mst[shortest_edge.to] {
            continue;
        }
        in_mst[shortest_edge.to] = true;
        weights.push(shortest_edge.weight);

        for to in (0..n).filter(|to| !in_mst[*to]) {
            edge_priority_queue.push(Reverse(PriorityQueueEdge {
                weight: graph.distance(shortest_edge.to, to),
                to,
            }));
        }
        if weights.len() == n {
            break;
        }
    }
    kbn_sum(weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{right_triangle, unit_square};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn mst_is_correct_for_right_triangle() {
        let mst = MinimumSpanningTree::kruskal(&right_triangle());
        assert_eq!(mst.weight(), 7.);
        assert_eq!(
            mst.edges()
                .iter()
                .map(|edge| (edge.u, edge.v))
                .collect::<Vec<_>>(),
            [(0, 1), (0, 2)]
        );
        assert!(mst.is_spanning_tree(3));
    }

    #[test]
    fn mst_breaks_ties_by_edge_order() {
        let mst = MinimumSpanningTree::kruskal(&unit_square());
        assert_eq!(mst.weight(), 3.);
        assert_eq!(
            mst.edges()
                .iter()
                .map(|edge| (edge.u, edge.v))
                .collect::<Vec<_>>(),
            [(0, 1), (0, 3), (1, 2)]
        );
    }

    #[test]
    fn prim_agrees_on_fixed_instances() {
        assert_eq!(prim_weight(&right_triangle()), 7.);
        assert_eq!(prim_weight(&unit_square()), 3.);
    }

    #[test]
    fn spanning_tree_check_rejects_cycles() {
        let graph = unit_square();
        let edges = graph.edges();
        let cyclic = MinimumSpanningTree {
            // (0, 1), (0, 2), (1, 2) close a triangle and leave vertex 3 out
            edges: vec![edges[0], edges[1], edges[3]],
            weight: 0.,
        };
        assert!(!cyclic.is_spanning_tree(4));

        let short = MinimumSpanningTree {
            edges: vec![edges[0]],
            weight: 0.,
        };
        assert!(!short.is_spanning_tree(4));
    }

    proptest! {
        #[test]
        fn prop_kruskal_builds_spanning_tree(n in 2usize..60, seed in any::<u64>()) {
            let graph = MetricGraph::generate(n, seed).unwrap();
            let mst = MinimumSpanningTree::kruskal(&graph);
            prop_assert_eq!(mst.edges().len(), n - 1);
            prop_assert!(mst.is_spanning_tree(n));
        }

        #[test]
        fn prop_kruskal_matches_prim(n in 2usize..60, seed in any::<u64>()) {
            let graph = MetricGraph::generate(n, seed).unwrap();
            let kruskal = MinimumSpanningTree::kruskal(&graph).weight();
            let prim = prim_weight(&graph);
            prop_assert!((kruskal - prim).abs() <= 1e-9 * kruskal.max(1.));
        }
    }
}
