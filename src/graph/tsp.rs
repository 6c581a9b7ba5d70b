use super::MetricGraph;
use crate::{
    error::{TspError, TspResult},
    math::kbn_sum,
};

/// Turn an Eulerian walk into a Hamiltonian cycle by keeping only the first visit of each vertex.
///
/// The triangle inequality guarantees that skipping repeats never makes the tour longer than the walk.
/// The returned cycle repeats its first vertex at the end.
pub fn shortcut(walk: &[usize], n: usize) -> Vec<usize> {
    let mut visited = vec![false; n];
    let mut cycle = Vec::with_capacity(n + 1);
    for &vertex in walk {
        if !visited[vertex] {
            visited[vertex] = true;
            cycle.push(vertex);
        }
    }
    if let Some(&first) = cycle.first() {
        cycle.push(first);
    }
    cycle
}

/// Measures vertex sequences against a graph's distances
#[derive(Debug, Clone, Copy)]
pub struct TourEvaluator<'a> {
    graph: &'a MetricGraph,
}

impl<'a> TourEvaluator<'a> {
    pub fn new(graph: &'a MetricGraph) -> Self {
        Self { graph }
    }

    /// Sum of distances between consecutive vertices.
    ///
    /// A closed tour must list its start vertex again at the end for the closing edge to count.
    pub fn length(&self, sequence: &[usize]) -> f64 {
        kbn_sum(
            sequence
                .windows(2)
                .map(|pair| self.graph.distance(pair[0], pair[1])),
        )
    }

    /// Tour length relative to the MST weight, which is a lower bound on the optimal tour
    pub fn approximation_ratio(&self, hamiltonian_length: f64, mst_weight: f64) -> TspResult<f64> {
        if mst_weight <= 0. {
            return Err(TspError::ZeroWeightTree);
        }
        Ok(hamiltonian_length / mst_weight)
    }
}
