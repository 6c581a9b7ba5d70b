//! 2-approximate tours for the metric Traveling Salesman Problem.
//!
//! The tour is built by doubling the edges of a minimum spanning tree, walking the resulting
//! Eulerian multigraph, and shortcutting every repeated vertex. Under the triangle inequality the
//! tour is at most twice as long as the tree, and so at most twice the optimum.
//!
//! Vertex indices are 0-based throughout.

use serde::Serialize;
use tracing::{debug, info};

pub mod error;
pub mod export;
pub mod graph;
pub mod math;

pub use error::{TspError, TspResult};
pub use graph::{
    euler::{EulerianCircuit, Multigraph},
    mst::MinimumSpanningTree,
    tsp::TourEvaluator,
    Edge, MetricGraph, Point,
};

/// Every artifact of one run of the pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TourReport {
    pub n: usize,
    pub mst_weight: f64,
    pub mst_edges: Vec<Edge>,
    pub euler_length: f64,
    pub euler_walk: Vec<usize>,
    pub hamiltonian_cycle: Vec<usize>,
    pub hamiltonian_length: f64,
    pub approximation_ratio: f64,
}

/// Run MST, doubling, Eulerian walk and shortcutting on `graph`, starting from vertex 0
pub fn compute_tour(graph: &MetricGraph) -> TspResult<TourReport> {
    let n = graph.size();

    debug!("Kruskal's algorithm");
    let mst = MinimumSpanningTree::kruskal(graph);

    debug!("Eulerian circuit of doubled tree");
    let circuit = EulerianCircuit::extract(Multigraph::doubled(mst.edges(), n), 0)?;

    debug!("Shortcut to Hamiltonian cycle");
    let hamiltonian_cycle = graph::tsp::shortcut(circuit.walk(), n);
    if hamiltonian_cycle.len() != n + 1 {
        return Err(TspError::InvariantViolation(format!(
            "Hamiltonian cycle has {} vertices, expected {}",
            hamiltonian_cycle.len(),
            n + 1
        )));
    }

    let evaluator = TourEvaluator::new(graph);
    let euler_length = evaluator.length(circuit.walk());
    let hamiltonian_length = evaluator.length(&hamiltonian_cycle);
    let approximation_ratio = evaluator.approximation_ratio(hamiltonian_length, mst.weight())?;

    info!(
        "n = {}: MST {:.4}, Euler {:.4}, tour {:.4}, ratio {:.4}",
        n,
        mst.weight(),
        euler_length,
        hamiltonian_length,
        approximation_ratio
    );

    Ok(TourReport {
        n,
        mst_weight: mst.weight(),
        mst_edges: mst.edges().to_vec(),
        euler_length,
        euler_walk: circuit.into_walk(),
        hamiltonian_cycle,
        hamiltonian_length,
        approximation_ratio,
    })
}
