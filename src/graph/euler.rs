use tracing::{debug, error};

use super::Edge;
use crate::error::{TspError, TspResult};

/// One traversable copy of a tree edge
#[derive(Debug, Clone, Copy)]
struct EdgeInstance {
    endpoints: [usize; 2],
    consumed: bool,
}

impl EdgeInstance {
    fn other(&self, endpoint: usize) -> usize {
        if endpoint == self.endpoints[0] {
            self.endpoints[1]
        } else {
            self.endpoints[0]
        }
    }
}

/// Multigraph obtained by doubling every tree edge, so that every vertex has even degree.
///
/// Edge instances live in an arena and are referenced by id from per-vertex adjacency lists.
#[derive(Debug, Clone)]
pub struct Multigraph {
    instances: Vec<EdgeInstance>,
    adjacency: Vec<Vec<usize>>,
}

impl Multigraph {
    /// Tree edge `i` becomes instances `2i` and `2i + 1`
    pub fn doubled(tree: &[Edge], n: usize) -> Self {
        let mut instances = Vec::with_capacity(2 * tree.len());
        let mut adjacency = vec![vec![]; n];
        for edge in tree {
            for _ in 0..2 {
                let id = instances.len();
                instances.push(EdgeInstance {
                    endpoints: [edge.u, edge.v],
                    consumed: false,
                });
                adjacency[edge.u].push(id);
                adjacency[edge.v].push(id);
            }
        }
        Self {
            instances,
            adjacency,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    pub fn degree(&self, vertex: usize) -> usize {
        self.adjacency[vertex].len()
    }

    /// Most recently added unconsumed instance at `vertex`, dropping consumed ones along the way
    fn next_unconsumed(&mut self, vertex: usize) -> Option<usize> {
        let adjacencies = &mut self.adjacency[vertex];
        while let Some(&id) = adjacencies.last() {
            if self.instances[id].consumed {
                adjacencies.pop();
            } else {
                return Some(id);
            }
        }
        None
    }
}

/// Closed walk using every instance of a [Multigraph] exactly once
#[derive(Debug, Clone)]
pub struct EulerianCircuit {
    walk: Vec<usize>,
    traversal_order: Vec<usize>,
}

impl EulerianCircuit {
    /// Extract the circuit with an explicit-stack version of Hierholzer's algorithm.
    ///
    /// <https://en.wikipedia.org/wiki/Eulerian_path#Hierholzer's_algorithm>
    pub fn extract(mut multigraph: Multigraph, start: usize) -> TspResult<Self> {
        let expected_instances = multigraph.instance_count();
        let mut walk = Vec::with_capacity(expected_instances + 1);
        let mut traversal_order = Vec::with_capacity(expected_instances);

        let mut stack = vec![start];
        while let Some(&head) = stack.last() {
            match multigraph.next_unconsumed(head) {
                Some(id) => {
                    let instance = &mut multigraph.instances[id];
                    instance.consumed = true;
                    traversal_order.push(id);
                    stack.push(instance.other(head));
                }
                None => {
                    stack.pop();
                    walk.push(head);
                }
            }
        }
        // Vertices are emitted in reverse completion order
        walk.reverse();

        let circuit = Self {
            walk,
            traversal_order,
        };
        circuit.check(&multigraph, start)?;
        debug!("Eulerian circuit visits {} vertices", circuit.walk.len());
        Ok(circuit)
    }

    fn check(&self, multigraph: &Multigraph, start: usize) -> TspResult<()> {
        let violation = if let Some(id) = multigraph.instances.iter().position(|i| !i.consumed) {
            Some(format!("edge instance {} was never traversed", id))
        } else if self.walk.len() != multigraph.instance_count() + 1 {
            Some(format!(
                "walk has {} vertices, expected {}",
                self.walk.len(),
                multigraph.instance_count() + 1
            ))
        } else if self.walk.first() != Some(&start) || self.walk.last() != Some(&start) {
            Some(format!("walk does not start and end at vertex {}", start))
        } else {
            None
        };

        match violation {
            Some(message) => {
                error!("Eulerian circuit is broken: {}", message);
                Err(TspError::InvariantViolation(message))
            }
            None => Ok(()),
        }
    }

    /// Vertices in visiting order, first and last equal to the start vertex
    pub fn walk(&self) -> &[usize] {
        &self.walk
    }

    /// Edge instance ids in the order they were consumed
    pub fn traversal_order(&self) -> &[usize] {
        &self.traversal_order
    }

    pub fn into_walk(self) -> Vec<usize> {
        self.walk
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{mst::MinimumSpanningTree, right_triangle, unit_square, MetricGraph};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn circuit_of(graph: &MetricGraph) -> EulerianCircuit {
        let mst = MinimumSpanningTree::kruskal(graph);
        EulerianCircuit::extract(Multigraph::doubled(mst.edges(), graph.size()), 0).unwrap()
    }

    #[test]
    fn test_doubling_gives_even_degrees() {
        let graph = unit_square();
        let mst = MinimumSpanningTree::kruskal(&graph);
        let multigraph = Multigraph::doubled(mst.edges(), graph.size());
        assert_eq!(multigraph.vertex_count(), 4);
        assert_eq!(multigraph.instance_count(), 6);
        assert_eq!(
            (0..4).map(|v| multigraph.degree(v)).collect::<Vec<_>>(),
            [4, 4, 2, 2]
        );
    }

    #[test]
    fn test_walk_of_right_triangle() {
        assert_eq!(circuit_of(&right_triangle()).walk(), [0, 2, 0, 1, 0]);
    }

    #[test]
    fn test_walk_of_unit_square() {
        let circuit = circuit_of(&unit_square());
        assert_eq!(circuit.walk(), [0, 3, 0, 1, 2, 1, 0]);
        assert_eq!(circuit.traversal_order(), [3, 2, 1, 5, 4, 0]);
    }

    #[test]
    fn test_disconnected_multigraph_is_an_invariant_violation() {
        let graph = unit_square();
        let edges = graph.edges();
        // (0, 1) and (2, 3) leave two components
        let forest = [edges[0], edges[5]];
        let result = EulerianCircuit::extract(Multigraph::doubled(&forest, 4), 0);
        assert!(matches!(result, Err(TspError::InvariantViolation(_))));
    }

    proptest! {
        #[test]
        fn prop_every_instance_used_once(n in 2usize..60, seed in any::<u64>()) {
            let graph = MetricGraph::generate(n, seed).unwrap();
            let circuit = circuit_of(&graph);
            let walk = circuit.walk();
            prop_assert_eq!(walk.len(), 2 * (n - 1) + 1);
            prop_assert_eq!(walk.first(), Some(&0));
            prop_assert_eq!(walk.last(), Some(&0));

            let mut used = circuit.traversal_order().to_vec();
            used.sort_unstable();
            prop_assert_eq!(used, (0..2 * (n - 1)).collect::<Vec<_>>());
        }
    }
}
