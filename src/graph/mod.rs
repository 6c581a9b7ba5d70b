use ndarray::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    error::{TspError, TspResult},
    math::euclidean_distance,
};

/// Build a closed walk over every edge of the doubled tree
pub mod euler;
/// Find the [Minimum Spanning Tree (MST)](https://en.wikipedia.org/wiki/Minimum_spanning_tree)
pub mod mst;
/// Approximate the [Traveling Salesman Problem (TSP)](https://en.wikipedia.org/wiki/Travelling_salesman_problem) by shortcutting
pub mod tsp;
/// Disjoint sets for cycle detection
pub mod union_find;

/// Smallest vertex count for which a closed tour exists
pub const MIN_VERTICES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn as_array(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}

/// Undirected weighted edge between two distinct vertices, stored with `u < v`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Edge {
    pub u: usize,
    pub v: usize,
    pub weight: f64,
}

impl Edge {
    /// Given one endpoint, returns the other one
    pub fn other(&self, endpoint: usize) -> usize {
        if endpoint == self.u {
            self.v
        } else {
            self.u
        }
    }
}

/// Complete graph over points in the plane, weighted by Euclidean distance.
///
/// Since every weight comes from an actual planar embedding, the distances satisfy the triangle inequality.
#[derive(Debug, Clone)]
pub struct MetricGraph {
    points: Vec<Point>,
    distances: Array2<f64>,
    edges: Vec<Edge>,
}

impl MetricGraph {
    /// Sample `n` points uniformly in the unit square.
    ///
    /// The random source is private to this call, so the same `seed` always yields the same instance.
    pub fn generate(n: usize, seed: u64) -> TspResult<Self> {
        check_size(n)?;
        let mut rng = StdRng::seed_from_u64(seed);
        let points = (0..n)
            .map(|_| Point::new(rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)))
            .collect::<Vec<_>>();
        debug!("Generated {} points with seed {}", n, seed);
        Self::from_points(points)
    }

    pub fn from_points(points: Vec<Point>) -> TspResult<Self> {
        check_size(points.len())?;
        if let Some(index) = points
            .iter()
            .position(|point| !point.x.is_finite() || !point.y.is_finite())
        {
            return Err(TspError::NonFiniteCoordinate { index });
        }

        let n = points.len();
        if n < 3 {
            warn!(
                "Graph has only {} vertices, the tour degenerates to a back-and-forth walk",
                n
            );
        }

        let mut distances = Array2::zeros((n, n));
        let mut edges = Vec::with_capacity(n * (n - 1) / 2);
        for i in 0..n {
            for j in i + 1..n {
                let weight = euclidean_distance(points[i].as_array(), points[j].as_array());
                distances[[i, j]] = weight;
                distances[[j, i]] = weight;
                edges.push(Edge { u: i, v: j, weight });
            }
        }

        Ok(Self {
            points,
            distances,
            edges,
        })
    }

    pub fn size(&self) -> usize {
        self.points.len()
    }

    /// Fewer than three vertices: the tree and the cycle cover the same single edge
    pub fn is_degenerate(&self) -> bool {
        self.size() < 3
    }

    pub fn distance(&self, u: usize, v: usize) -> f64 {
        self.distances[[u, v]]
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn distance_matrix(&self) -> ArrayView2<f64> {
        self.distances.view()
    }

    /// All `n(n-1)/2` edges in row-major order of the upper triangle
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Check symmetry, zero diagonal and the triangle inequality over all triples in O(n^3)
    pub fn is_metric(&self, tolerance: f64) -> bool {
        let n = self.size();
        for u in 0..n {
            if self.distance(u, u) != 0. {
                return false;
            }
            for v in 0..n {
                let uv = self.distance(u, v);
                if uv < 0. || (uv - self.distance(v, u)).abs() > tolerance {
                    return false;
                }
                for w in 0..n {
                    if self.distance(u, w) > uv + self.distance(v, w) + tolerance {
                        return false;
                    }
                }
            }
        }
        true
    }
}

fn check_size(n: usize) -> TspResult<()> {
    if n < MIN_VERTICES {
        return Err(TspError::InvalidSize {
            n,
            minimum: MIN_VERTICES,
        });
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn right_triangle() -> MetricGraph {
    MetricGraph::from_points(vec![
        Point::new(0., 0.),
        Point::new(3., 0.),
        Point::new(0., 4.),
    ])
    .unwrap()
}

#[cfg(test)]
pub(crate) fn unit_square() -> MetricGraph {
    MetricGraph::from_points(vec![
        Point::new(0., 0.),
        Point::new(1., 0.),
        Point::new(1., 1.),
        Point::new(0., 1.),
    ])
    .unwrap()
}
