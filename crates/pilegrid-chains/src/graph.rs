use crate::params::ChainSearchParams;
use nalgebra::Vector2;
use pilegrid_core::{Point, PointIndex};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeAxis {
    Horizontal,
    Vertical,
}

#[derive(Clone, Debug)]
pub struct ChainEdge {
    pub index: usize,
    /// Unit vector from the source point towards `index`.
    pub direction: Vector2<f64>,
    pub distance: f64,
    pub axis: EdgeAxis,
}

/// Classify a unit direction by its dominant component, or reject it when
/// that component does not exceed `consistency`.
fn edge_axis(unit: &Vector2<f64>, consistency: f64) -> Option<EdgeAxis> {
    let (ax, ay) = (unit.x.abs(), unit.y.abs());
    if ax > ay {
        (ax > consistency).then_some(EdgeAxis::Horizontal)
    } else {
        (ay > consistency).then_some(EdgeAxis::Vertical)
    }
}

/// Directed proximity graph over a point set.
pub struct ChainGraph {
    /// For each node, its outgoing edges sorted by `(distance, index)`.
    pub neighbors: Vec<Vec<ChainEdge>>,
}

impl ChainGraph {
    pub fn new(points: &[Point], params: &ChainSearchParams) -> Self {
        if points.is_empty() {
            return Self {
                neighbors: Vec::new(),
            };
        }

        let index = PointIndex::new(points);
        let mut neighbors = Vec::with_capacity(points.len());

        for (i, p) in points.iter().enumerate() {
            let mut edges = Vec::new();

            for (j, _) in index.within(p, params.search_radius) {
                if j == i {
                    continue;
                }

                let delta = points[j] - p;
                let distance = delta.norm();
                if distance <= f64::EPSILON {
                    // Duplicate detection; no usable direction.
                    continue;
                }

                let direction = delta / distance;
                let Some(axis) = edge_axis(&direction, params.axis_consistency) else {
                    continue;
                };

                edges.push(ChainEdge {
                    index: j,
                    direction,
                    distance,
                    axis,
                });
            }

            edges.sort_by(|a, b| {
                a.distance
                    .total_cmp(&b.distance)
                    .then(a.index.cmp(&b.index))
            });
            neighbors.push(edges);
        }

        Self { neighbors }
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.neighbors.iter().map(Vec::len).sum()
    }
}
