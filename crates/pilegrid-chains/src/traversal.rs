use crate::graph::{ChainEdge, ChainGraph};
use crate::params::ChainSearchParams;
use log::debug;
use nalgebra::Vector2;
use pilegrid_core::Point;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Ordered point indices believed to form one physical row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chain(Vec<usize>);

impl Chain {
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_indices(self) -> Vec<usize> {
        self.0
    }
}

/// Angle between two unit vectors, in degrees.
fn turn_deg(a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    a.dot(b).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Pick the next hop from `candidates` (unvisited, nearest first).
///
/// With an established heading the smallest turn within `max_turn_deg` wins.
/// If no candidate qualifies, the nearest one is taken anyway; that hop may
/// bend the chain onto a different row.
fn next_hop<'a>(
    candidates: &[&'a ChainEdge],
    heading: Option<&Vector2<f64>>,
    max_turn_deg: f64,
) -> Option<&'a ChainEdge> {
    let nearest = candidates.first().copied()?;
    let Some(heading) = heading else {
        return Some(nearest);
    };

    let mut best: Option<(&ChainEdge, f64)> = None;
    for &edge in candidates {
        let turn = turn_deg(heading, &edge.direction);
        if turn > max_turn_deg {
            continue;
        }
        if best.is_none_or(|(_, best_turn)| turn < best_turn) {
            best = Some((edge, turn));
        }
    }

    Some(best.map_or(nearest, |(edge, _)| edge))
}

fn walk(graph: &ChainGraph, start: usize, visited: &mut [bool], max_turn_deg: f64) -> Vec<usize> {
    let mut chain = vec![start];
    visited[start] = true;

    let mut tail = start;
    let mut heading: Option<Vector2<f64>> = None;

    loop {
        let candidates: Vec<&ChainEdge> = graph.neighbors[tail]
            .iter()
            .filter(|e| !visited[e.index])
            .collect();

        let Some(edge) = next_hop(&candidates, heading.as_ref(), max_turn_deg) else {
            break;
        };

        visited[edge.index] = true;
        chain.push(edge.index);
        heading = Some(edge.direction);
        tail = edge.index;
    }

    chain
}

/// Decompose `points` into direction-consistent chains.
///
/// Starting points are taken in ascending index order and every point is
/// visited at most once, so the result is deterministic and the chains are
/// disjoint. Points of discarded short chains stay visited and belong to no
/// chain.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(points, params), fields(points = points.len()))
)]
pub fn find_chains(points: &[Point], params: &ChainSearchParams) -> Vec<Chain> {
    let graph = ChainGraph::new(points, params);
    let mut visited = vec![false; graph.len()];
    let mut chains = Vec::new();
    let mut discarded = 0usize;

    for start in 0..graph.len() {
        if visited[start] {
            continue;
        }

        let chain = walk(&graph, start, &mut visited, params.angle_threshold_deg);
        if chain.len() >= params.min_chain_length {
            chains.push(Chain(chain));
        } else {
            discarded += chain.len();
        }
    }

    debug!(
        "chain search: {} points, {} edges, {} chains kept, {} points in short chains",
        points.len(),
        graph.edge_count(),
        chains.len(),
        discarded
    );

    chains
}

/// Sorted, deduplicated union of all chain indices.
pub fn chain_members(chains: &[Chain]) -> Vec<usize> {
    let mut members: Vec<usize> = chains.iter().flat_map(|c| c.0.iter().copied()).collect();
    members.sort_unstable();
    members.dedup();
    members
}
