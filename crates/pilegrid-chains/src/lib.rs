//! Chain discovery over detection centers.
//!
//! Piles of a solar installation stand in rows. This crate recovers those rows
//! from a noisy point cloud:
//! 1. Build a directed proximity graph: every point links to each neighbor
//!    within `search_radius` whose edge is mostly horizontal or mostly
//!    vertical ([`ChainGraph`]).
//! 2. Walk the graph greedily from each unvisited point (ascending index),
//!    always preferring the neighbor that best continues the current heading
//!    ([`find_chains`]).
//! 3. Drop chains shorter than `min_chain_length`.
//! 4. Interpolate missing points inside each chain at the characteristic
//!    spacing ([`complete_chains`]).

mod completion;
mod graph;
mod params;
mod traversal;

pub use completion::complete_chains;
pub use graph::{ChainEdge, ChainGraph, EdgeAxis};
pub use params::ChainSearchParams;
pub use traversal::{chain_members, find_chains, Chain};
