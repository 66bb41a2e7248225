use serde::{Deserialize, Serialize};

/// Parameters of the chain graph and its traversal.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChainSearchParams {
    /// Neighbors farther than this (pixels) are not linked.
    pub search_radius: f64,
    /// Maximal turn (degrees) between consecutive chain edges before the
    /// traversal falls back to an arbitrary neighbor.
    pub angle_threshold_deg: f64,
    /// Chains with fewer points are discarded.
    pub min_chain_length: usize,
    /// An edge is kept only if the larger absolute component of its unit
    /// direction exceeds this value.
    pub axis_consistency: f64,
}

impl Default for ChainSearchParams {
    fn default() -> Self {
        Self {
            search_radius: 100.0,
            angle_threshold_deg: 30.0,
            min_chain_length: 3,
            axis_consistency: 0.5,
        }
    }
}

impl ChainSearchParams {
    pub fn with_radius(search_radius: f64) -> Self {
        Self {
            search_radius,
            ..Self::default()
        }
    }
}
