use crate::traversal::Chain;
use log::debug;
use pilegrid_core::Point;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Interpolate points missing between consecutive chain members.
///
/// For a pair at distance `d`, `round(d / spacing) + 1` evenly spaced points
/// (both ends included) are expected. When that is more than two and
/// `d / spacing <= max_gap_ratio`, the missing interior points are inserted
/// on the straight segment. Wider gaps are treated as real breaks in the row.
///
/// Returns only the new points, in chain order.
///
/// # Panics
///
/// If `spacing` is not a positive finite number.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(points, chains), fields(chains = chains.len()))
)]
pub fn complete_chains(
    points: &[Point],
    chains: &[Chain],
    spacing: f64,
    max_gap_ratio: f64,
) -> Vec<Point> {
    assert!(
        spacing.is_finite() && spacing > 0.0,
        "chain completion needs a positive spacing, got {spacing}"
    );

    let mut added = Vec::new();
    let mut skipped_wide = 0usize;

    for chain in chains {
        for pair in chain.indices().windows(2) {
            let (a, b) = (points[pair[0]], points[pair[1]]);
            let ratio = (b - a).norm() / spacing;
            let expected = ratio.round() as usize + 1;
            if expected <= 2 {
                continue;
            }
            if ratio > max_gap_ratio {
                skipped_wide += 1;
                continue;
            }

            let steps = (expected - 1) as f64;
            for k in 1..expected - 1 {
                let t = k as f64 / steps;
                added.push(a + (b - a) * t);
            }
        }
    }

    debug!(
        "chain completion: {} points interpolated, {} wide gaps left open",
        added.len(),
        skipped_wide
    );

    added
}
