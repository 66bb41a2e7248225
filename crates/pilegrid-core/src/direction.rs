//! Dominant direction of a point cloud from its principal axes.

use crate::Point;
use nalgebra::Matrix2;
use serde::{Deserialize, Serialize};

/// Fraction of total variance the first principal axis must explain for the
/// cloud to count as directional.
pub const DIRECTION_VARIANCE_RATIO: f64 = 0.7;

const MIN_TOTAL_VARIANCE: f64 = 1e-12;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Horizontal,
    Vertical,
    Mixed,
}

/// Classify a point cloud as predominantly horizontal, vertical, or neither.
///
/// Fewer than three points, or a cloud with no spread at all, is `Mixed`.
pub fn estimate_direction(points: &[Point]) -> Direction {
    let n = points.len();
    if n < 3 {
        return Direction::Mixed;
    }

    let inv_n = 1.0 / n as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    let (cx, cy) = (sx * inv_n, sy * inv_n);

    let mut cov = Matrix2::<f64>::zeros();
    for p in points {
        let dx = p.x - cx;
        let dy = p.y - cy;
        cov[(0, 0)] += dx * dx;
        cov[(0, 1)] += dx * dy;
        cov[(1, 1)] += dy * dy;
    }
    cov[(1, 0)] = cov[(0, 1)];
    cov *= inv_n;

    let total = cov.trace();
    if !total.is_finite() || total < MIN_TOTAL_VARIANCE {
        return Direction::Mixed;
    }

    let eig = cov.symmetric_eigen();
    let major = if eig.eigenvalues[0] >= eig.eigenvalues[1] {
        0
    } else {
        1
    };
    let ratio = eig.eigenvalues[major] / total;
    if ratio <= DIRECTION_VARIANCE_RATIO {
        return Direction::Mixed;
    }

    let axis = eig.eigenvectors.column(major);
    if axis[0].abs() > axis[1].abs() {
        Direction::Horizontal
    } else {
        Direction::Vertical
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;

    fn line(slope: f64) -> Vec<Point> {
        (0..=20)
            .map(|x| Point::new(x as f64, slope * x as f64 + 3.0))
            .collect()
    }

    fn transpose(points: &[Point]) -> Vec<Point> {
        points.iter().map(|p| Point::new(p.y, p.x)).collect()
    }

    #[test]
    fn shallow_row_is_horizontal() {
        let pts = line(0.1);
        assert_eq!(estimate_direction(&pts), Direction::Horizontal);
        assert_eq!(estimate_direction(&transpose(&pts)), Direction::Vertical);
    }

    #[test]
    fn steep_row_is_vertical() {
        // y spans ten times the x range, so the principal axis points along y.
        let pts = line(10.0);
        assert_eq!(estimate_direction(&pts), Direction::Vertical);
        assert_eq!(estimate_direction(&transpose(&pts)), Direction::Horizontal);
    }

    #[test]
    fn uniform_cloud_is_mixed() {
        let mut rng = StdRng::seed_from_u64(7);
        let pts: Vec<Point> = (0..200)
            .map(|_| Point::new(rng.gen_range(0.0..1000.0), rng.gen_range(0.0..1000.0)))
            .collect();
        assert_eq!(estimate_direction(&pts), Direction::Mixed);
    }

    #[test]
    fn degenerate_inputs_are_mixed() {
        assert_eq!(estimate_direction(&[]), Direction::Mixed);
        assert_eq!(
            estimate_direction(&[Point::new(0.0, 0.0), Point::new(10.0, 0.0)]),
            Direction::Mixed
        );
        let same = vec![Point::new(4.0, 4.0); 5];
        assert_eq!(estimate_direction(&same), Direction::Mixed);
    }
}
