//! Characteristic spacing of a point cloud.
//!
//! The expected step between neighboring piles is estimated as the median of
//! every point's nearest-neighbor distance. The median keeps a handful of
//! isolated false positives (large NN distances) and duplicates (zero NN
//! distance) from skewing the estimate.

use crate::{Point, PointIndex};

/// Distance from each point to its nearest *other* point, in input order.
///
/// Returns an empty vector for fewer than two points.
pub fn nearest_neighbor_distances(points: &[Point]) -> Vec<f64> {
    if points.len() < 2 {
        return Vec::new();
    }

    let index = PointIndex::new(points);
    (0..points.len())
        .map(|i| index.nearest_other_distance(i).unwrap_or(f64::INFINITY))
        .collect()
}

/// Median nearest-neighbor distance, or `None` for fewer than two points.
pub fn characteristic_spacing(points: &[Point]) -> Option<f64> {
    median(&nearest_neighbor_distances(points))
}

/// Median of a slice; even-length inputs average the two middle values.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some(0.5 * (sorted[mid - 1] + sorted[mid]))
    } else {
        Some(sorted[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn row_spacing_is_recovered() {
        let pts: Vec<Point> = (0..10).map(|i| Point::new(i as f64 * 12.5, 40.0)).collect();
        let nn = nearest_neighbor_distances(&pts);
        assert_eq!(nn.len(), pts.len());
        for d in nn {
            assert_relative_eq!(d, 12.5, epsilon = 1e-9);
        }
        assert_relative_eq!(characteristic_spacing(&pts).unwrap(), 12.5, epsilon = 1e-9);
    }

    #[test]
    fn isolated_outlier_does_not_move_the_median() {
        let mut pts: Vec<Point> = (0..9).map(|i| Point::new(i as f64 * 10.0, 0.0)).collect();
        pts.push(Point::new(500.0, 500.0));
        assert_relative_eq!(characteristic_spacing(&pts).unwrap(), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn duplicates_have_zero_distance() {
        let pts = vec![
            Point::new(5.0, 5.0),
            Point::new(5.0, 5.0),
            Point::new(25.0, 5.0),
        ];
        let nn = nearest_neighbor_distances(&pts);
        assert_relative_eq!(nn[0], 0.0);
        assert_relative_eq!(nn[1], 0.0);
        assert_relative_eq!(nn[2], 20.0, epsilon = 1e-9);
    }

    #[test]
    fn many_identical_points_have_zero_spacing() {
        let pts = vec![Point::new(120.0, 80.0); 40];
        let nn = nearest_neighbor_distances(&pts);
        assert_eq!(nn, vec![0.0; 40]);
        assert_eq!(characteristic_spacing(&pts), Some(0.0));
    }

    #[test]
    fn too_few_points_have_no_spacing() {
        assert!(characteristic_spacing(&[]).is_none());
        assert!(characteristic_spacing(&[Point::new(1.0, 1.0)]).is_none());
    }

    #[test]
    fn median_of_even_length_averages_middle() {
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[]), None);
    }
}
