use log::{debug, warn};
use pilegrid_core::{ImageExtent, Point, PointIndex};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Lower and upper acceptance bounds, as fractions of the spacing.
const BAND: (f64, f64) = (0.5, 0.9);

/// Largest lattice [`grid_gap_candidates`] will scan. Each node costs one
/// nearest-neighbor query.
pub const MAX_LATTICE_NODES: usize = 4_000_000;

/// Axis-aligned region the candidate lattice is laid over.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatticeWindow {
    pub min: Point,
    pub max: Point,
}

impl LatticeWindow {
    pub fn contains(&self, p: &Point) -> bool {
        (self.min.x..=self.max.x).contains(&p.x) && (self.min.y..=self.max.y).contains(&p.y)
    }

    /// Lattice columns and rows for `spacing`. Saturates instead of
    /// overflowing for tiny spacings.
    pub fn dims(&self, spacing: f64) -> (usize, usize) {
        let count = |span: f64| ((span / spacing).floor() as usize).saturating_add(1);
        (count(self.max.x - self.min.x), count(self.max.y - self.min.y))
    }

    /// Lattice nodes anchored at `min`, `spacing` apart, not beyond `max`.
    fn nodes(&self, spacing: f64) -> impl Iterator<Item = Point> + '_ {
        let (nx, ny) = self.dims(spacing);
        (0..ny).flat_map(move |j| {
            (0..nx).map(move |i| {
                Point::new(
                    self.min.x + i as f64 * spacing,
                    self.min.y + j as f64 * spacing,
                )
            })
        })
    }
}

/// Bounding box of `points` grown by one `spacing` on every side and clipped
/// to the image. `None` for an empty set or when nothing is left after
/// clipping.
pub fn lattice_window(points: &[Point], extent: ImageExtent, spacing: f64) -> Option<LatticeWindow> {
    let first = points.first()?;
    let (mut min, mut max) = (*first, *first);
    for p in &points[1..] {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }

    let min = Point::new((min.x - spacing).max(0.0), (min.y - spacing).max(0.0));
    let max = Point::new(
        (max.x + spacing).min(extent.width),
        (max.y + spacing).min(extent.height),
    );

    (min.x <= max.x && min.y <= max.y).then_some(LatticeWindow { min, max })
}

/// Lattice points that plausibly fill a gap next to the existing cloud.
///
/// A candidate is kept when its distance to the nearest existing point lies
/// in `[0.5 * spacing, 0.9 * spacing]`. Only the window returned by
/// [`lattice_window`] is searched, so an empty set yields nothing.
///
/// Cost grows with the window area over `spacing²`. A lattice of more than
/// [`MAX_LATTICE_NODES`] nodes is not scanned and nothing is proposed.
///
/// # Panics
///
/// If `spacing` is not a positive finite number.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(points), fields(points = points.len()))
)]
pub fn grid_gap_candidates(points: &[Point], extent: ImageExtent, spacing: f64) -> Vec<Point> {
    assert!(
        spacing.is_finite() && spacing > 0.0,
        "grid fill needs a positive spacing, got {spacing}"
    );

    let Some(window) = lattice_window(points, extent, spacing) else {
        return Vec::new();
    };

    let (nx, ny) = window.dims(spacing);
    if nx.saturating_mul(ny) > MAX_LATTICE_NODES {
        warn!(
            "grid fill skipped: {nx}x{ny} lattice at spacing {spacing} exceeds {MAX_LATTICE_NODES} nodes"
        );
        return Vec::new();
    }

    let index = PointIndex::new(points);
    let (lo, hi) = (BAND.0 * spacing, BAND.1 * spacing);

    let mut examined = 0usize;
    let accepted: Vec<Point> = window
        .nodes(spacing)
        .filter(|c| {
            examined += 1;
            index
                .nearest_distance(c)
                .is_some_and(|d| (lo..=hi).contains(&d))
        })
        .collect();

    debug!(
        "grid fill: {} of {} lattice points accepted in [{:.1}, {:.1}]",
        accepted.len(),
        examined,
        lo,
        hi
    );

    accepted
}

/// `points` followed by the accepted [`grid_gap_candidates`].
pub fn fill_grid(points: &[Point], extent: ImageExtent, spacing: f64) -> Vec<Point> {
    let mut out = points.to_vec();
    out.extend(grid_gap_candidates(points, extent, spacing));
    out
}
