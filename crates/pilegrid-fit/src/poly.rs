use crate::FitError;
use nalgebra::{DMatrix, DVector};
use pilegrid_core::{Direction, Point};
use serde::{Deserialize, Serialize};

const RANK_EPS: f64 = 1e-10;

/// Which coordinate is the independent variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitAxis {
    /// `y = f(x)`.
    YOfX,
    /// `x = f(y)`.
    XOfY,
}

impl FitAxis {
    /// Vertical rows are fit as `x = f(y)`; everything else as `y = f(x)`.
    pub fn from_direction(direction: Option<Direction>) -> Self {
        match direction {
            Some(Direction::Vertical) => FitAxis::XOfY,
            _ => FitAxis::YOfX,
        }
    }

    /// `(independent, dependent)` coordinates of `p`.
    #[inline]
    pub fn split(self, p: &Point) -> (f64, f64) {
        match self {
            FitAxis::YOfX => (p.x, p.y),
            FitAxis::XOfY => (p.y, p.x),
        }
    }

    #[inline]
    pub fn join(self, t: f64, v: f64) -> Point {
        match self {
            FitAxis::YOfX => Point::new(t, v),
            FitAxis::XOfY => Point::new(v, t),
        }
    }
}

/// Polynomial `v = sum_k c_k * u^k` with `u = (t - shift) / scale`.
///
/// The independent variable is centered and scaled before building powers so
/// that cubic terms of multi-thousand-pixel coordinates stay well conditioned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolyModel {
    pub axis: FitAxis,
    pub degree: usize,
    /// Coefficients in ascending power order (bias first).
    pub coeffs: Vec<f64>,
    pub shift: f64,
    pub scale: f64,
}

impl PolyModel {
    #[inline]
    pub fn evaluate(&self, t: f64) -> f64 {
        let u = (t - self.shift) / self.scale;
        self.coeffs.iter().rev().fold(0.0, |acc, c| acc * u + c)
    }

    /// Project `p` onto the curve along the dependent axis.
    #[inline]
    pub fn predict(&self, p: &Point) -> Point {
        let (t, _) = self.axis.split(p);
        self.axis.join(t, self.evaluate(t))
    }

    /// Signed residual of `p` along the dependent axis.
    #[inline]
    pub fn residual(&self, p: &Point) -> f64 {
        let (t, v) = self.axis.split(p);
        v - self.evaluate(t)
    }
}

/// Centering and scaling of the independent variable over the whole set.
pub(crate) fn normalization(ts: &[f64]) -> Result<(f64, f64), FitError> {
    if ts.is_empty() {
        return Err(FitError::Degenerate);
    }
    let shift = ts.iter().sum::<f64>() / ts.len() as f64;
    let scale = ts.iter().map(|t| (t - shift).abs()).fold(0.0, f64::max);
    if !scale.is_finite() || scale <= f64::EPSILON {
        return Err(FitError::Degenerate);
    }
    Ok((shift, scale))
}

/// Least-squares polynomial through the `(t, v)` pairs selected by `idx`.
pub(crate) fn fit_poly(
    ts: &[f64],
    vs: &[f64],
    idx: &[usize],
    axis: FitAxis,
    degree: usize,
    (shift, scale): (f64, f64),
) -> Result<PolyModel, FitError> {
    let cols = degree + 1;
    let mut a = DMatrix::<f64>::zeros(idx.len(), cols);
    let mut b = DVector::<f64>::zeros(idx.len());

    for (row, &i) in idx.iter().enumerate() {
        let u = (ts[i] - shift) / scale;
        let mut pow = 1.0;
        for col in 0..cols {
            a[(row, col)] = pow;
            pow *= u;
        }
        b[row] = vs[i];
    }

    let svd = a.svd(true, true);
    let rank = svd.rank(RANK_EPS);
    if rank < cols {
        return Err(FitError::RankDeficient { rank, needed: cols });
    }
    let x = svd.solve(&b, RANK_EPS).map_err(FitError::Solver)?;

    Ok(PolyModel {
        axis,
        degree,
        coeffs: x.iter().copied().collect(),
        shift,
        scale,
    })
}
