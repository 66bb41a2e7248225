//! RANSAC polynomial fit with distance-gated correction.

use crate::poly::{fit_poly, normalization};
use crate::{FitAxis, FitError, PolyModel};
use log::{debug, warn};
use pilegrid_core::{Direction, Point};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Fewer points than this never get a model.
const MIN_POINTS: usize = 3;

/// Consensus regression parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RansacParams {
    /// Polynomial degree, 1 to 3.
    pub degree: usize,
    /// A point is an inlier when its residual along the dependent axis is at
    /// most this many pixels.
    pub residual_threshold: f64,
    pub max_trials: usize,
    /// Seed of the sampler; identical input and seed give identical output.
    pub seed: u64,
}

impl Default for RansacParams {
    fn default() -> Self {
        Self {
            degree: 2,
            residual_threshold: 10.0,
            max_trials: 100,
            seed: 42,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CurveFitParams {
    pub ransac: RansacParams,
    /// Points further than this from their predicted position keep their
    /// original coordinates.
    pub max_correction_distance: f64,
}

impl Default for CurveFitParams {
    fn default() -> Self {
        Self {
            ransac: RansacParams::default(),
            max_correction_distance: 25.0,
        }
    }
}

/// Outcome of [`fit_curve`].
#[derive(Clone, Debug, PartialEq)]
pub enum CurveFit {
    /// The model was applied. `points` holds one entry per input point:
    /// projected onto the curve when within the correction distance,
    /// untouched otherwise.
    Fitted {
        model: PolyModel,
        points: Vec<Point>,
        inliers: usize,
        corrected: usize,
    },
    /// Too few points to fit anything; nothing was changed.
    InsufficientData,
    /// Fewer than half of the points lie within the correction distance, so
    /// the model is reported but `points` are the originals.
    Unreliable {
        model: PolyModel,
        points: Vec<Point>,
        corrected: usize,
    },
}

impl CurveFit {
    pub fn model(&self) -> Option<&PolyModel> {
        match self {
            CurveFit::Fitted { model, .. } | CurveFit::Unreliable { model, .. } => Some(model),
            CurveFit::InsufficientData => None,
        }
    }
}

/// Sample `k` distinct indices from `0..n` using a partial Fisher-Yates shuffle.
fn sample_indices(rng: &mut impl Rng, n: usize, k: usize) -> Vec<usize> {
    debug_assert!(k <= n);
    let mut indices: Vec<usize> = (0..n).collect();
    for i in 0..k {
        let j = rng.gen_range(i..n);
        indices.swap(i, j);
    }
    indices.truncate(k);
    indices
}

/// A minimal sample only determines a polynomial if its abscissae differ.
fn has_distinct_abscissae(ts: &[f64], sample: &[usize], tol: f64) -> bool {
    sample.iter().enumerate().all(|(a, &i)| {
        sample[a + 1..]
            .iter()
            .all(|&j| (ts[i] - ts[j]).abs() > tol)
    })
}

/// Consensus winner re-fit on all of its inliers.
fn ransac_poly(
    ts: &[f64],
    vs: &[f64],
    axis: FitAxis,
    params: &RansacParams,
) -> Result<(PolyModel, usize), FitError> {
    let n = ts.len();
    let sample_size = params.degree + 1;
    let norm = normalization(ts)?;
    let tol = norm.1 * 1e-9;

    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut best: Option<(PolyModel, Vec<usize>)> = None;

    for _ in 0..params.max_trials {
        let sample = sample_indices(&mut rng, n, sample_size);
        if !has_distinct_abscissae(ts, &sample, tol) {
            continue;
        }
        let Ok(model) = fit_poly(ts, vs, &sample, axis, params.degree, norm) else {
            continue;
        };

        let inliers: Vec<usize> = (0..n)
            .filter(|&i| (vs[i] - model.evaluate(ts[i])).abs() <= params.residual_threshold)
            .collect();

        let improves = best
            .as_ref()
            .is_none_or(|(_, current)| inliers.len() > current.len());
        if improves {
            let all_in = inliers.len() == n;
            best = Some((model, inliers));
            if all_in {
                break;
            }
        }
    }

    let (sample_model, inliers) = best.ok_or(FitError::NoConsensus {
        trials: params.max_trials,
    })?;

    let model = match fit_poly(ts, vs, &inliers, axis, params.degree, norm) {
        Ok(model) => model,
        Err(err) => {
            debug!("inlier re-fit failed ({err}), keeping sample model");
            sample_model
        }
    };

    Ok((model, inliers.len()))
}

/// Fit a polynomial row model and pull nearby points onto it.
///
/// `direction` picks the independent variable: `Vertical` fits `x = f(y)`,
/// anything else `y = f(x)`. Points whose predicted position is further than
/// `max_correction_distance` away keep their coordinates. If that applies to
/// more than half of the points the fit is reported as
/// [`CurveFit::Unreliable`] and no point moves.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(points, params), fields(points = points.len()))
)]
pub fn fit_curve(
    points: &[Point],
    params: &CurveFitParams,
    direction: Option<Direction>,
) -> Result<CurveFit, FitError> {
    let degree = params.ransac.degree;
    if !(1..=3).contains(&degree) {
        return Err(FitError::InvalidDegree(degree));
    }

    let n = points.len();
    if n < MIN_POINTS.max(degree + 1) {
        warn!("{n} points are too few for a degree-{degree} fit");
        return Ok(CurveFit::InsufficientData);
    }

    let axis = FitAxis::from_direction(direction);
    let (ts, vs): (Vec<f64>, Vec<f64>) = points.iter().map(|p| axis.split(p)).unzip();
    let (model, inliers) = ransac_poly(&ts, &vs, axis, &params.ransac)?;

    let mut corrected_points = Vec::with_capacity(n);
    let mut corrected = 0usize;
    for p in points {
        let predicted = model.predict(p);
        if (predicted - p).norm() <= params.max_correction_distance {
            corrected_points.push(predicted);
            corrected += 1;
        } else {
            corrected_points.push(*p);
        }
    }

    debug!(
        "curve fit {:?} degree {}: {}/{} inliers, {} within {:.1} px",
        axis, degree, inliers, n, corrected, params.max_correction_distance
    );

    if 2 * corrected < n {
        warn!("curve fit explains only {corrected}/{n} points locally, leaving points unchanged");
        return Ok(CurveFit::Unreliable {
            model,
            points: points.to_vec(),
            corrected,
        });
    }

    Ok(CurveFit::Fitted {
        model,
        points: corrected_points,
        inliers,
        corrected,
    })
}
