use pilegrid_core::{CorrectionStats, Detection, Direction};
use pilegrid_fit::{CurveFit, FitError};
use serde::{Deserialize, Serialize};

/// Which of the two mutually exclusive pipelines ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineKind {
    Ransac,
    Chains,
}

/// What the curve-fitting stage did.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FitSummary {
    /// The model was applied.
    Fitted {
        inliers: usize,
        corrected: usize,
        coeffs: Vec<f64>,
    },
    InsufficientData,
    /// A model was found but discarded by the local sanity check.
    Unreliable { corrected: usize },
    /// The regression failed; points were left untouched.
    Failed { error: String },
}

impl From<&CurveFit> for FitSummary {
    fn from(fit: &CurveFit) -> Self {
        match fit {
            CurveFit::Fitted {
                model,
                inliers,
                corrected,
                ..
            } => FitSummary::Fitted {
                inliers: *inliers,
                corrected: *corrected,
                coeffs: model.coeffs.clone(),
            },
            CurveFit::InsufficientData => FitSummary::InsufficientData,
            CurveFit::Unreliable { corrected, .. } => FitSummary::Unreliable {
                corrected: *corrected,
            },
        }
    }
}

impl From<&FitError> for FitSummary {
    fn from(err: &FitError) -> Self {
        FitSummary::Failed {
            error: err.to_string(),
        }
    }
}

/// Intermediate values of a correction run, for reports and debugging.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorrectionDiagnostics {
    pub pipeline: PipelineKind,
    /// Median nearest-neighbor distance of the input centers.
    pub spacing: Option<f64>,
    pub direction: Option<Direction>,
    pub curve_fit: Option<FitSummary>,
    pub grid_added: usize,
    /// Chains on the full point set.
    pub chains_found: usize,
    /// Chains on the filtered point set.
    pub chains_completed: usize,
    pub search_radius: Option<f64>,
}

impl CorrectionDiagnostics {
    pub(crate) fn new(pipeline: PipelineKind) -> Self {
        Self {
            pipeline,
            spacing: None,
            direction: None,
            curve_fit: None,
            grid_added: 0,
            chains_found: 0,
            chains_completed: 0,
            search_radius: None,
        }
    }
}

/// Output of a correction run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorrectionResult {
    pub detections: Vec<Detection>,
    pub stats: CorrectionStats,
    pub diagnostics: CorrectionDiagnostics,
}

impl CorrectionResult {
    /// Detections the correction invented (grid fill or chain completion).
    ///
    /// Both pipelines append new detections after the kept ones.
    pub fn synthesized(&self) -> &[Detection] {
        let kept = self
            .stats
            .original_count
            .saturating_sub(self.stats.removed_count);
        self.detections.get(kept..).unwrap_or_default()
    }
}
