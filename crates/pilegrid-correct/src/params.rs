use crate::ParamsError;
use pilegrid_chains::ChainSearchParams;
use pilegrid_core::SGF_DEFAULT_CONFIDENCE;
use pilegrid_fit::{CurveFitParams, RansacParams};
use serde::{Deserialize, Serialize};

/// Smallest accepted `grid_spacing`, in pixels.
pub const MIN_GRID_SPACING: f64 = 1.0;

/// Shape of detections the correction invents.
///
/// Synthesized detections always follow the corrected originals in
/// [`CorrectionResult::detections`](crate::CorrectionResult); use
/// [`CorrectionResult::synthesized`](crate::CorrectionResult::synthesized)
/// to tell them apart rather than their confidence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisParams {
    pub width: f64,
    pub height: f64,
    /// Defaults to [`SGF_DEFAULT_CONFIDENCE`]. A synthesized pile written out
    /// as an SGF record is then indistinguishable from a record that had no
    /// confidence. Set a value the detector never emits (e.g. `0.0`) to keep
    /// them apart after export.
    pub confidence: f64,
    pub category_id: u32,
}

impl Default for SynthesisParams {
    fn default() -> Self {
        Self {
            width: 50.0,
            height: 50.0,
            confidence: SGF_DEFAULT_CONFIDENCE,
            category_id: 0,
        }
    }
}

/// Options of a correction run.
///
/// `use_chain_search` selects the chain pipeline; in that case the RANSAC and
/// grid options are ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectionParams {
    pub use_chain_search: bool,
    pub use_ransac: bool,
    pub use_grid_fill: bool,
    pub ransac_degree: usize,
    /// Inlier residual bound in pixels.
    pub ransac_threshold: f64,
    pub ransac_max_trials: usize,
    pub ransac_seed: u64,
    /// Lower bound of the distance gate; the gate is
    /// `max(spacing / 2, min_correction_distance)`.
    pub min_correction_distance: f64,
    pub grid_spacing: f64,
    /// `None` derives the radius as twice the characteristic spacing.
    pub chain_search_radius: Option<f64>,
    pub chain_angle_threshold: f64,
    pub chain_min_length: usize,
    pub chain_max_gap_ratio: f64,
    pub synthesis: SynthesisParams,
}

impl Default for CorrectionParams {
    fn default() -> Self {
        Self {
            use_chain_search: false,
            use_ransac: true,
            use_grid_fill: true,
            ransac_degree: 2,
            ransac_threshold: 10.0,
            ransac_max_trials: 100,
            ransac_seed: 42,
            min_correction_distance: 10.0,
            grid_spacing: 50.0,
            chain_search_radius: None,
            chain_angle_threshold: 30.0,
            chain_min_length: 3,
            chain_max_gap_ratio: 3.0,
            synthesis: SynthesisParams::default(),
        }
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ParamsError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ParamsError::NotPositive { name, value })
    }
}

impl CorrectionParams {
    /// Chain pipeline defaults.
    pub fn chains() -> Self {
        Self {
            use_chain_search: true,
            ..Self::default()
        }
    }

    /// Check every option, including those the selected pipeline ignores.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if !(1..=3).contains(&self.ransac_degree) {
            return Err(ParamsError::InvalidDegree(self.ransac_degree));
        }
        positive("ransac_threshold", self.ransac_threshold)?;
        positive("min_correction_distance", self.min_correction_distance)?;
        positive("grid_spacing", self.grid_spacing)?;
        if self.grid_spacing < MIN_GRID_SPACING {
            return Err(ParamsError::GridSpacingTooSmall {
                value: self.grid_spacing,
                min: MIN_GRID_SPACING,
            });
        }
        if let Some(radius) = self.chain_search_radius {
            positive("chain_search_radius", radius)?;
        }
        positive("chain_angle_threshold", self.chain_angle_threshold)?;
        if self.chain_min_length < 2 {
            return Err(ParamsError::ChainTooShort(self.chain_min_length));
        }
        if !(self.chain_max_gap_ratio >= 1.0 && self.chain_max_gap_ratio.is_finite()) {
            return Err(ParamsError::InvalidGapRatio(self.chain_max_gap_ratio));
        }
        positive("synthesis.width", self.synthesis.width)?;
        positive("synthesis.height", self.synthesis.height)?;
        if !(0.0..=1.0).contains(&self.synthesis.confidence) {
            return Err(ParamsError::InvalidConfidence(self.synthesis.confidence));
        }
        Ok(())
    }

    /// Curve fitter options for a cloud of the given characteristic spacing.
    pub fn curve_fit(&self, spacing: Option<f64>) -> CurveFitParams {
        let half = spacing.map_or(0.0, |s| s / 2.0);
        CurveFitParams {
            ransac: RansacParams {
                degree: self.ransac_degree,
                residual_threshold: self.ransac_threshold,
                max_trials: self.ransac_max_trials,
                seed: self.ransac_seed,
            },
            max_correction_distance: half.max(self.min_correction_distance),
        }
    }

    /// Chain search options; an unset radius is twice `spacing`.
    pub fn chain_search(&self, spacing: f64) -> ChainSearchParams {
        ChainSearchParams {
            search_radius: self.chain_search_radius.unwrap_or(2.0 * spacing),
            angle_threshold_deg: self.chain_angle_threshold,
            min_chain_length: self.chain_min_length,
            ..ChainSearchParams::default()
        }
    }
}
