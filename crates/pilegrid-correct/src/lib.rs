//! Geometric correction of pile detections.
//!
//! Detector output for a solar installation is a noisy cloud of boxes whose
//! true centers lie on regular rows. Two mutually exclusive pipelines clean
//! it up:
//!
//! - **RANSAC + grid** ([`apply_geometric_correction`]): fit one polynomial
//!   row model through all centers, pull nearby centers onto it, then add
//!   lattice points in plausible gaps.
//! - **Chains** ([`apply_chain_based_correction`]): discover direction
//!   consistent chains, drop detections outside every chain, and interpolate
//!   missing piles inside each chain.
//!
//! [`GeometryCorrector`] validates [`CorrectionParams`] once and picks the
//! pipeline from `use_chain_search`.
//!
//! ```
//! use pilegrid_core::{Detection, ImageExtent};
//! use pilegrid_correct::{CorrectionParams, GeometryCorrector};
//!
//! # fn main() -> Result<(), pilegrid_correct::CorrectionError> {
//! let detections: Vec<Detection> = (0..6)
//!     .map(|i| Detection::new([i as f64 * 60.0, 100.0, 40.0, 40.0], 0.9, 0))
//!     .collect();
//! let corrector = GeometryCorrector::new(CorrectionParams::chains())?;
//! let result = corrector.correct(&detections, ImageExtent::new(480.0, 640.0));
//! assert_eq!(result.stats.corrected_count, result.detections.len());
//! # Ok(())
//! # }
//! ```

mod error;
mod io;
mod params;
mod pipeline;
mod result;

pub use error::{CorrectionError, ParamsError};
pub use io::{CorrectionConfig, CorrectionIoError, CorrectionReport, DetectionFormat};
pub use params::{CorrectionParams, SynthesisParams, MIN_GRID_SPACING};
pub use pipeline::{apply_chain_based_correction, apply_geometric_correction, GeometryCorrector};
pub use result::{CorrectionDiagnostics, CorrectionResult, FitSummary, PipelineKind};
