//! Geometric correction of pile detections from aerial images of solar
//! installations.
//!
//! This crate re-exports the `pilegrid-*` workspace and ships the `pilegrid`
//! command-line tool (feature `cli`).
//!
//! ## API map
//! - `pilegrid::core`: detections, points, spacing and direction estimation.
//! - `pilegrid::chains`: chain discovery and chain completion.
//! - `pilegrid::fit`: RANSAC row fitting and lattice gap filling.
//! - `pilegrid::correct`: the two correction pipelines and their JSON config.
//!
//! ## Quickstart
//!
//! ```
//! use pilegrid::{apply_geometric_correction, CorrectionParams, Detection, ImageExtent};
//!
//! # fn main() -> Result<(), pilegrid::CorrectionError> {
//! let detections = vec![
//!     Detection::new([20.0, 30.0, 30.0, 30.0], 0.9, 0),
//!     Detection::new([110.0, 160.0, 30.0, 30.0], 0.8, 0),
//!     Detection::new([200.0, 280.0, 30.0, 30.0], 0.7, 0),
//! ];
//! let params = CorrectionParams {
//!     ransac_degree: 1,
//!     ..CorrectionParams::default()
//! };
//! let result = apply_geometric_correction(&detections, ImageExtent::new(400.0, 400.0), &params)?;
//! assert!(result.stats.corrected_count >= 3);
//! # Ok(())
//! # }
//! ```

pub use pilegrid_chains as chains;
pub use pilegrid_core as core;
pub use pilegrid_correct as correct;
pub use pilegrid_fit as fit;

pub use pilegrid_core::{CorrectionStats, Detection, ImageExtent, Point};
pub use pilegrid_correct::{
    apply_chain_based_correction, apply_geometric_correction, CorrectionError, CorrectionParams,
    CorrectionResult, GeometryCorrector,
};
