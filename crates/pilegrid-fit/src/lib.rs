//! Robust row fitting and gap filling.
//!
//! - [`fit_curve`]: RANSAC fit of a degree 1-3 polynomial through detection
//!   centers, applied only to points the model explains locally.
//! - [`fill_grid`]: propose lattice points in plausible gaps next to the
//!   existing cloud.

mod error;
mod grid_fill;
mod poly;
mod ransac;

pub use error::FitError;
pub use grid_fill::{
    fill_grid, grid_gap_candidates, lattice_window, LatticeWindow, MAX_LATTICE_NODES,
};
pub use poly::{FitAxis, PolyModel};
pub use ransac::{fit_curve, CurveFit, CurveFitParams, RansacParams};
