//! Core types and utilities for pile row correction.
//!
//! This crate is intentionally small and purely geometric. It knows nothing
//! about the detector that produced the boxes, nor about images: everything
//! lives in image-pixel space.

mod detection;
mod direction;
mod index;
mod logger;
mod sgf;
mod spacing;
mod stats;

pub use detection::{extract_points, Detection, ImageExtent, Point};
pub use direction::{estimate_direction, Direction, DIRECTION_VARIANCE_RATIO};
pub use index::PointIndex;
pub use sgf::{detections_to_sgf, sgf_to_detections, SgfRecord, SGF_DEFAULT_CONFIDENCE};
pub use spacing::{characteristic_spacing, median, nearest_neighbor_distances};
pub use stats::CorrectionStats;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
