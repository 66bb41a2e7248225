use serde::{Deserialize, Serialize};

/// Before/after counts of a correction run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionStats {
    pub original_count: usize,
    pub corrected_count: usize,
    pub added_count: usize,
    pub removed_count: usize,
}

impl CorrectionStats {
    /// Counts derived from the list sizes alone: the difference is clipped at
    /// zero on either side.
    pub fn from_counts(original_count: usize, corrected_count: usize) -> Self {
        Self {
            original_count,
            corrected_count,
            added_count: corrected_count.saturating_sub(original_count),
            removed_count: original_count.saturating_sub(corrected_count),
        }
    }
}
