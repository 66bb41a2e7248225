/// Parameter validation errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParamsError {
    #[error("ransac_degree must be in 1..=3, got {0}")]
    InvalidDegree(usize),
    #[error("{name} must be a positive finite number, got {value}")]
    NotPositive { name: &'static str, value: f64 },
    #[error("grid_spacing must be at least {min} px, got {value}")]
    GridSpacingTooSmall { value: f64, min: f64 },
    #[error("chain_min_length must be >= 2, got {0}")]
    ChainTooShort(usize),
    #[error("chain_max_gap_ratio must be >= 1, got {0}")]
    InvalidGapRatio(f64),
    #[error("synthesized confidence must be in [0, 1], got {0}")]
    InvalidConfidence(f64),
}

/// Errors returned by the corrector.
#[derive(thiserror::Error, Debug)]
pub enum CorrectionError {
    #[error("invalid correction parameters: {0}")]
    InvalidParams(#[from] ParamsError),
}
