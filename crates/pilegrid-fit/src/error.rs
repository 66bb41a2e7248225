/// Numerical failures of the curve fitter.
///
/// Too few points is not an error; see [`crate::CurveFit::InsufficientData`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FitError {
    #[error("polynomial degree {0} is outside 1..=3")]
    InvalidDegree(usize),
    #[error("all points share the same independent coordinate")]
    Degenerate,
    #[error("design matrix is rank deficient (rank {rank}, need {needed})")]
    RankDeficient { rank: usize, needed: usize },
    #[error("least-squares solve failed: {0}")]
    Solver(&'static str),
    #[error("no usable sample in {trials} trials")]
    NoConsensus { trials: usize },
}
