use planner_core::vector::VectorError;
use thiserror::Error;

/// Failures surfaced by the transfer calculators and the Lambert solver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransferError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid input: unknown transfer method '{0}' (expected hohmann, bi_elliptic or lambert)")]
    UnknownMethod(String),
    #[error(
        "lambert solver did not converge after {iterations} iterations (residual {residual_s:.3e} s, best estimate a = {best_estimate_m:.3} m)"
    )]
    NonConvergence {
        iterations: usize,
        residual_s: f64,
        best_estimate_m: f64,
    },
}

impl From<VectorError> for TransferError {
    fn from(err: VectorError) -> Self {
        TransferError::InvalidInput(err.to_string())
    }
}

impl TransferError {
    /// True for every variant the error taxonomy classes as bad caller input.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            TransferError::InvalidInput(_) | TransferError::UnknownMethod(_)
        )
    }
}
