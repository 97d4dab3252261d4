//! Impulsive transfer utilities: Lambert solver and classical transfer approximations.

pub mod error;
pub mod lambert;
pub mod result;
pub mod transfers;

pub use error::TransferError;
pub use lambert::{ConvergenceMode, LambertOptions, LambertSolver};
pub use result::{LambertDetails, TrajectoryType, TransferResult};
pub use transfers::{IntermediateRadius, bi_elliptic, hohmann};
