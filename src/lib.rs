//! Impulsive orbital transfer planning.
//!
//! The engine lives in the member crates; this crate re-exports them so front-ends and
//! integration tests can depend on a single package.

pub use planner_config as config;
pub use planner_core::{constants, time, units, vector};
pub use planner_export as export;
pub use planner_impulsive as impulsive;
pub use planner_transfer as transfer;
