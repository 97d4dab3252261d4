//! Transfer façade crate: trajectory selection, validation, and method dispatch.

pub mod optimizer;
pub mod validator;

pub use facade::*;
pub use optimizer::{
    OptimizationResult, PlaceholderSafety, SafetyScorer, ScoredAlternative, TradeOffs,
    TrajectoryOptimizer, TransferConstraints, ValidatorSafety, Weights,
};
pub use planner_impulsive as impulsive;
pub use validator::{TrajectoryMetrics, TrajectoryValidator, ValidationReport, ValidationThresholds};

mod facade;
