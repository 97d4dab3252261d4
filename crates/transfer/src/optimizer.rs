//! Weighted multi-objective selection between transfer alternatives.
//!
//! Only the Hohmann and bi-elliptic transfers are compared; Lambert arcs need a flight
//! time and are not part of this selection path.

use planner_core::constants::MU_EARTH_M3_S2;
use planner_core::time::days_to_seconds;
use planner_core::vector::Vector3;
use planner_impulsive::{IntermediateRadius, TransferError, TransferResult, bi_elliptic, hohmann};
use serde::Serialize;
use tracing::debug;

use crate::validator::TrajectoryValidator;

/// Relative importance of each objective. Weights need not sum to one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Weights {
    pub fuel_efficiency: f64,
    pub travel_time: f64,
    pub safety_score: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            fuel_efficiency: 0.4,
            travel_time: 0.3,
            safety_score: 0.3,
        }
    }
}

/// Mission limits accepted alongside an optimisation request.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransferConstraints {
    pub max_delta_v_m_s: Option<f64>,
    pub max_transfer_time_s: Option<f64>,
}

/// Source of the 0-1 safety term used when scoring alternatives.
pub trait SafetyScorer: Send + Sync {
    fn score(&self, result: &TransferResult) -> f64;
}

/// Assigns the same safety score to every alternative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaceholderSafety(pub f64);

impl Default for PlaceholderSafety {
    fn default() -> Self {
        PlaceholderSafety(0.8)
    }
}

impl SafetyScorer for PlaceholderSafety {
    fn score(&self, _result: &TransferResult) -> f64 {
        self.0
    }
}

/// Uses the rule-based validator's 0-100 score, rescaled to 0-1.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ValidatorSafety(pub TrajectoryValidator);

impl SafetyScorer for ValidatorSafety {
    fn score(&self, result: &TransferResult) -> f64 {
        self.0.validate(result).safety_score / 100.0
    }
}

/// One candidate transfer together with its normalised objective scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredAlternative {
    pub trajectory: TransferResult,
    pub fuel_score: f64,
    pub time_score: f64,
    pub safety_score: f64,
    pub optimization_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeOffs {
    pub best_fuel_efficiency: f64,
    pub shortest_time_s: f64,
    pub optimization_weights: Weights,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationResult {
    /// Index into `alternatives` of the selected transfer.
    pub optimal_index: usize,
    pub alternatives: Vec<ScoredAlternative>,
    pub trade_offs: TradeOffs,
}

impl OptimizationResult {
    pub fn optimal(&self) -> &ScoredAlternative {
        &self.alternatives[self.optimal_index]
    }
}

/// Scores Hohmann and bi-elliptic alternatives against caller weights.
pub struct TrajectoryOptimizer {
    pub mu_m3_s2: f64,
    pub intermediate_radius: IntermediateRadius,
    /// Transfer time at which the time score reaches zero.
    pub time_horizon_s: f64,
    safety: Box<dyn SafetyScorer>,
}

impl Default for TrajectoryOptimizer {
    fn default() -> Self {
        Self::new(
            MU_EARTH_M3_S2,
            IntermediateRadius::default(),
            days_to_seconds(7.0),
        )
    }
}

impl std::fmt::Debug for TrajectoryOptimizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrajectoryOptimizer")
            .field("mu_m3_s2", &self.mu_m3_s2)
            .field("intermediate_radius", &self.intermediate_radius)
            .field("time_horizon_s", &self.time_horizon_s)
            .finish_non_exhaustive()
    }
}

impl TrajectoryOptimizer {
    /// Optimizer for the given body and bi-elliptic policy, scoring safety with the placeholder.
    pub fn new(mu_m3_s2: f64, intermediate_radius: IntermediateRadius, time_horizon_s: f64) -> Self {
        Self {
            mu_m3_s2,
            intermediate_radius,
            time_horizon_s,
            safety: Box::new(PlaceholderSafety::default()),
        }
    }

    /// Swap in a different safety scoring strategy.
    pub fn with_safety(mut self, safety: impl SafetyScorer + 'static) -> Self {
        self.safety = Box::new(safety);
        self
    }

    /// Evaluate the alternatives in the fixed order `[hohmann, bi_elliptic]` and pick the
    /// highest weighted score; ties keep the earlier alternative.
    pub fn optimize(
        &self,
        start: &Vector3,
        end: &Vector3,
        // TODO: drop alternatives that exceed these limits before ranking
        _constraints: &TransferConstraints,
        weights: &Weights,
    ) -> Result<OptimizationResult, TransferError> {
        let candidates = [
            hohmann(start, end, self.mu_m3_s2)?,
            bi_elliptic(start, end, self.mu_m3_s2, self.intermediate_radius)?,
        ];

        let alternatives: Vec<ScoredAlternative> = candidates
            .into_iter()
            .map(|trajectory| self.score(trajectory, weights))
            .collect();

        let mut optimal_index = 0;
        for (idx, alt) in alternatives.iter().enumerate().skip(1) {
            if alt.optimization_score > alternatives[optimal_index].optimization_score {
                optimal_index = idx;
            }
        }

        let best_fuel_efficiency = alternatives
            .iter()
            .map(|alt| alt.trajectory.fuel_efficiency)
            .fold(f64::NEG_INFINITY, f64::max);
        let shortest_time_s = alternatives
            .iter()
            .map(|alt| alt.trajectory.transfer_time_s)
            .fold(f64::INFINITY, f64::min);

        debug!(
            optimal = %alternatives[optimal_index].trajectory.trajectory_type,
            score = alternatives[optimal_index].optimization_score,
            "optimizer selection"
        );

        Ok(OptimizationResult {
            optimal_index,
            alternatives,
            trade_offs: TradeOffs {
                best_fuel_efficiency,
                shortest_time_s,
                optimization_weights: *weights,
            },
        })
    }

    fn score(&self, trajectory: TransferResult, weights: &Weights) -> ScoredAlternative {
        let fuel_score = trajectory.fuel_efficiency / 100.0;
        let time_score = (1.0 - trajectory.transfer_time_s / self.time_horizon_s).max(0.0);
        let safety_score = self.safety.score(&trajectory);
        let optimization_score = weights.fuel_efficiency * fuel_score
            + weights.travel_time * time_score
            + weights.safety_score * safety_score;

        debug!(
            trajectory = %trajectory.trajectory_type,
            fuel_score,
            time_score,
            safety_score,
            optimization_score,
            "scored alternative"
        );

        ScoredAlternative {
            trajectory,
            fuel_score,
            time_score,
            safety_score,
            optimization_score,
        }
    }
}
