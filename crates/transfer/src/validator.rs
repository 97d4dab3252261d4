//! Rule-based safety and feasibility grading of a computed trajectory.

use planner_core::time::days_to_seconds;
use planner_impulsive::TransferResult;
use serde::Serialize;
use tracing::debug;

const DELTA_V_PENALTY: f64 = 30.0;
const DURATION_PENALTY: f64 = 20.0;
const EFFICIENCY_PENALTY: f64 = 25.0;

/// Limits the validator grades against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationThresholds {
    pub max_delta_v_m_s: f64,
    pub max_transfer_time_s: f64,
    pub min_fuel_efficiency: f64,
    /// Lowest safety score that still counts as valid.
    pub passing_score: f64,
}

impl Default for ValidationThresholds {
    fn default() -> Self {
        Self {
            max_delta_v_m_s: 20_000.0,
            max_transfer_time_s: days_to_seconds(10.0),
            min_fuel_efficiency: 50.0,
            passing_score: 50.0,
        }
    }
}

/// The subset of a trajectory record the rules look at.
///
/// A missing field never triggers its rule.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrajectoryMetrics {
    pub delta_v_total_m_s: Option<f64>,
    pub transfer_time_s: Option<f64>,
    pub fuel_efficiency: Option<f64>,
}

impl From<&TransferResult> for TrajectoryMetrics {
    fn from(result: &TransferResult) -> Self {
        Self {
            delta_v_total_m_s: Some(result.delta_v_total_m_s),
            transfer_time_s: Some(result.transfer_time_s),
            fuel_efficiency: Some(result.fuel_efficiency),
        }
    }
}

/// Outcome of grading a trajectory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
    /// 0-100, starting from 100 and reduced by each triggered rule.
    pub safety_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrajectoryValidator {
    pub thresholds: ValidationThresholds,
}

impl TrajectoryValidator {
    pub fn new(thresholds: ValidationThresholds) -> Self {
        Self { thresholds }
    }

    /// Apply every rule in fixed order and collect the resulting issues.
    pub fn validate(&self, trajectory: impl Into<TrajectoryMetrics>) -> ValidationReport {
        let metrics = trajectory.into();
        let limits = &self.thresholds;
        let mut report = ValidationReport {
            is_valid: false,
            issues: Vec::new(),
            recommendations: Vec::new(),
            safety_score: 100.0,
        };

        if metrics.delta_v_total_m_s.unwrap_or(0.0) > limits.max_delta_v_m_s {
            report.penalise(
                DELTA_V_PENALTY,
                "Excessive delta-V requirement",
                "Consider alternative trajectory with lower fuel requirements",
            );
        }

        if metrics.transfer_time_s.unwrap_or(0.0) > limits.max_transfer_time_s {
            report.penalise(
                DURATION_PENALTY,
                "Extended transfer time increases risk",
                "Optimize for shorter transfer time",
            );
        }

        if metrics.fuel_efficiency.unwrap_or(100.0) < limits.min_fuel_efficiency {
            report.penalise(
                EFFICIENCY_PENALTY,
                "Low fuel efficiency",
                "Improve trajectory optimization",
            );
        }

        report.safety_score = report.safety_score.max(0.0);
        report.is_valid = report.safety_score >= limits.passing_score;
        report
    }
}

impl ValidationReport {
    fn penalise(&mut self, penalty: f64, issue: &str, recommendation: &str) {
        debug!(penalty, issue, "trajectory rule triggered");
        self.safety_score -= penalty;
        self.issues.push(issue.to_string());
        self.recommendations.push(recommendation.to_string());
    }
}
