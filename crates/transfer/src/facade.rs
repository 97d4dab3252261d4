//! Runtime settings and method dispatch for consumers of the transfer crate.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use planner_config::{ConfigError, ConvergencePolicy, PlannerConfig, load_planner_config};
use planner_core::time::days_to_seconds;
use planner_core::vector::{self, Vector3};
use planner_impulsive::{
    ConvergenceMode, IntermediateRadius, LambertOptions, LambertSolver, TransferError,
    TransferResult, bi_elliptic, hohmann,
};
use serde::Serialize;
use thiserror::Error;

use crate::optimizer::{PlaceholderSafety, TrajectoryOptimizer, Weights};
use crate::validator::{TrajectoryValidator, ValidationThresholds};

/// Errors surfaced while preparing or running a planning request.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Transfer(#[from] TransferError),
}

/// Transfer families a caller can request by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferMethod {
    Hohmann,
    BiElliptic,
    Lambert,
}

impl FromStr for TransferMethod {
    type Err = TransferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hohmann" => Ok(TransferMethod::Hohmann),
            "bi_elliptic" | "bi-elliptic" | "bielliptic" => Ok(TransferMethod::BiElliptic),
            "lambert" => Ok(TransferMethod::Lambert),
            _ => Err(TransferError::UnknownMethod(s.to_string())),
        }
    }
}

impl fmt::Display for TransferMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransferMethod::Hohmann => "hohmann",
            TransferMethod::BiElliptic => "bi_elliptic",
            TransferMethod::Lambert => "lambert",
        })
    }
}

/// Fully resolved planner settings, ready to build solvers from.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerSettings {
    pub mu_m3_s2: f64,
    pub lambert: LambertOptions,
    pub intermediate_radius: IntermediateRadius,
    pub weights: Weights,
    pub time_horizon_s: f64,
    pub placeholder_safety: f64,
    pub validation: ValidationThresholds,
    pub default_transfer_time_s: f64,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self::from_config(&PlannerConfig::default())
    }
}

impl PlannerSettings {
    /// Convert a configuration record into runtime settings.
    pub fn from_config(config: &PlannerConfig) -> Self {
        let convergence = match config.lambert.convergence {
            ConvergencePolicy::Strict => ConvergenceMode::Strict,
            ConvergencePolicy::BestEffort => ConvergenceMode::BestEffort,
        };
        let weights = config.optimizer.weights;

        Self {
            mu_m3_s2: config.physics.mu_m3_s2,
            lambert: LambertOptions {
                max_iterations: config.lambert.max_iterations,
                tolerance_s: config.lambert.tolerance_s,
                convergence,
                long_way: false,
            },
            intermediate_radius: IntermediateRadius::Factor(
                config.bi_elliptic.intermediate_radius_factor,
            ),
            weights: Weights {
                fuel_efficiency: weights.fuel_efficiency,
                travel_time: weights.travel_time,
                safety_score: weights.safety_score,
            },
            time_horizon_s: days_to_seconds(config.optimizer.time_horizon_days),
            placeholder_safety: config.optimizer.placeholder_safety_score,
            validation: ValidationThresholds {
                max_delta_v_m_s: config.validator.max_delta_v_m_s,
                max_transfer_time_s: days_to_seconds(config.validator.max_transfer_days),
                min_fuel_efficiency: config.validator.min_fuel_efficiency,
                passing_score: config.validator.passing_score,
            },
            default_transfer_time_s: config.calculate.default_transfer_time_s,
        }
    }

    /// Load settings from a TOML/YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PlannerError> {
        let config = load_planner_config(path)?;
        Ok(Self::from_config(&config))
    }

    pub fn lambert_solver(&self) -> LambertSolver {
        LambertSolver::new(self.mu_m3_s2).with_options(self.lambert)
    }

    /// Optimizer using the configured placeholder safety score.
    pub fn optimizer(&self) -> TrajectoryOptimizer {
        TrajectoryOptimizer::new(self.mu_m3_s2, self.intermediate_radius, self.time_horizon_s)
            .with_safety(PlaceholderSafety(self.placeholder_safety))
    }

    pub fn validator(&self) -> TrajectoryValidator {
        TrajectoryValidator::new(self.validation)
    }
}

/// Interpret raw numbers as a position vector in metres.
pub fn parse_position(values: &[f64]) -> Result<Vector3, TransferError> {
    Ok(vector::from_slice(values)?)
}

/// Run the requested transfer calculation.
///
/// Lambert falls back to the configured default flight time; the analytic methods ignore
/// `transfer_time_s`.
pub fn calculate(
    settings: &PlannerSettings,
    method: TransferMethod,
    start: &Vector3,
    end: &Vector3,
    transfer_time_s: Option<f64>,
) -> Result<TransferResult, TransferError> {
    match method {
        TransferMethod::Hohmann => hohmann(start, end, settings.mu_m3_s2),
        TransferMethod::BiElliptic => {
            bi_elliptic(start, end, settings.mu_m3_s2, settings.intermediate_radius)
        }
        TransferMethod::Lambert => settings.lambert_solver().solve(
            start,
            end,
            transfer_time_s.unwrap_or(settings.default_transfer_time_s),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::TransferConstraints;
    use planner_impulsive::TrajectoryType;

    #[test]
    fn method_names_parse_case_insensitively() {
        assert_eq!("Hohmann".parse::<TransferMethod>().unwrap(), TransferMethod::Hohmann);
        assert_eq!(
            "bi-elliptic".parse::<TransferMethod>().unwrap(),
            TransferMethod::BiElliptic
        );
        assert_eq!(" LAMBERT ".parse::<TransferMethod>().unwrap(), TransferMethod::Lambert);
        assert_eq!(TransferMethod::BiElliptic.to_string(), "bi_elliptic");
    }

    #[test]
    fn unknown_method_is_invalid_input() {
        let err = "gravity_assist".parse::<TransferMethod>().unwrap_err();
        assert_eq!(err, TransferError::UnknownMethod("gravity_assist".to_string()));
        assert!(err.is_invalid_input());
    }

    #[test]
    fn malformed_position_is_invalid_input() {
        let err = parse_position(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, TransferError::InvalidInput(_)));
    }

    #[test]
    fn default_settings_mirror_documented_defaults() {
        let settings = PlannerSettings::default();
        assert_eq!(settings.weights, Weights::default());
        assert_eq!(settings.default_transfer_time_s, 259_200.0);
        assert_eq!(settings.lambert, LambertOptions::default());
        assert_eq!(settings.intermediate_radius, IntermediateRadius::Factor(2.5));
        assert_eq!(settings.validation, ValidationThresholds::default());
        assert_eq!(settings.time_horizon_s, 7.0 * 86_400.0);
    }

    #[test]
    fn dispatch_tags_results_with_method() {
        let settings = PlannerSettings::default();
        let start = [7.0e6, 0.0, 0.0];
        let end = [0.0, 9.0e6, 0.0];
        for (method, kind) in [
            (TransferMethod::Hohmann, TrajectoryType::Hohmann),
            (TransferMethod::BiElliptic, TrajectoryType::BiElliptic),
            (TransferMethod::Lambert, TrajectoryType::Lambert),
        ] {
            let out = calculate(&settings, method, &start, &end, Some(3_000.0)).unwrap();
            assert_eq!(out.trajectory_type, kind);
        }
    }

    #[test]
    fn lambert_uses_default_time_when_omitted() {
        let settings = PlannerSettings::default();
        let out = calculate(
            &settings,
            TransferMethod::Lambert,
            &[7.0e6, 0.0, 0.0],
            &[0.0, 4.2e7, 0.0],
            None,
        )
        .unwrap();
        assert_eq!(out.transfer_time_s, settings.default_transfer_time_s);
    }

    #[test]
    fn optimizer_carries_configured_settings() {
        let settings = PlannerSettings {
            placeholder_safety: 0.5,
            intermediate_radius: IntermediateRadius::Fixed(1.0e8),
            ..PlannerSettings::default()
        };
        let out = settings
            .optimizer()
            .optimize(
                &[7.0e6, 0.0, 0.0],
                &[4.2164e7, 0.0, 0.0],
                &TransferConstraints::default(),
                &settings.weights,
            )
            .unwrap();
        assert!(out.alternatives.iter().all(|alt| alt.safety_score == 0.5));
        assert_eq!(out.alternatives[1].trajectory.intermediate_radius_m, Some(1.0e8));
    }

    #[test]
    fn default_optimizer_uses_placeholder_safety() {
        let out = PlannerSettings::default()
            .optimizer()
            .optimize(
                &[7.0e6, 0.0, 0.0],
                &[4.2164e7, 0.0, 0.0],
                &TransferConstraints::default(),
                &Weights::default(),
            )
            .unwrap();
        assert!(out.alternatives.iter().all(|alt| alt.safety_score == 0.8));
        assert_eq!(out.optimal().trajectory.trajectory_type, TrajectoryType::Hohmann);
    }
}
