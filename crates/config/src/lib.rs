//! Configuration models and loaders for the transfer planner.
//!
//! Every section and field has a default, so a partial file (or none at all) yields a
//! usable configuration. `.toml` files are read as TOML, anything else as YAML.

use std::fs::File;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Top-level planner settings.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct PlannerConfig {
    pub physics: PhysicsConfig,
    pub lambert: LambertConfig,
    pub bi_elliptic: BiEllipticConfig,
    pub optimizer: OptimizerConfig,
    pub validator: ValidatorConfig,
    pub calculate: CalculateConfig,
}

/// Central-body parameters.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    pub mu_m3_s2: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            mu_m3_s2: 3.986_004_418e14,
        }
    }
}

/// How the Lambert solver reacts to a missed tolerance.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConvergencePolicy {
    #[default]
    Strict,
    BestEffort,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LambertConfig {
    pub max_iterations: usize,
    pub tolerance_s: f64,
    pub convergence: ConvergencePolicy,
}

impl Default for LambertConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance_s: 1e-10,
            convergence: ConvergencePolicy::Strict,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BiEllipticConfig {
    /// Intermediate apoapsis as a multiple of the larger endpoint radius.
    pub intermediate_radius_factor: f64,
}

impl Default for BiEllipticConfig {
    fn default() -> Self {
        Self {
            intermediate_radius_factor: 2.5,
        }
    }
}

/// Relative importance of each optimisation objective; need not sum to one.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct WeightsConfig {
    pub fuel_efficiency: f64,
    pub travel_time: f64,
    pub safety_score: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            fuel_efficiency: 0.4,
            travel_time: 0.3,
            safety_score: 0.3,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct OptimizerConfig {
    pub weights: WeightsConfig,
    pub time_horizon_days: f64,
    pub placeholder_safety_score: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            weights: WeightsConfig::default(),
            time_horizon_days: 7.0,
            placeholder_safety_score: 0.8,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ValidatorConfig {
    pub max_delta_v_m_s: f64,
    pub max_transfer_days: f64,
    pub min_fuel_efficiency: f64,
    pub passing_score: f64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_delta_v_m_s: 20_000.0,
            max_transfer_days: 10.0,
            min_fuel_efficiency: 50.0,
            passing_score: 50.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CalculateConfig {
    /// Flight time used for Lambert requests that omit one (seconds).
    pub default_transfer_time_s: f64,
}

impl Default for CalculateConfig {
    fn default() -> Self {
        Self {
            default_transfer_time_s: 3.0 * 86_400.0,
        }
    }
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Load and validate planner settings from a TOML or YAML file.
pub fn load_planner_config<P: AsRef<Path>>(path: P) -> Result<PlannerConfig, ConfigError> {
    let path = path.as_ref();
    let config: PlannerConfig = if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)?
    } else {
        let reader = File::open(path)?;
        serde_yaml::from_reader(reader)?
    };
    config.validate()?;
    Ok(config)
}

impl PlannerConfig {
    /// Reject settings the solvers cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mu = self.physics.mu_m3_s2;
        if !(mu.is_finite() && mu > 0.0) {
            return Err(invalid(format!("physics.mu_m3_s2 must be positive, got {mu}")));
        }
        if self.lambert.max_iterations == 0 {
            return Err(invalid("lambert.max_iterations must be at least 1".to_string()));
        }
        if !(self.lambert.tolerance_s > 0.0) {
            return Err(invalid(format!(
                "lambert.tolerance_s must be positive, got {}",
                self.lambert.tolerance_s
            )));
        }
        if !(self.bi_elliptic.intermediate_radius_factor > 1.0) {
            return Err(invalid(format!(
                "bi_elliptic.intermediate_radius_factor must exceed 1, got {}",
                self.bi_elliptic.intermediate_radius_factor
            )));
        }
        let weights = &self.optimizer.weights;
        for (name, value) in [
            ("fuel_efficiency", weights.fuel_efficiency),
            ("travel_time", weights.travel_time),
            ("safety_score", weights.safety_score),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(format!(
                    "optimizer.weights.{name} must be non-negative, got {value}"
                )));
            }
        }
        if !(self.optimizer.time_horizon_days > 0.0) {
            return Err(invalid("optimizer.time_horizon_days must be positive".to_string()));
        }
        let safety = self.optimizer.placeholder_safety_score;
        if !(0.0..=1.0).contains(&safety) {
            return Err(invalid(format!(
                "optimizer.placeholder_safety_score must lie in [0, 1], got {safety}"
            )));
        }
        let validator = &self.validator;
        for (name, value) in [
            ("max_delta_v_m_s", validator.max_delta_v_m_s),
            ("max_transfer_days", validator.max_transfer_days),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(format!("validator.{name} must be positive, got {value}")));
            }
        }
        for (name, value) in [
            ("min_fuel_efficiency", validator.min_fuel_efficiency),
            ("passing_score", validator.passing_score),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(invalid(format!(
                    "validator.{name} must lie in [0, 100], got {value}"
                )));
            }
        }
        if !(self.calculate.default_transfer_time_s > 0.0) {
            return Err(invalid(
                "calculate.default_transfer_time_s must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::Invalid(message)
}
