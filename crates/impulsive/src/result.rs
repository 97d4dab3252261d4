//! Shared output record for every transfer calculator.

use std::fmt;

use planner_core::vector::{self, Vector3};
use serde::Serialize;

use crate::error::TransferError;

/// Delta-v at which Hohmann and Lambert transfers score zero fuel efficiency (m/s).
pub const HOHMANN_EFFICIENCY_BASELINE_M_S: f64 = 15_000.0;
/// Delta-v at which Lambert transfers score zero fuel efficiency (m/s).
pub const LAMBERT_EFFICIENCY_BASELINE_M_S: f64 = 15_000.0;
/// Delta-v at which bi-elliptic transfers score zero fuel efficiency (m/s).
///
/// Deliberately looser than the two-impulse baseline.
pub const BI_ELLIPTIC_EFFICIENCY_BASELINE_M_S: f64 = 18_000.0;

/// Which family of trajectory produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrajectoryType {
    Hohmann,
    BiElliptic,
    Lambert,
}

impl TrajectoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrajectoryType::Hohmann => "hohmann",
            TrajectoryType::BiElliptic => "bi_elliptic",
            TrajectoryType::Lambert => "lambert",
        }
    }
}

impl fmt::Display for TrajectoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extra state reported only by the Lambert solver.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LambertDetails {
    /// Departure velocity on the transfer arc (m/s).
    pub v1_m_s: Vector3,
    /// Arrival velocity on the transfer arc (m/s).
    pub v2_m_s: Vector3,
    pub eccentricity: f64,
    /// Magnitude of `r1 × v1` (m²/s).
    pub angular_momentum_m2_s: f64,
    /// Specific orbital energy (J/kg); negative for bound orbits.
    pub specific_energy_j_kg: f64,
    pub long_way: bool,
    /// Number of time-of-flight evaluations performed.
    pub iterations: usize,
    /// False only for best-effort results that missed the tolerance.
    pub converged: bool,
}

/// Result of any impulsive transfer calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferResult {
    pub trajectory_type: TrajectoryType,
    pub delta_v_total_m_s: f64,
    pub delta_v1_m_s: f64,
    pub delta_v2_m_s: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_v3_m_s: Option<f64>,
    pub transfer_time_s: f64,
    /// Linear 0-100 score derived from total delta-v.
    pub fuel_efficiency: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semi_major_axis_m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intermediate_radius_m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lambert: Option<LambertDetails>,
}

/// Map a total delta-v onto the 0-100 efficiency scale for the given baseline.
pub fn fuel_efficiency(delta_v_total_m_s: f64, baseline_m_s: f64) -> f64 {
    (100.0 * (1.0 - delta_v_total_m_s / baseline_m_s)).clamp(0.0, 100.0)
}

pub(crate) fn checked_radius(label: &str, position: &Vector3) -> Result<f64, TransferError> {
    if !vector::is_finite(position) {
        return Err(TransferError::InvalidInput(format!(
            "{label} position {position:?} has non-finite components"
        )));
    }
    let radius = vector::norm(position);
    if radius == 0.0 || !radius.is_finite() {
        return Err(TransferError::InvalidInput(format!(
            "{label} position must have a nonzero, finite magnitude"
        )));
    }
    Ok(radius)
}

pub(crate) fn checked_mu(mu_m3_s2: f64) -> Result<f64, TransferError> {
    if mu_m3_s2.is_finite() && mu_m3_s2 > 0.0 {
        Ok(mu_m3_s2)
    } else {
        Err(TransferError::InvalidInput(format!(
            "gravitational parameter must be positive and finite, got {mu_m3_s2}"
        )))
    }
}
