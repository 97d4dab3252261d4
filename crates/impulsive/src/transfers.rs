//! Analytic estimators for impulsive transfers in the coplanar, circular limit.
//!
//! Only the magnitudes of the supplied position vectors are used: both endpoints are
//! treated as circular, coplanar orbits at those radii and the angular separation of the
//! vectors is discarded.

use std::f64::consts::PI;

use planner_core::vector::Vector3;
use tracing::debug;

use crate::error::TransferError;
use crate::result::{
    BI_ELLIPTIC_EFFICIENCY_BASELINE_M_S, HOHMANN_EFFICIENCY_BASELINE_M_S, TrajectoryType,
    TransferResult, checked_mu, checked_radius, fuel_efficiency,
};

/// Speed on a conic of semi-major axis `a` at radius `r` (vis-viva).
#[inline]
pub fn vis_viva(mu: f64, r: f64, a: f64) -> f64 {
    (mu * (2.0 / r - 1.0 / a)).sqrt()
}

/// Circular orbit speed at radius `r`.
#[inline]
pub fn circular_speed(mu: f64, r: f64) -> f64 {
    (mu / r).sqrt()
}

/// Half the period of an ellipse with semi-major axis `a`.
#[inline]
pub fn half_period(mu: f64, a: f64) -> f64 {
    PI * (a.powi(3) / mu).sqrt()
}

/// Compute the classical Hohmann transfer between the circular orbits through `r1` and `r2`.
///
/// When both radii match the burns vanish and the reported time is half the period of
/// the (circular) orbit itself.
pub fn hohmann(r1: &Vector3, r2: &Vector3, mu: f64) -> Result<TransferResult, TransferError> {
    let mu = checked_mu(mu)?;
    let r1 = checked_radius("departure", r1)?;
    let r2 = checked_radius("arrival", r2)?;

    let a_t = 0.5 * (r1 + r2);

    // Transfer periapsis/apoapsis speeds against the circular speeds at each end
    let dv1 = (vis_viva(mu, r1, a_t) - circular_speed(mu, r1)).abs();
    let dv2 = (circular_speed(mu, r2) - vis_viva(mu, r2, a_t)).abs();
    let dv_total = dv1 + dv2;
    let tof = half_period(mu, a_t);

    debug!(r1, r2, dv_total, tof, "hohmann transfer");

    Ok(TransferResult {
        trajectory_type: TrajectoryType::Hohmann,
        delta_v_total_m_s: dv_total,
        delta_v1_m_s: dv1,
        delta_v2_m_s: dv2,
        delta_v3_m_s: None,
        transfer_time_s: tof,
        fuel_efficiency: fuel_efficiency(dv_total, HOHMANN_EFFICIENCY_BASELINE_M_S),
        semi_major_axis_m: Some(a_t),
        intermediate_radius_m: None,
        lambert: None,
    })
}

/// How the apoapsis of the bi-elliptic intermediate ellipse is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntermediateRadius {
    /// Multiple of the larger endpoint radius.
    Factor(f64),
    /// Explicit radius in metres.
    Fixed(f64),
}

impl Default for IntermediateRadius {
    fn default() -> Self {
        IntermediateRadius::Factor(2.5)
    }
}

impl IntermediateRadius {
    fn resolve(&self, r1: f64, r2: f64) -> Result<f64, TransferError> {
        let rb = match *self {
            IntermediateRadius::Factor(k) => k * r1.max(r2),
            IntermediateRadius::Fixed(rb) => rb,
        };
        if rb.is_finite() && rb > 0.0 {
            Ok(rb)
        } else {
            Err(TransferError::InvalidInput(format!(
                "intermediate radius must be positive and finite, got {rb}"
            )))
        }
    }
}

/// Compute a three-burn bi-elliptic transfer through an intermediate apoapsis.
///
/// The intermediate radius is not optimised; with the default it sits at 2.5 times the
/// larger endpoint radius. The reported time is the sum of the two half-ellipse coasts.
pub fn bi_elliptic(
    r1: &Vector3,
    r2: &Vector3,
    mu: f64,
    intermediate: IntermediateRadius,
) -> Result<TransferResult, TransferError> {
    let mu = checked_mu(mu)?;
    let r1 = checked_radius("departure", r1)?;
    let r2 = checked_radius("arrival", r2)?;
    let rb = intermediate.resolve(r1, r2)?;

    // First ellipse: r1 -> rb
    let a1 = 0.5 * (r1 + rb);
    // Second ellipse: rb -> r2
    let a2 = 0.5 * (rb + r2);

    let dv1 = (vis_viva(mu, r1, a1) - circular_speed(mu, r1)).abs();
    let dv2 = (vis_viva(mu, rb, a2) - vis_viva(mu, rb, a1)).abs();
    let dv3 = (circular_speed(mu, r2) - vis_viva(mu, r2, a2)).abs();
    let dv_total = dv1 + dv2 + dv3;
    let tof = half_period(mu, a1) + half_period(mu, a2);

    debug!(r1, r2, rb, dv_total, tof, "bi-elliptic transfer");

    Ok(TransferResult {
        trajectory_type: TrajectoryType::BiElliptic,
        delta_v_total_m_s: dv_total,
        delta_v1_m_s: dv1,
        delta_v2_m_s: dv2,
        delta_v3_m_s: Some(dv3),
        transfer_time_s: tof,
        fuel_efficiency: fuel_efficiency(dv_total, BI_ELLIPTIC_EFFICIENCY_BASELINE_M_S),
        semi_major_axis_m: None,
        intermediate_radius_m: Some(rb),
        lambert: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner_core::constants::MU_EARTH_M3_S2 as MU;

    #[test]
    fn hohmann_is_symmetric_under_exchange() {
        let low = [7_000_000.0, 0.0, 0.0];
        let high = [0.0, 26_000_000.0, 0.0];
        let out = hohmann(&low, &high, MU).unwrap();
        let back = hohmann(&high, &low, MU).unwrap();
        assert!((out.delta_v_total_m_s - back.delta_v_total_m_s).abs() < 1e-9);
        assert!((out.transfer_time_s - back.transfer_time_s).abs() < 1e-9);
    }

    #[test]
    fn hohmann_ignores_vector_orientation() {
        let a = hohmann(&[7.0e6, 0.0, 0.0], &[4.2164e7, 0.0, 0.0], MU).unwrap();
        let b = hohmann(&[0.0, 0.0, 7.0e6], &[0.0, -4.2164e7, 0.0], MU).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn equal_radii_need_no_delta_v() {
        let r = [8_000_000.0, 0.0, 0.0];
        let out = hohmann(&r, &[0.0, 8_000_000.0, 0.0], MU).unwrap();
        assert!(out.delta_v_total_m_s.abs() < 1e-9);
        assert!((out.fuel_efficiency - 100.0).abs() < 1e-9);
        let expected = PI * (8.0e6_f64.powi(3) / MU).sqrt();
        assert!((out.transfer_time_s - expected).abs() < 1e-9);
        assert_eq!(out.semi_major_axis_m, Some(8_000_000.0));
    }

    #[test]
    fn zero_vector_is_invalid_input() {
        let err = hohmann(&[0.0; 3], &[7.0e6, 0.0, 0.0], MU).unwrap_err();
        assert!(matches!(err, TransferError::InvalidInput(_)));
        let err = bi_elliptic(&[7.0e6, 0.0, 0.0], &[0.0; 3], MU, IntermediateRadius::default())
            .unwrap_err();
        assert!(matches!(err, TransferError::InvalidInput(_)));
    }

    #[test]
    fn non_positive_mu_is_rejected() {
        assert!(hohmann(&[7.0e6, 0.0, 0.0], &[8.0e6, 0.0, 0.0], 0.0).is_err());
    }

    #[test]
    fn bi_elliptic_defaults_to_two_and_a_half_times_outer_radius() {
        let out = bi_elliptic(
            &[7.0e6, 0.0, 0.0],
            &[4.2164e7, 0.0, 0.0],
            MU,
            IntermediateRadius::default(),
        )
        .unwrap();
        assert_eq!(out.intermediate_radius_m, Some(2.5 * 4.2164e7));
        assert!(out.delta_v3_m_s.is_some());
        let sum = out.delta_v1_m_s + out.delta_v2_m_s + out.delta_v3_m_s.unwrap();
        assert!((sum - out.delta_v_total_m_s).abs() < 1e-9);
    }

    #[test]
    fn bi_elliptic_beats_hohmann_for_large_ratios() {
        let r1 = [7.0e6, 0.0, 0.0];
        let r2 = [7.0e6 * 20.0, 0.0, 0.0];
        let ho = hohmann(&r1, &r2, MU).unwrap();
        let bi = bi_elliptic(&r1, &r2, MU, IntermediateRadius::Fixed(7.0e6 * 60.0)).unwrap();
        assert!(bi.delta_v_total_m_s < ho.delta_v_total_m_s);
    }

    #[test]
    fn invalid_intermediate_radius_is_rejected() {
        let err = bi_elliptic(
            &[7.0e6, 0.0, 0.0],
            &[8.0e6, 0.0, 0.0],
            MU,
            IntermediateRadius::Fixed(-1.0),
        )
        .unwrap_err();
        assert!(err.is_invalid_input());
    }
}
