//! Lambert boundary-value solver on Lagrange's time-of-flight equation.
//!
//! Given two positions and a flight time, the solver finds the semi-major axis of the
//! connecting ellipse by Newton-Raphson iteration, then recovers both endpoint velocities
//! through the Lagrange coefficients of that orbit. Only single-revolution elliptic
//! transfers are modelled.
//!
//! Near the parabolic limit `dt/da` flattens out as `a` grows without bound. Flight times
//! within roughly 1e-4 (relative) of that limit can stall the iteration before it reaches
//! tolerance; they surface as [`TransferError::NonConvergence`] in strict mode, or as an
//! unconverged estimate under [`ConvergenceMode::BestEffort`].

use std::f64::consts::{PI, TAU};

use planner_core::constants::MU_EARTH_M3_S2;
use planner_core::vector::{self, Vector3};
use tracing::{debug, trace, warn};

use crate::error::TransferError;
use crate::result::{
    LAMBERT_EFFICIENCY_BASELINE_M_S, LambertDetails, TrajectoryType, TransferResult, checked_mu,
    checked_radius, fuel_efficiency,
};
use crate::transfers::circular_speed;

/// Below this `sin(Δθ)` the two positions are treated as collinear.
const COLLINEAR_SIN_LIMIT: f64 = 1e-10;
/// Derivative magnitude under which the Newton iteration is considered stalled.
const STALL_DERIVATIVE: f64 = 1e-10;

/// What to do when the Newton iteration misses its tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConvergenceMode {
    /// Report `TransferError::NonConvergence`.
    #[default]
    Strict,
    /// Return the last estimate flagged with `converged = false`.
    BestEffort,
}

/// Tuning knobs for [`LambertSolver`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambertOptions {
    /// Hard cap on time-of-flight evaluations.
    pub max_iterations: usize,
    /// Absolute time-of-flight tolerance (seconds).
    pub tolerance_s: f64,
    pub convergence: ConvergenceMode,
    /// Travel through the transfer angle `2π - Δθ` instead of `Δθ`.
    pub long_way: bool,
}

impl Default for LambertOptions {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance_s: 1e-10,
            convergence: ConvergenceMode::Strict,
            long_way: false,
        }
    }
}

/// Lambert solver bound to a central body.
#[derive(Debug, Clone, PartialEq)]
pub struct LambertSolver {
    pub mu_m3_s2: f64,
    pub options: LambertOptions,
}

impl Default for LambertSolver {
    fn default() -> Self {
        Self::new(MU_EARTH_M3_S2)
    }
}

/// Fixed geometry of a transfer: radii, chord, semi-perimeter and sweep angle.
#[derive(Debug, Clone, Copy)]
struct Geometry {
    chord: f64,
    semi_perimeter: f64,
    dtheta: f64,
    long_way: bool,
}

impl Geometry {
    fn new(
        r1_vec: &Vector3,
        r2_vec: &Vector3,
        r1: f64,
        r2: f64,
        long_way: bool,
    ) -> Result<Self, TransferError> {
        // Clip guards acos against round-off just past ±1
        let cos_dtheta = (vector::dot(r1_vec, r2_vec) / (r1 * r2)).clamp(-1.0, 1.0);
        let short_angle = cos_dtheta.acos();
        if short_angle.sin() < COLLINEAR_SIN_LIMIT {
            return Err(TransferError::InvalidInput(
                "position vectors are collinear; the transfer plane is undefined".to_string(),
            ));
        }
        let dtheta = if long_way { TAU - short_angle } else { short_angle };
        let chord = vector::norm(&vector::sub(r2_vec, r1_vec));

        Ok(Self {
            chord,
            semi_perimeter: 0.5 * (r1 + r2 + chord),
            dtheta,
            long_way: dtheta > PI,
        })
    }

    fn a_min(&self) -> f64 {
        0.5 * self.semi_perimeter
    }

    /// +1 on the short way, -1 on the long way.
    fn beta_sign(&self) -> f64 {
        if self.long_way { -1.0 } else { 1.0 }
    }

    /// Flight time of the minimum-energy ellipse (`a = s/2`).
    fn minimum_energy_time(&self, mu: f64) -> f64 {
        let s = self.semi_perimeter;
        let beta_m = self.beta_sign() * 2.0 * ((s - self.chord) / s).sqrt().asin();
        (s.powi(3) / (8.0 * mu)).sqrt() * (PI - beta_m + beta_m.sin())
    }

    /// Semi-latus rectum of the conic with semi-major axis `a`; it drives the Lagrange
    /// coefficients. A non-positive value means the endpoints admit no proper conic.
    fn semi_latus_rectum(
        &self,
        r1: f64,
        r2: f64,
        a: f64,
        tof: &TimeOfFlight,
    ) -> Result<f64, TransferError> {
        let s = self.semi_perimeter;
        let c = self.chord;
        let p = 4.0 * a * (s - r1) * (s - r2) / (c * c) * ((tof.alpha + tof.beta) / 2.0).sin().powi(2);
        if p.is_finite() && p > 0.0 {
            Ok(p)
        } else {
            Err(TransferError::InvalidInput(format!(
                "transfer conic is degenerate (semi-latus rectum {p:.3e} m)"
            )))
        }
    }

    /// Flight time of the parabola through both points; elliptic transfers take longer.
    fn parabolic_time(&self, mu: f64) -> f64 {
        let s = self.semi_perimeter;
        let ratio = ((s - self.chord) / s).powf(1.5);
        (2.0_f64.sqrt() / 3.0) * (s.powi(3) / mu).sqrt() * (1.0 - self.beta_sign() * ratio)
    }
}

/// Lagrange angles and the time-of-flight they imply for one trial semi-major axis.
#[derive(Debug, Clone, Copy)]
struct TimeOfFlight {
    alpha: f64,
    beta: f64,
    time_s: f64,
    derivative: f64,
}

impl LambertSolver {
    pub fn new(mu_m3_s2: f64) -> Self {
        Self {
            mu_m3_s2,
            options: LambertOptions::default(),
        }
    }

    pub fn with_options(mut self, options: LambertOptions) -> Self {
        self.options = options;
        self
    }

    /// Solve for the transfer orbit linking `r1_vec` to `r2_vec` in `transfer_time_s` seconds.
    pub fn solve(
        &self,
        r1_vec: &Vector3,
        r2_vec: &Vector3,
        transfer_time_s: f64,
    ) -> Result<TransferResult, TransferError> {
        if !(transfer_time_s.is_finite() && transfer_time_s > 0.0) {
            return Err(TransferError::InvalidInput(format!(
                "transfer time must be positive and finite, got {transfer_time_s}"
            )));
        }
        if self.options.max_iterations == 0 {
            return Err(TransferError::InvalidInput(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        let mu = checked_mu(self.mu_m3_s2)?;
        let r1 = checked_radius("departure", r1_vec)?;
        let r2 = checked_radius("arrival", r2_vec)?;
        let geometry = Geometry::new(r1_vec, r2_vec, r1, r2, self.options.long_way)?;

        let parabolic = geometry.parabolic_time(mu);
        if transfer_time_s <= parabolic {
            return Err(TransferError::InvalidInput(format!(
                "transfer time {transfer_time_s:.3} s is at or below the parabolic limit {parabolic:.3} s; no elliptic transfer exists"
            )));
        }

        let solution = self.solve_semi_major_axis(&geometry, transfer_time_s, mu)?;
        let a = solution.semi_major_axis;
        let tof = solution.last;

        let p = geometry.semi_latus_rectum(r1, r2, a, &tof)?;

        let dtheta = geometry.dtheta;
        let one_minus_cos = 1.0 - dtheta.cos();
        let f = 1.0 - r2 * one_minus_cos / p;
        let g = r1 * r2 * dtheta.sin() / (mu * p).sqrt();
        let f_dot = (mu / p).sqrt() * (dtheta / 2.0).tan() * (one_minus_cos / p - 1.0 / r1 - 1.0 / r2);
        let g_dot = 1.0 - r1 * one_minus_cos / p;

        let v1 = vector::scale(&vector::sub(r2_vec, &vector::scale(r1_vec, f)), 1.0 / g);
        let v2 = vector::add(&vector::scale(r1_vec, f_dot), &vector::scale(&v1, g_dot));

        let h_vec = vector::cross(r1_vec, &v1);
        let angular_momentum = vector::norm(&h_vec);
        let energy = 0.5 * vector::dot(&v1, &v1) - mu / r1;
        let e_vec = vector::sub(
            &vector::scale(&vector::cross(&v1, &h_vec), 1.0 / mu),
            &vector::scale(r1_vec, 1.0 / r1),
        );

        let dv1 = (vector::norm(&v1) - circular_speed(mu, r1)).abs();
        let dv2 = (circular_speed(mu, r2) - vector::norm(&v2)).abs();
        let dv_total = dv1 + dv2;

        Ok(TransferResult {
            trajectory_type: TrajectoryType::Lambert,
            delta_v_total_m_s: dv_total,
            delta_v1_m_s: dv1,
            delta_v2_m_s: dv2,
            delta_v3_m_s: None,
            transfer_time_s,
            fuel_efficiency: fuel_efficiency(dv_total, LAMBERT_EFFICIENCY_BASELINE_M_S),
            semi_major_axis_m: Some(a),
            intermediate_radius_m: None,
            lambert: Some(LambertDetails {
                v1_m_s: v1,
                v2_m_s: v2,
                eccentricity: vector::norm(&e_vec),
                angular_momentum_m2_s: angular_momentum,
                specific_energy_j_kg: energy,
                long_way: geometry.long_way,
                iterations: solution.iterations,
                converged: solution.converged,
            }),
        })
    }

    fn solve_semi_major_axis(
        &self,
        geometry: &Geometry,
        target_s: f64,
        mu: f64,
    ) -> Result<SemiMajorAxis, TransferError> {
        let s = geometry.semi_perimeter;
        let a_min = geometry.a_min();
        // The time equation is undefined below a_min; stay a hair above it
        let a_floor = a_min * (1.0 + 1e-9);
        let upper_branch = target_s > geometry.minimum_energy_time(mu);

        let guess_threshold = PI * (2.0 * s.powi(3) / (8.0 * mu)).sqrt();
        let mut a = if target_s < guess_threshold { a_min } else { 1.1 * a_min }.max(a_floor);

        // Either the absolute tolerance or the precision the target time can be represented to
        let tolerance = self.options.tolerance_s.max(8.0 * f64::EPSILON * target_s);

        let mut last = self.time_of_flight(geometry, a, mu, upper_branch);
        let mut iterations = 1;
        let mut converged = false;
        loop {
            let residual = last.time_s - target_s;
            trace!(iteration = iterations, a, residual, "lambert newton step");
            if residual.abs() < tolerance {
                converged = true;
                break;
            }
            if last.derivative.abs() < STALL_DERIVATIVE || iterations >= self.options.max_iterations {
                break;
            }
            a = (a - residual / last.derivative).max(a_floor);
            last = self.time_of_flight(geometry, a, mu, upper_branch);
            iterations += 1;
        }

        let residual_s = (last.time_s - target_s).abs();
        if converged {
            debug!(iterations, a, residual_s, "lambert solver converged");
        } else {
            match self.options.convergence {
                ConvergenceMode::Strict => {
                    debug!(iterations, a, residual_s, "lambert solver failed to converge");
                    return Err(TransferError::NonConvergence {
                        iterations,
                        residual_s,
                        best_estimate_m: a,
                    });
                }
                ConvergenceMode::BestEffort => {
                    warn!(iterations, a, residual_s, "lambert solver returning unconverged estimate");
                }
            }
        }

        Ok(SemiMajorAxis {
            semi_major_axis: a,
            last,
            iterations,
            converged,
        })
    }

    fn time_of_flight(&self, geometry: &Geometry, a: f64, mu: f64, upper_branch: bool) -> TimeOfFlight {
        let s = geometry.semi_perimeter;
        let c = geometry.chord;
        let alpha0 = 2.0 * (s / (2.0 * a)).sqrt().min(1.0).asin();
        let beta0 = 2.0 * ((s - c) / (2.0 * a)).sqrt().min(1.0).asin();

        let alpha_sign = if upper_branch { -1.0 } else { 1.0 };
        let beta_sign = geometry.beta_sign();
        let alpha = if upper_branch { TAU - alpha0 } else { alpha0 };
        let beta = beta_sign * beta0;

        let scale = (a.powi(3) / mu).sqrt();
        let time_s = scale * (alpha - beta - (alpha.sin() - beta.sin()));

        // d(alpha0)/da = -tan(alpha0/2)/a, likewise for beta0
        let dalpha = -alpha_sign * (alpha0 / 2.0).tan() / a;
        let dbeta = -beta_sign * (beta0 / 2.0).tan() / a;
        let derivative =
            1.5 * time_s / a + scale * ((1.0 - alpha.cos()) * dalpha - (1.0 - beta.cos()) * dbeta);

        TimeOfFlight {
            alpha,
            beta,
            time_s,
            derivative,
        }
    }
}

struct SemiMajorAxis {
    semi_major_axis: f64,
    last: TimeOfFlight,
    iterations: usize,
    converged: bool,
}
