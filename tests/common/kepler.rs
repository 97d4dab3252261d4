//! Two-body propagator used to manufacture Lambert boundary conditions.
//!
//! Universal-variable formulation with Stumpff functions; elliptic and hyperbolic states
//! are both handled, which is more than the solver under test needs.

use transfer_planner::vector::{self, Vector3};

/// Advance `(r0, v0)` by `dt` seconds around a body with parameter `mu`.
pub fn propagate(r0: &Vector3, v0: &Vector3, dt: f64, mu: f64) -> (Vector3, Vector3) {
    let r0_mag = vector::norm(r0);
    let rdotv = vector::dot(r0, v0);
    let sqrt_mu = mu.sqrt();
    // Reciprocal semi-major axis
    let alpha = 2.0 / r0_mag - vector::dot(v0, v0) / mu;

    let mut chi = sqrt_mu * alpha.abs() * dt;
    if alpha.abs() < 1e-12 {
        chi = sqrt_mu * dt / r0_mag;
    }

    let tol = 1e-14 * dt.abs().max(1.0);
    for _ in 0..100 {
        let chi2 = chi * chi;
        let psi = alpha * chi2;
        let (c2, c3) = stumpff(psi);
        let r = chi2 * c2 + rdotv / sqrt_mu * chi * (1.0 - psi * c3) + r0_mag * (1.0 - psi * c2);
        let f_val = r0_mag * chi * (1.0 - psi * c3) + rdotv / sqrt_mu * chi2 * c2 + chi2 * chi * c3
            - sqrt_mu * dt;
        let delta = f_val / r;
        chi -= delta;
        if delta.abs() < tol {
            break;
        }
    }

    let chi2 = chi * chi;
    let psi = alpha * chi2;
    let (c2, c3) = stumpff(psi);
    let r_mag = chi2 * c2 + rdotv / sqrt_mu * chi * (1.0 - psi * c3) + r0_mag * (1.0 - psi * c2);

    let f = 1.0 - chi2 / r0_mag * c2;
    let g = dt - chi2 * chi / sqrt_mu * c3;
    let f_dot = sqrt_mu / (r_mag * r0_mag) * chi * (psi * c3 - 1.0);
    let g_dot = 1.0 - chi2 / r_mag * c2;

    (
        vector::add(&vector::scale(r0, f), &vector::scale(v0, g)),
        vector::add(&vector::scale(r0, f_dot), &vector::scale(v0, g_dot)),
    )
}

fn stumpff(psi: f64) -> (f64, f64) {
    if psi > 1e-6 {
        let s = psi.sqrt();
        ((1.0 - s.cos()) / psi, (s - s.sin()) / (psi * s))
    } else if psi < -1e-6 {
        let s = (-psi).sqrt();
        ((1.0 - s.cosh()) / psi, (s.sinh() - s) / (-psi * s))
    } else {
        (
            0.5 - psi / 24.0 + psi * psi / 720.0,
            1.0 / 6.0 - psi / 120.0 + psi * psi / 5040.0,
        )
    }
}
