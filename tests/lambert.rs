mod common;

use common::kepler::propagate;
use transfer_planner::constants::MU_EARTH_M3_S2;
use transfer_planner::impulsive::{LambertOptions, LambertSolver, TrajectoryType, TransferError};
use transfer_planner::vector::{self, Vector3};

const MU: f64 = MU_EARTH_M3_S2;
const R0: Vector3 = [7_000_000.0, 0.0, 0.0];

fn relative_error(a: &Vector3, b: &Vector3) -> f64 {
    vector::norm(&vector::sub(a, b)) / vector::norm(b)
}

/// Propagate a known state, then ask the solver to reconnect the endpoints.
fn assert_round_trip(v0: Vector3, tof: f64, long_way: bool) {
    let (r2, v2) = propagate(&R0, &v0, tof, MU);
    let solver = LambertSolver::new(MU).with_options(LambertOptions {
        long_way,
        ..LambertOptions::default()
    });
    let out = solver.solve(&R0, &r2, tof).expect("lambert solve");
    let details = out.lambert.as_ref().expect("lambert details");

    assert_eq!(out.trajectory_type, TrajectoryType::Lambert);
    assert!(details.converged);
    assert_eq!(details.long_way, long_way);
    assert!(
        relative_error(&details.v1_m_s, &v0) < 1e-6,
        "departure velocity {:?} vs {:?}",
        details.v1_m_s,
        v0
    );
    assert!(
        relative_error(&details.v2_m_s, &v2) < 1e-6,
        "arrival velocity {:?} vs {:?}",
        details.v2_m_s,
        v2
    );

    let expected_energy = 0.5 * vector::dot(&v0, &v0) - MU / vector::norm(&R0);
    assert!(((details.specific_energy_j_kg - expected_energy) / expected_energy).abs() < 1e-6);
    let expected_a = -MU / (2.0 * expected_energy);
    assert!(((out.semi_major_axis_m.unwrap() - expected_a) / expected_a).abs() < 1e-6);
}

#[test]
fn short_way_arc_round_trips() {
    assert_round_trip([0.0, 8_000.0, 500.0], 3_000.0, false);
}

#[test]
fn long_way_arc_round_trips() {
    assert_round_trip([100.0, 8_000.0, 500.0], 4_500.0, true);
}

#[test]
fn inclined_arc_round_trips() {
    assert_round_trip([0.0, 7_600.0, 1_200.0], 1_200.0, false);
}

#[test]
fn short_hop_round_trips() {
    assert_round_trip([0.0, 8_000.0, 500.0], 200.0, false);
}

#[test]
fn slow_wide_arc_round_trips() {
    assert_round_trip([-300.0, 9_000.0, 0.0], 6_000.0, false);
}

#[test]
fn leo_to_geo_radius_in_three_days_converges() {
    let out = LambertSolver::default()
        .solve(&R0, &[0.0, 4.2e7, 0.0], 3.0 * 86_400.0)
        .expect("lambert solve");
    let details = out.lambert.unwrap();
    assert!(details.converged);
    assert!(details.iterations <= 100);
    assert!(details.eccentricity < 1.0);
    assert!(out.delta_v_total_m_s.is_finite() && out.delta_v_total_m_s > 0.0);
    assert!((0.0..=100.0).contains(&out.fuel_efficiency));
}

#[test]
fn zero_position_is_invalid_input() {
    let err = LambertSolver::default()
        .solve(&[0.0, 0.0, 0.0], &[0.0, 7e6, 0.0], 3_000.0)
        .unwrap_err();
    assert!(matches!(err, TransferError::InvalidInput(_)), "{err}");
}
