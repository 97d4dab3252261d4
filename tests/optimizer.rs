use transfer_planner::impulsive::TrajectoryType;
use transfer_planner::transfer::{PlannerSettings, TransferConstraints, Weights};

const LEO: [f64; 3] = [7_000_000.0, 0.0, 0.0];
const GEO: [f64; 3] = [42_164_000.0, 0.0, 0.0];

#[test]
fn default_weights_prefer_hohmann_for_leo_to_geo() {
    let settings = PlannerSettings::default();
    let result = settings
        .optimizer()
        .optimize(&LEO, &GEO, &TransferConstraints::default(), &settings.weights)
        .expect("optimize");

    assert_eq!(result.alternatives.len(), 2);
    assert_eq!(result.alternatives[0].trajectory.trajectory_type, TrajectoryType::Hohmann);
    assert_eq!(result.alternatives[1].trajectory.trajectory_type, TrajectoryType::BiElliptic);
    assert_eq!(result.optimal().trajectory.trajectory_type, TrajectoryType::Hohmann);
    assert!(result.alternatives.iter().all(|alt| alt.safety_score == 0.8));

    let shortest = result.alternatives[0].trajectory.transfer_time_s;
    assert_eq!(result.trade_offs.shortest_time_s, shortest);
    assert_eq!(
        result.trade_offs.best_fuel_efficiency,
        result.alternatives[1].trajectory.fuel_efficiency
    );
    assert_eq!(result.trade_offs.optimization_weights, settings.weights);
}

#[test]
fn fuel_only_weighting_follows_efficiency_score() {
    let settings = PlannerSettings::default();
    let weights = Weights {
        fuel_efficiency: 1.0,
        travel_time: 0.0,
        safety_score: 0.0,
    };
    let result = settings
        .optimizer()
        .optimize(&LEO, &GEO, &TransferConstraints::default(), &weights)
        .unwrap();
    // The bi-elliptic baseline is more generous, so it scores higher here
    assert_eq!(result.optimal().trajectory.trajectory_type, TrajectoryType::BiElliptic);
    for alt in &result.alternatives {
        assert!((alt.optimization_score - alt.trajectory.fuel_efficiency / 100.0).abs() < 1e-12);
    }
}
