use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use transfer_planner::constants::{MU_EARTH_M3_S2, MU_MOON_M3_S2};
use transfer_planner::export::{alternatives, report, writer_for_path};
use transfer_planner::impulsive::{ConvergenceMode, TransferResult};
use transfer_planner::time::{seconds_to_days, split_duration};
use transfer_planner::transfer::{
    OptimizationResult, PlannerSettings, TrajectoryMetrics, TransferConstraints, TransferMethod,
    ValidationReport, ValidatorSafety, Weights, calculate, parse_position,
};
use transfer_planner::units::{km_to_m, m_to_km, ms_to_kms};
use transfer_planner::vector::Vector3;

#[derive(Parser)]
#[command(author, version, about = "Impulsive orbital transfer planner (two-body)")]
struct Cli {
    /// Planner settings file (TOML or YAML); built-in defaults otherwise
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Central body, overriding the configured gravitational parameter
    #[arg(long, global = true, value_enum)]
    body: Option<CentralBody>,

    /// Interpret positions in kilometres instead of metres
    #[arg(long, global = true, default_value_t = false)]
    km: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, ValueEnum, Debug)]
enum CentralBody {
    Earth,
    Moon,
}

#[derive(Subcommand)]
enum Command {
    /// Compute a single transfer with the chosen method
    Calculate {
        /// hohmann, bi_elliptic or lambert
        #[arg(long, default_value = "hohmann")]
        method: String,

        /// Departure position as x,y,z
        #[arg(long, required = true, value_delimiter = ',', allow_hyphen_values = true)]
        from: Vec<f64>,

        /// Arrival position as x,y,z
        #[arg(long, required = true, value_delimiter = ',', allow_hyphen_values = true)]
        to: Vec<f64>,

        /// Flight time in seconds (Lambert only; defaults to the configured value)
        #[arg(long)]
        time: Option<f64>,

        /// Take the long way round (Lambert only)
        #[arg(long, default_value_t = false)]
        long_way: bool,

        /// Return the last Lambert estimate instead of failing on non-convergence
        #[arg(long, default_value_t = false)]
        best_effort: bool,

        /// Write a JSON report to this path (`-` for stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Rank Hohmann and bi-elliptic transfers by weighted objectives
    Optimize {
        /// Departure position as x,y,z
        #[arg(long, required = true, value_delimiter = ',', allow_hyphen_values = true)]
        from: Vec<f64>,

        /// Arrival position as x,y,z
        #[arg(long, required = true, value_delimiter = ',', allow_hyphen_values = true)]
        to: Vec<f64>,

        #[arg(long)]
        fuel_weight: Option<f64>,

        #[arg(long)]
        time_weight: Option<f64>,

        #[arg(long)]
        safety_weight: Option<f64>,

        /// Score safety with the rule-based validator instead of the fixed placeholder
        #[arg(long, default_value_t = false)]
        validator_safety: bool,

        /// Write a JSON report to this path (`-` for stdout)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write the scored alternatives as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Grade a trajectory against the safety rules
    Validate {
        /// Total delta-v (m/s)
        #[arg(long)]
        delta_v: Option<f64>,

        /// Transfer time (s)
        #[arg(long)]
        transfer_time: Option<f64>,

        /// Fuel efficiency score (0-100)
        #[arg(long)]
        fuel_efficiency: Option<f64>,

        /// Write a JSON report to this path (`-` for stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => PlannerSettings::load(path)?,
        None => PlannerSettings::default(),
    };
    if let Some(body) = cli.body {
        settings.mu_m3_s2 = match body {
            CentralBody::Earth => MU_EARTH_M3_S2,
            CentralBody::Moon => MU_MOON_M3_S2,
        };
    }
    debug!(mu_m3_s2 = settings.mu_m3_s2, "planner settings resolved");

    match cli.command {
        Command::Calculate {
            method,
            from,
            to,
            time,
            long_way,
            best_effort,
            output,
        } => {
            let method: TransferMethod = method.parse()?;
            let start = position(&from, cli.km)?;
            let end = position(&to, cli.km)?;
            settings.lambert.long_way = long_way;
            if best_effort {
                settings.lambert.convergence = ConvergenceMode::BestEffort;
            }
            let result = calculate(&settings, method, &start, &end, time)?;
            match output {
                Some(path) => write_json(&path, "calculate", &result)?,
                None => print_transfer(&result),
            }
        }
        Command::Optimize {
            from,
            to,
            fuel_weight,
            time_weight,
            safety_weight,
            validator_safety,
            output,
            csv,
        } => {
            let start = position(&from, cli.km)?;
            let end = position(&to, cli.km)?;
            let weights = Weights {
                fuel_efficiency: fuel_weight.unwrap_or(settings.weights.fuel_efficiency),
                travel_time: time_weight.unwrap_or(settings.weights.travel_time),
                safety_score: safety_weight.unwrap_or(settings.weights.safety_score),
            };
            let mut optimizer = settings.optimizer();
            if validator_safety {
                optimizer = optimizer.with_safety(ValidatorSafety(settings.validator()));
            }
            let result =
                optimizer.optimize(&start, &end, &TransferConstraints::default(), &weights)?;
            if let Some(path) = csv {
                write_csv(&path, &result)?;
            }
            match output {
                Some(path) => write_json(&path, "optimize", &result)?,
                None => print_optimization(&result),
            }
        }
        Command::Validate {
            delta_v,
            transfer_time,
            fuel_efficiency,
            output,
        } => {
            let metrics = TrajectoryMetrics {
                delta_v_total_m_s: delta_v,
                transfer_time_s: transfer_time,
                fuel_efficiency,
            };
            let report = settings.validator().validate(metrics);
            match output {
                Some(path) => write_json(&path, "validate", &report)?,
                None => print_validation(&report),
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn position(raw: &[f64], km: bool) -> anyhow::Result<Vector3> {
    let v = parse_position(raw)?;
    Ok(if km { v.map(km_to_m) } else { v })
}

fn write_json<T: Serialize>(path: &Path, kind: &str, payload: &T) -> anyhow::Result<()> {
    let mut writer = writer_for_path(path)?;
    report::write_report(&mut *writer, kind, payload)?;
    writer.flush()?;
    Ok(())
}

fn write_csv(path: &Path, result: &OptimizationResult) -> anyhow::Result<()> {
    let mut writer = writer_for_path(path)?;
    alternatives::write_header(&mut *writer)?;
    for (idx, alt) in result.alternatives.iter().enumerate() {
        alternatives::Record {
            trajectory_type: alt.trajectory.trajectory_type.as_str(),
            delta_v_total_m_s: alt.trajectory.delta_v_total_m_s,
            delta_v1_m_s: alt.trajectory.delta_v1_m_s,
            delta_v2_m_s: alt.trajectory.delta_v2_m_s,
            delta_v3_m_s: alt.trajectory.delta_v3_m_s,
            transfer_time_s: alt.trajectory.transfer_time_s,
            fuel_efficiency: alt.trajectory.fuel_efficiency,
            optimization_score: alt.optimization_score,
            optimal: idx == result.optimal_index,
        }
        .write_to(&mut *writer)?;
    }
    writer.flush()?;
    Ok(())
}

fn print_transfer(result: &TransferResult) {
    let (d, h, m) = split_duration(result.transfer_time_s);
    println!("=== Transfer ({}) ===", result.trajectory_type);
    println!(
        "Delta-v total   : {:.3} m/s ({:.3} km/s)",
        result.delta_v_total_m_s,
        ms_to_kms(result.delta_v_total_m_s)
    );
    match result.delta_v3_m_s {
        Some(dv3) => println!(
            "Burns           : dv1 = {:.3}, dv2 = {:.3}, dv3 = {:.3} m/s",
            result.delta_v1_m_s, result.delta_v2_m_s, dv3
        ),
        None => println!(
            "Burns           : dv1 = {:.3}, dv2 = {:.3} m/s",
            result.delta_v1_m_s, result.delta_v2_m_s
        ),
    }
    println!(
        "Transfer time   : {:.1} s ({}d {}h {}m)",
        result.transfer_time_s, d, h, m
    );
    println!("Fuel efficiency : {:.2} / 100", result.fuel_efficiency);
    if let Some(a) = result.semi_major_axis_m {
        println!("Semi-major axis : {:.3} km", m_to_km(a));
    }
    if let Some(rb) = result.intermediate_radius_m {
        println!("Intermediate r  : {:.3} km", m_to_km(rb));
    }
    if let Some(details) = &result.lambert {
        println!(
            "Departure v     : [{:.3}, {:.3}, {:.3}] m/s",
            details.v1_m_s[0], details.v1_m_s[1], details.v1_m_s[2]
        );
        println!(
            "Arrival v       : [{:.3}, {:.3}, {:.3}] m/s",
            details.v2_m_s[0], details.v2_m_s[1], details.v2_m_s[2]
        );
        println!(
            "Orbit           : e = {:.6}, h = {:.6e} m^2/s, energy = {:.3} J/kg",
            details.eccentricity, details.angular_momentum_m2_s, details.specific_energy_j_kg
        );
        println!(
            "Solver          : {} after {} iterations{}",
            if details.converged { "converged" } else { "NOT converged" },
            details.iterations,
            if details.long_way { " (long way)" } else { "" }
        );
    }
}

fn print_optimization(result: &OptimizationResult) {
    println!("=== Optimization ===");
    for (idx, alt) in result.alternatives.iter().enumerate() {
        println!(
            "{} {:<12} score = {:.4} (fuel {:.3}, time {:.3}, safety {:.3}), dv = {:.3} m/s, tof = {:.3} days",
            if idx == result.optimal_index { "*" } else { " " },
            alt.trajectory.trajectory_type.as_str(),
            alt.optimization_score,
            alt.fuel_score,
            alt.time_score,
            alt.safety_score,
            alt.trajectory.delta_v_total_m_s,
            seconds_to_days(alt.trajectory.transfer_time_s),
        );
    }
    let weights = &result.trade_offs.optimization_weights;
    println!(
        "Trade-offs      : best fuel efficiency = {:.2}, shortest time = {:.1} s",
        result.trade_offs.best_fuel_efficiency, result.trade_offs.shortest_time_s
    );
    println!(
        "Weights         : fuel = {}, time = {}, safety = {}",
        weights.fuel_efficiency, weights.travel_time, weights.safety_score
    );
}

fn print_validation(report: &ValidationReport) {
    println!(
        "Validation      : {} (safety score {:.0})",
        if report.is_valid { "valid" } else { "INVALID" },
        report.safety_score
    );
    for (issue, recommendation) in report.issues.iter().zip(&report.recommendations) {
        println!("  - {issue}: {recommendation}");
    }
}
