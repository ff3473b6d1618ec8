use std::path::{Path, PathBuf};

use anyhow::Context;
use courier_dispatch::{
    json::fleet_plan::FleetPlan,
    parsers::{parser::ReferenceDataParser, reference_data::CsvReferenceDataParser},
    problem::{dispatch_problem::DispatchProblem, vehicle::Vehicle},
    solver::dispatcher::{DispatchReport, route_all},
};
use tracing::info;

pub const DATA_DIR_VAR: &str = "COURIER_DATA_DIR";

/// A routed day: the problem with every package stamped, the fleet after its
/// routes and the per-vehicle report.
pub struct DeliveryDay {
    pub plan: FleetPlan,
    pub problem: DispatchProblem,
    pub vehicles: Vec<Vehicle>,
    pub report: DispatchReport,
}

/// `--data`, then `COURIER_DATA_DIR`, then `./csv`.
pub fn resolve_data_dir(data: Option<PathBuf>) -> PathBuf {
    data.or_else(|| std::env::var_os(DATA_DIR_VAR).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("./csv"))
}

pub fn read_plan(plan: Option<&Path>) -> Result<FleetPlan, anyhow::Error> {
    let Some(path) = plan else {
        return Ok(FleetPlan::default());
    };

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read fleet plan {}", path.display()))?;

    FleetPlan::from_json(&json)
        .with_context(|| format!("Invalid fleet plan {}", path.display()))
}

pub fn run(data_dir: &Path, plan: FleetPlan) -> Result<DeliveryDay, anyhow::Error> {
    info!("Loading reference data from {:?}", data_dir);

    let parser = CsvReferenceDataParser {
        store_capacity: plan.store_capacity,
        ..CsvReferenceDataParser::default()
    };
    let mut problem = parser
        .parse(data_dir)
        .with_context(|| format!("Failed to load reference data from {}", data_dir.display()))?
        .into_problem(plan.deferred_address())?;

    let mut vehicles = plan.build_vehicles()?;
    let report = route_all(&mut problem, &mut vehicles)?;

    Ok(DeliveryDay {
        plan,
        problem,
        vehicles,
        report,
    })
}
