use fxhash::FxHashMap;
use serde::Serialize;
use tracing::{Level, info, instrument};

use crate::{
    error::DispatchError,
    problem::{
        dispatch_problem::DispatchProblem,
        distance_matrix::Distance,
        package::PackageId,
        vehicle::{Vehicle, VehicleNumber},
    },
    solver::nearest_neighbor::{RouteSummary, route_vehicle},
    timer_debug,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchReport {
    pub routes: Vec<RouteSummary>,
    pub total_miles: Distance,
}

/// Sum of the miles driven by every vehicle, in fleet order.
pub fn total_mileage(vehicles: &[Vehicle]) -> Distance {
    vehicles.iter().map(Vehicle::miles).sum()
}

/// Rejects a fleet where some package is loaded more than once, either on
/// two vehicles or twice on the same one. Disjoint loads mean routing one
/// vehicle never touches another vehicle's packages.
pub fn validate_assignments(vehicles: &[Vehicle]) -> Result<(), DispatchError> {
    let mut owners: FxHashMap<PackageId, VehicleNumber> = FxHashMap::default();

    for vehicle in vehicles {
        for &package_id in vehicle.assigned_packages() {
            if let Some(first) = owners.insert(package_id, vehicle.number()) {
                return Err(DispatchError::DuplicateAssignment {
                    package_id,
                    first,
                    second: vehicle.number(),
                });
            }
        }
    }

    Ok(())
}

/// Clears every routing result so the fleet can be routed again.
pub fn reset(problem: &mut DispatchProblem, vehicles: &mut [Vehicle]) {
    problem.reset_packages();
    for vehicle in vehicles.iter_mut() {
        vehicle.reset();
    }
}

/// Routes the whole fleet one vehicle after another.
///
/// Assignments are validated before anything is touched, and previous
/// routing results are cleared first so stale delivery times can't leak into
/// this run. The first vehicle that fails to route aborts the run.
#[instrument(skip_all, level = Level::DEBUG)]
pub fn route_all(
    problem: &mut DispatchProblem,
    vehicles: &mut [Vehicle],
) -> Result<DispatchReport, DispatchError> {
    validate_assignments(vehicles)?;
    reset(problem, vehicles);

    let routes = timer_debug!("Routing fleet", {
        let mut routes = Vec::with_capacity(vehicles.len());
        for vehicle in vehicles.iter_mut() {
            routes.push(route_vehicle(problem, vehicle)?);
        }
        routes
    });

    let total_miles = total_mileage(vehicles);
    info!(
        vehicles = vehicles.len(),
        total_miles, "Fleet routed"
    );

    Ok(DispatchReport {
        routes,
        total_miles,
    })
}
