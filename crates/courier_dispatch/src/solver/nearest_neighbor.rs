use jiff::civil::Time;
use serde::Serialize;
use tracing::{Level, debug, info, instrument, warn};

use crate::{
    clock::format_clock,
    error::DispatchError,
    problem::{
        deferred_address::DeferredAddress,
        dispatch_problem::{DispatchProblem, RoadNetwork},
        distance_matrix::Distance,
        package::PackageId,
        package_store::PackageStore,
        vehicle::{Vehicle, VehicleNumber},
    },
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stop {
    pub package_id: PackageId,
    pub address: String,
    pub distance: Distance,
    pub arrival: Time,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSummary {
    pub vehicle: VehicleNumber,
    pub depart_time: Time,
    pub stops: Vec<Stop>,
    pub miles: Distance,
    /// Candidate distances measured while choosing stops, `k(k+1)/2` for `k`
    /// packages since every step scans all remaining candidates.
    pub distance_evaluations: usize,
}

impl RouteSummary {
    /// Arrival at the last stop, the depart time for an empty route.
    pub fn finish_time(&self) -> Time {
        self.stops
            .last()
            .map(|stop| stop.arrival)
            .unwrap_or(self.depart_time)
    }

    pub fn route(&self) -> Vec<PackageId> {
        self.stops.iter().map(|stop| stop.package_id).collect()
    }
}

/// Orders the vehicle's packages by repeatedly driving to the nearest
/// remaining one.
///
/// Every step measures the distance from the vehicle's location to each
/// remaining package, after bringing the deferred-address package in line
/// with the vehicle's clock. The strictly smallest distance wins; on ties the
/// candidate that comes first in loading order wins, which keeps routes
/// reproducible. Each delivered package is stamped with the vehicle, the
/// vehicle's depart time and its arrival time.
///
/// The vehicle is reset first, so routing it again gives the same route. On
/// failure the vehicle is back at its home and none of the packages it
/// reached keep a stamp.
#[instrument(skip_all, fields(vehicle = %vehicle.number()), level = Level::DEBUG)]
pub fn route_vehicle(
    problem: &mut DispatchProblem,
    vehicle: &mut Vehicle,
) -> Result<RouteSummary, DispatchError> {
    let (network, deferred_address, packages) = problem.split_mut();
    vehicle.reset();

    if let Some(&missing) = vehicle
        .assigned_packages()
        .iter()
        .find(|&&id| !packages.contains(id))
    {
        return Err(DispatchError::UnassignedPackage {
            vehicle: vehicle.number(),
            package_id: missing,
        });
    }

    let mut summary = RouteSummary {
        vehicle: vehicle.number(),
        depart_time: vehicle.depart_time(),
        stops: Vec::with_capacity(vehicle.assigned_packages().len()),
        miles: 0.0,
        distance_evaluations: 0,
    };

    if let Err(error) = drive(network, deferred_address, packages, vehicle, &mut summary) {
        for &package_id in vehicle.route() {
            if let Some(package) = packages.lookup_mut(package_id) {
                package.reset();
            }
        }
        vehicle.reset();

        return Err(error);
    }

    summary.miles = vehicle.miles();

    info!(
        vehicle = %vehicle.number(),
        stops = summary.stops.len(),
        miles = summary.miles,
        finish = %format_clock(summary.finish_time()),
        "Vehicle routed"
    );

    Ok(summary)
}

fn drive(
    network: &RoadNetwork,
    deferred_address: Option<&DeferredAddress>,
    packages: &mut PackageStore,
    vehicle: &mut Vehicle,
    summary: &mut RouteSummary,
) -> Result<(), DispatchError> {
    let mut pending: Vec<PackageId> = vehicle.assigned_packages().to_vec();

    while !pending.is_empty() {
        let from = network.locate(vehicle.location())?;
        let mut nearest: Option<(usize, Distance)> = None;

        for (position, &package_id) in pending.iter().enumerate() {
            let package = packages
                .lookup_mut(package_id)
                .ok_or(DispatchError::UnassignedPackage {
                    vehicle: vehicle.number(),
                    package_id,
                })?;

            if let Some(rule) = deferred_address {
                if rule.apply(package, vehicle.clock()) {
                    warn!(
                        package = %package_id,
                        address = package.address(),
                        at = %format_clock(vehicle.clock()),
                        "Deferred address updated"
                    );
                }
            }

            let distance = network.distance(from, network.locate_package(package)?);
            summary.distance_evaluations += 1;

            if nearest.is_none_or(|(_, best)| distance < best) {
                nearest = Some((position, distance));
            }
        }

        let Some((position, distance)) = nearest else {
            break;
        };

        let package_id = pending.remove(position);
        let package = packages
            .lookup_mut(package_id)
            .ok_or(DispatchError::UnassignedPackage {
                vehicle: vehicle.number(),
                package_id,
            })?;

        let arrival = vehicle.travel_to(package.address(), distance)?;
        package.assign(vehicle.number(), vehicle.depart_time(), arrival)?;
        vehicle.push_stop(package_id);

        debug!(
            package = %package_id,
            address = package.address(),
            distance,
            arrival = %format_clock(arrival),
            "Delivered"
        );

        summary.stops.push(Stop {
            package_id,
            address: package.address().to_owned(),
            distance,
            arrival,
        });
    }

    Ok(())
}
