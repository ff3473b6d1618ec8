use std::fmt::Display;

use jiff::civil::{Time, time};
use serde::Serialize;

use crate::{
    clock::format_clock,
    error::DispatchError,
    problem::{
        deferred_address::DeferredAddress,
        dispatch_problem::DispatchProblem,
        package::{Package, PackageId, PackageStatus},
        vehicle::VehicleNumber,
    },
};

pub const END_OF_DAY: Time = time(17, 0, 0, 0);

/// How a package reads at one instant. Derived from the routing assignment
/// and never written back to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentedStatus {
    pub package_id: PackageId,
    pub at: Time,
    pub status: PackageStatus,
    pub vehicle: Option<VehicleNumber>,
    pub depart_time: Option<Time>,
    pub delivery_time: Option<Time>,
    pub address: String,
    pub zip: String,
    pub deadline: String,
    pub notes: String,
}

impl Display for PresentedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Package {} at {}: {}",
            self.package_id,
            format_clock(self.at),
            self.status
        )?;

        if let Some(vehicle) = self.vehicle {
            write!(f, " (truck {vehicle}")?;
            if let Some(depart_time) = self.depart_time {
                write!(f, ", departed {}", format_clock(depart_time))?;
            }
            if let Some(delivery_time) = self.delivery_time {
                write!(f, ", delivered {}", format_clock(delivery_time))?;
            }
            write!(f, ")")?;
        }

        Ok(())
    }
}

/// Status of `package` at `at`.
///
/// - delivered when the delivery time is strictly before `at`;
/// - en route from the depart time up to and including the delivery time,
///   with the delivery time withheld since it hasn't happened yet;
/// - at hub otherwise, with vehicle and times withheld as the package hasn't
///   been dispatched yet.
///
/// Address and notes follow the deferred-address rule at `at`.
pub fn resolve_status(
    package: &Package,
    at: Time,
    deferred_address: Option<&DeferredAddress>,
) -> PresentedStatus {
    let (status, vehicle, depart_time, delivery_time) = match package.assignment() {
        Some(assignment) if assignment.delivery_time() < at => (
            PackageStatus::Delivered,
            Some(assignment.vehicle()),
            Some(assignment.depart_time()),
            Some(assignment.delivery_time()),
        ),
        Some(assignment) if assignment.depart_time() <= at => (
            PackageStatus::EnRoute,
            Some(assignment.vehicle()),
            Some(assignment.depart_time()),
            None,
        ),
        _ => (PackageStatus::AtHub, None, None, None),
    };

    let (address, zip, notes) = match deferred_address {
        Some(rule) if rule.applies_to(package.id()) => {
            let state = rule.address_at(at);
            (
                state.address.clone(),
                state.zip.clone(),
                rule.notes_at(package.notes(), at),
            )
        }
        _ => (
            package.address().to_owned(),
            package.zip().to_owned(),
            package.notes().to_owned(),
        ),
    };

    PresentedStatus {
        package_id: package.id(),
        at,
        status,
        vehicle,
        depart_time,
        delivery_time,
        address,
        zip,
        deadline: package.deadline().to_owned(),
        notes,
    }
}

pub fn package_status(
    problem: &DispatchProblem,
    package_id: PackageId,
    at: Time,
) -> Result<PresentedStatus, DispatchError> {
    problem
        .packages()
        .lookup(package_id)
        .map(|package| resolve_status(package, at, problem.deferred_address()))
        .ok_or(DispatchError::PackageNotFound(package_id))
}

/// Every package at `at`, in ascending id order.
pub fn snapshot(problem: &DispatchProblem, at: Time) -> Vec<PresentedStatus> {
    problem
        .packages()
        .ids()
        .into_iter()
        .filter_map(|id| problem.packages().lookup(id))
        .map(|package| resolve_status(package, at, problem.deferred_address()))
        .collect()
}
