use std::{fmt::Display, str::FromStr};

use jiff::civil::Time;
use serde::{Deserialize, Serialize};

use crate::{
    clock::format_clock, define_id_newtype, error::DispatchError,
    problem::vehicle::VehicleNumber,
};

define_id_newtype!(PackageId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PackageStatus {
    #[default]
    AtHub,
    EnRoute,
    Delivered,
}

impl Display for PackageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                PackageStatus::AtHub => "at hub",
                PackageStatus::EnRoute => "en route",
                PackageStatus::Delivered => "delivered",
            }
        )
    }
}

impl FromStr for PackageStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', " ").as_str() {
            "" | "at hub" => Ok(PackageStatus::AtHub),
            "en route" => Ok(PackageStatus::EnRoute),
            "delivered" => Ok(PackageStatus::Delivered),
            other => Err(format!("Unknown package status '{other}'")),
        }
    }
}

/// Result of routing a package: which vehicle carries it, when that vehicle
/// leaves the hub and when it reaches the package's address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteAssignment {
    vehicle: VehicleNumber,
    depart_time: Time,
    delivery_time: Time,
}

impl RouteAssignment {
    pub fn vehicle(&self) -> VehicleNumber {
        self.vehicle
    }

    pub fn depart_time(&self) -> Time {
        self.depart_time
    }

    pub fn delivery_time(&self) -> Time {
        self.delivery_time
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Package {
    id: PackageId,
    address: String,
    deadline: String,
    city: String,
    state: String,
    zip: String,
    weight: f64,
    notes: String,
    status: PackageStatus,
    assignment: Option<RouteAssignment>,
}

impl Package {
    pub fn id(&self) -> PackageId {
        self.id
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn deadline(&self) -> &str {
        &self.deadline
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn zip(&self) -> &str {
        &self.zip
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Status the package was loaded with. Time-dependent status is derived
    /// by [`crate::solver::status::resolve_status`].
    pub fn status(&self) -> PackageStatus {
        self.status
    }

    pub fn assignment(&self) -> Option<&RouteAssignment> {
        self.assignment.as_ref()
    }

    pub fn is_assigned(&self) -> bool {
        self.assignment.is_some()
    }

    pub(crate) fn set_delivery_address(&mut self, address: &str, zip: &str) {
        self.address = address.to_owned();
        self.zip = zip.to_owned();
    }

    pub(crate) fn set_notes(&mut self, notes: String) {
        self.notes = notes;
    }

    /// Stamps the routing result. Vehicle, depart and delivery are always set
    /// together and the delivery can't precede the departure.
    pub(crate) fn assign(
        &mut self,
        vehicle: VehicleNumber,
        depart_time: Time,
        delivery_time: Time,
    ) -> Result<(), DispatchError> {
        if delivery_time < depart_time {
            return Err(DispatchError::InvalidAssignment {
                package_id: self.id,
            });
        }

        self.assignment = Some(RouteAssignment {
            vehicle,
            depart_time,
            delivery_time,
        });

        Ok(())
    }

    /// Back to the freshly loaded state, required before routing again.
    pub fn reset(&mut self) {
        self.assignment = None;
        self.status = PackageStatus::AtHub;
    }
}

impl Display for Package {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let optional = |value: Option<String>| value.unwrap_or_else(|| String::from("None"));

        write!(
            f,
            "Package ID: {}, Address: {}, Deadline: {}, City: {}, State: {}, Zip Code: {}, \
             Weight: {}, Status: {}, Truck Number: {}, Depart Time: {}, Delivery Time: {}, Notes: {}",
            self.id,
            self.address,
            self.deadline,
            self.city,
            self.state,
            self.zip,
            self.weight,
            self.status,
            optional(self.assignment.map(|a| a.vehicle.to_string())),
            optional(self.assignment.map(|a| format_clock(a.depart_time))),
            optional(self.assignment.map(|a| format_clock(a.delivery_time))),
            self.notes,
        )
    }
}

pub struct PackageBuilder {
    id: PackageId,
    address: String,
    deadline: Option<String>,
    city: Option<String>,
    state: Option<String>,
    zip: Option<String>,
    weight: Option<f64>,
    notes: Option<String>,
    status: Option<PackageStatus>,
}

impl PackageBuilder {
    pub fn new(id: PackageId, address: impl Into<String>) -> PackageBuilder {
        PackageBuilder {
            id,
            address: address.into(),
            deadline: None,
            city: None,
            state: None,
            zip: None,
            weight: None,
            notes: None,
            status: None,
        }
    }

    pub fn set_deadline(&mut self, deadline: String) -> &mut PackageBuilder {
        self.deadline = Some(deadline);
        self
    }

    pub fn set_city(&mut self, city: String) -> &mut PackageBuilder {
        self.city = Some(city);
        self
    }

    pub fn set_state(&mut self, state: String) -> &mut PackageBuilder {
        self.state = Some(state);
        self
    }

    pub fn set_zip(&mut self, zip: String) -> &mut PackageBuilder {
        self.zip = Some(zip);
        self
    }

    pub fn set_weight(&mut self, weight: f64) -> &mut PackageBuilder {
        self.weight = Some(weight);
        self
    }

    pub fn set_notes(&mut self, notes: String) -> &mut PackageBuilder {
        self.notes = Some(notes);
        self
    }

    pub fn set_status(&mut self, status: PackageStatus) -> &mut PackageBuilder {
        self.status = Some(status);
        self
    }

    pub fn build(self) -> Package {
        Package {
            id: self.id,
            address: self.address,
            deadline: self.deadline.unwrap_or_else(|| String::from("EOD")),
            city: self.city.unwrap_or_default(),
            state: self.state.unwrap_or_default(),
            zip: self.zip.unwrap_or_default(),
            weight: self.weight.unwrap_or(0.0),
            notes: self.notes.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            assignment: None,
        }
    }
}
