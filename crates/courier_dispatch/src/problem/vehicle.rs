use jiff::civil::Time;
use serde::Serialize;

use crate::{
    clock::{advance, travel_duration},
    define_id_newtype,
    error::DispatchError,
    problem::{distance_matrix::Distance, package::PackageId},
};

define_id_newtype!(VehicleNumber);

/// Miles per hour.
pub const DEFAULT_SPEED: f64 = 18.0;

/// A truck leaving the hub at `depart_time` with a fixed set of packages.
///
/// Routing moves the vehicle along: `location`, `miles` and `clock` follow the
/// last delivered stop and `route` records the visiting order. The assignment
/// itself is kept so the vehicle can be reset and routed again.
#[derive(Serialize, Debug, Clone)]
pub struct Vehicle {
    number: VehicleNumber,
    home: String,
    speed: f64,
    depart_time: Time,
    assigned: Vec<PackageId>,

    location: String,
    miles: Distance,
    clock: Time,
    route: Vec<PackageId>,
}

impl Vehicle {
    pub fn number(&self) -> VehicleNumber {
        self.number
    }

    pub fn home(&self) -> &str {
        &self.home
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn depart_time(&self) -> Time {
        self.depart_time
    }

    /// Packages loaded on the vehicle, in loading order.
    pub fn assigned_packages(&self) -> &[PackageId] {
        &self.assigned
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn miles(&self) -> Distance {
        self.miles
    }

    /// Time at the vehicle's current location; the depart time until the
    /// first delivery.
    pub fn clock(&self) -> Time {
        self.clock
    }

    /// Delivered packages in visiting order.
    pub fn route(&self) -> &[PackageId] {
        &self.route
    }

    /// Drives `distance` miles to `address` and returns the arrival time.
    pub(crate) fn travel_to(
        &mut self,
        address: &str,
        distance: Distance,
    ) -> Result<Time, DispatchError> {
        self.clock = advance(self.clock, travel_duration(distance, self.speed))?;
        self.miles += distance;
        self.location = address.to_owned();

        Ok(self.clock)
    }

    pub(crate) fn push_stop(&mut self, package_id: PackageId) {
        self.route.push(package_id);
    }

    /// Back at the hub at departure time with nothing delivered.
    pub fn reset(&mut self) {
        self.location = self.home.clone();
        self.miles = 0.0;
        self.clock = self.depart_time;
        self.route.clear();
    }
}

#[derive(Default)]
pub struct VehicleBuilder {
    number: Option<u32>,
    home: Option<String>,
    speed: Option<f64>,
    depart_time: Option<Time>,
    packages: Option<Vec<PackageId>>,
}

impl VehicleBuilder {
    pub fn set_number(&mut self, number: u32) -> &mut VehicleBuilder {
        self.number = Some(number);
        self
    }

    pub fn set_home(&mut self, home: String) -> &mut VehicleBuilder {
        self.home = Some(home);
        self
    }

    pub fn set_speed(&mut self, speed: f64) -> &mut VehicleBuilder {
        self.speed = Some(speed);
        self
    }

    pub fn set_depart_time(&mut self, depart_time: Time) -> &mut VehicleBuilder {
        self.depart_time = Some(depart_time);
        self
    }

    pub fn set_packages(&mut self, packages: Vec<PackageId>) -> &mut VehicleBuilder {
        self.packages = Some(packages);
        self
    }

    pub fn build(self) -> Result<Vehicle, DispatchError> {
        let number = VehicleNumber::new(self.number.unwrap_or(1));
        let speed = self.speed.unwrap_or(DEFAULT_SPEED);
        if !(speed.is_finite() && speed > 0.0) {
            return Err(DispatchError::InvalidSpeed {
                vehicle: number,
                speed,
            });
        }

        let home = self.home.unwrap_or_default();
        let depart_time = self.depart_time.unwrap_or(Time::midnight());

        Ok(Vehicle {
            number,
            location: home.clone(),
            home,
            speed,
            depart_time,
            clock: depart_time,
            assigned: self.packages.unwrap_or_default(),
            miles: 0.0,
            route: vec![],
        })
    }
}
