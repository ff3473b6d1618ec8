use jiff::civil::{Time, time};
use serde::{Deserialize, Serialize};

use crate::{
    error::DispatchError,
    problem::{
        deferred_address::{AddressState, DeferredAddress},
        package::PackageId,
        package_store::DEFAULT_CAPACITY,
        vehicle::{DEFAULT_SPEED, Vehicle, VehicleBuilder},
    },
    solver::status::END_OF_DAY,
};

pub const DEFAULT_HUB: &str = "4001 South 700 East";

/// Which vehicle leaves when with which packages, plus the day's
/// deferred-address rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename = "FleetPlan")]
pub struct FleetPlan {
    pub hub: String,
    #[serde(default = "default_store_capacity")]
    pub store_capacity: usize,
    pub vehicles: Vec<JsonVehicle>,
    #[serde(default)]
    pub deferred_address: Option<JsonDeferredAddress>,
    #[serde(default = "default_end_of_day")]
    pub end_of_day: Time,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename = "Vehicle")]
pub struct JsonVehicle {
    pub number: u32,
    pub depart_time: Time,
    pub speed: Option<f64>,
    pub packages: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename = "DeferredAddress")]
pub struct JsonDeferredAddress {
    pub package_id: u32,
    pub cutoff: Time,
    pub placeholder: AddressState,
    pub corrected: AddressState,
    pub annotation: Option<String>,
}

fn default_store_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_end_of_day() -> Time {
    END_OF_DAY
}

impl Default for FleetPlan {
    /// Three trucks out of the hub at 08:00, 09:05 and 10:20. Package 9 is
    /// listed at the wrong address until 10:20.
    fn default() -> Self {
        let vehicle = |number: u32, depart_time: Time, packages: &[u32]| JsonVehicle {
            number,
            depart_time,
            speed: Some(DEFAULT_SPEED),
            packages: packages.to_vec(),
        };

        FleetPlan {
            hub: String::from(DEFAULT_HUB),
            store_capacity: DEFAULT_CAPACITY,
            vehicles: vec![
                vehicle(
                    1,
                    time(8, 0, 0, 0),
                    &[1, 13, 14, 15, 16, 19, 20, 29, 30, 31, 34, 37, 40],
                ),
                vehicle(
                    2,
                    time(9, 5, 0, 0),
                    &[3, 6, 12, 17, 18, 21, 22, 23, 24, 26, 27, 33, 35, 36, 38, 39],
                ),
                vehicle(
                    3,
                    time(10, 20, 0, 0),
                    &[2, 4, 5, 7, 8, 9, 10, 11, 25, 28, 32],
                ),
            ],
            deferred_address: Some(JsonDeferredAddress {
                package_id: 9,
                cutoff: time(10, 20, 0, 0),
                placeholder: AddressState::new("300 State St", "84103"),
                corrected: AddressState::new("410 S State St", "84111"),
                annotation: None,
            }),
            end_of_day: END_OF_DAY,
        }
    }
}

impl FleetPlan {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Vehicles parked at the hub, in plan order.
    pub fn build_vehicles(&self) -> Result<Vec<Vehicle>, DispatchError> {
        self.vehicles
            .iter()
            .map(|vehicle| {
                let mut builder = VehicleBuilder::default();
                builder
                    .set_number(vehicle.number)
                    .set_home(self.hub.clone())
                    .set_depart_time(vehicle.depart_time)
                    .set_packages(vehicle.packages.iter().copied().map(PackageId::new).collect());

                if let Some(speed) = vehicle.speed {
                    builder.set_speed(speed);
                }

                builder.build()
            })
            .collect()
    }

    pub fn deferred_address(&self) -> Option<DeferredAddress> {
        self.deferred_address.as_ref().map(|rule| {
            let deferred = DeferredAddress::new(
                PackageId::new(rule.package_id),
                rule.cutoff,
                rule.placeholder.clone(),
                rule.corrected.clone(),
            );

            match &rule.annotation {
                Some(annotation) => deferred.with_annotation(annotation.clone()),
                None => deferred,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::dispatcher::validate_assignments;

    #[test]
    fn test_default_plan_loads_every_package_once() {
        let plan = FleetPlan::default();
        let vehicles = plan.build_vehicles().unwrap();

        assert_eq!(vehicles.len(), 3);
        validate_assignments(&vehicles).unwrap();

        let mut ids: Vec<u32> = vehicles
            .iter()
            .flat_map(|vehicle| vehicle.assigned_packages().iter().map(PackageId::get))
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=40).collect::<Vec<_>>());

        assert!(vehicles.iter().all(|vehicle| vehicle.home() == DEFAULT_HUB));
        assert!(vehicles.iter().all(|vehicle| vehicle.speed() == 18.0));
    }

    #[test]
    fn test_default_deferred_address() {
        let rule = FleetPlan::default().deferred_address().unwrap();

        assert_eq!(rule.package_id(), PackageId::new(9));
        assert_eq!(rule.cutoff(), time(10, 20, 0, 0));
        assert_eq!(rule.corrected().address, "410 S State St");
        assert_eq!(rule.annotation(), ". Address fixed at 10:20:00");
    }

    #[test]
    fn test_minimal_plan() {
        let json = r#"{
            "hub": "4001 South 700 East",
            "vehicles": [
                { "number": 4, "depart_time": "07:30:00", "speed": null, "packages": [2, 1] }
            ]
        }"#;

        let plan = FleetPlan::from_json(json).unwrap();

        assert_eq!(plan.store_capacity, DEFAULT_CAPACITY);
        assert_eq!(plan.end_of_day, END_OF_DAY);
        assert!(plan.deferred_address().is_none());

        let vehicles = plan.build_vehicles().unwrap();
        assert_eq!(vehicles[0].depart_time(), time(7, 30, 0, 0));
        assert_eq!(vehicles[0].speed(), DEFAULT_SPEED);
        assert_eq!(
            vehicles[0].assigned_packages(),
            &[PackageId::new(2), PackageId::new(1)]
        );
    }

    #[test]
    fn test_custom_annotation() {
        let json = r#"{
            "hub": "HUB",
            "vehicles": [],
            "deferred_address": {
                "package_id": 3,
                "cutoff": "09:00:00",
                "placeholder": { "address": "A", "zip": "1" },
                "corrected": { "address": "B", "zip": "2" },
                "annotation": " (corrected)"
            }
        }"#;

        let rule = FleetPlan::from_json(json).unwrap().deferred_address().unwrap();

        assert_eq!(rule.annotation(), " (corrected)");
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let json = r#"{ "hub": "HUB", "vehicles": [], "trucks": 3 }"#;

        assert!(FleetPlan::from_json(json).is_err());
    }

    #[test]
    fn test_invalid_speed_rejected() {
        let mut plan = FleetPlan::default();
        plan.vehicles[1].speed = Some(0.0);

        assert!(matches!(
            plan.build_vehicles(),
            Err(DispatchError::InvalidSpeed { .. })
        ));
    }

    #[test]
    fn test_default_plan_json() {
        let plan = FleetPlan::default();

        let json = plan.to_json().unwrap();

        assert!(json.contains("\"depart_time\": \"09:05:00\""));
        assert_eq!(FleetPlan::from_json(&json).unwrap(), plan);
    }
}
