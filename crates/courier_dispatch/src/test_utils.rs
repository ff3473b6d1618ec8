use jiff::civil::{Time, time};

use crate::problem::{
    address_index::AddressIndex,
    deferred_address::{AddressState, DeferredAddress},
    dispatch_problem::{DispatchProblem, DispatchProblemBuilder},
    distance_matrix::DistanceMatrix,
    package::{Package, PackageBuilder, PackageId},
    package_store::PackageStore,
    vehicle::{Vehicle, VehicleBuilder},
};

pub const HUB: &str = "4001 South 700 East";
pub const ADDRESS_A: &str = "195 W Oakland Ave";
pub const ADDRESS_B: &str = "2530 S 500 E";
pub const ADDRESS_C: &str = "233 Canyon Rd";
pub const PLACEHOLDER: &str = "300 State St";
pub const CORRECTED: &str = "410 S State St";

pub const DEFERRED_CUTOFF: Time = time(8, 10, 0, 0);

//
//  Lower-triangular miles between the test addresses:
//
//              HUB   A    B    C    PH   CO
//  HUB         0
//  A           2     0
//  B           4     3    0
//  C           6     5    1    0
//  PLACEHOLDER 7     3    5    7    0
//  CORRECTED   9     8    2    3    10   0
//
pub fn create_test_addresses() -> AddressIndex {
    AddressIndex::from_addresses([HUB, ADDRESS_A, ADDRESS_B, ADDRESS_C, PLACEHOLDER, CORRECTED])
        .unwrap()
}

pub fn create_test_distances() -> DistanceMatrix {
    let rows: Vec<Vec<f64>> = vec![
        vec![0.0],
        vec![2.0, 0.0],
        vec![4.0, 3.0, 0.0],
        vec![6.0, 5.0, 1.0, 0.0],
        vec![7.0, 3.0, 5.0, 7.0, 0.0],
        vec![9.0, 8.0, 2.0, 3.0, 10.0, 0.0],
    ];

    DistanceMatrix::new(
        rows.into_iter()
            .map(|row| row.into_iter().map(Some).collect())
            .collect(),
    )
    .unwrap()
}

pub fn create_test_package(id: u32, address: &str) -> Package {
    PackageBuilder::new(PackageId::new(id), address).build()
}

pub fn create_test_deferred_address() -> DeferredAddress {
    DeferredAddress::new(
        PackageId::new(5),
        DEFERRED_CUTOFF,
        AddressState::new(PLACEHOLDER, "84103"),
        AddressState::new(CORRECTED, "84111"),
    )
}

/// Packages 1 and 4 share address A; package 5 starts on the placeholder
/// address and is corrected at 08:10.
pub fn create_test_problem() -> DispatchProblem {
    let mut packages = PackageStore::with_capacity(10);
    for (id, address) in [(1, ADDRESS_A), (2, ADDRESS_B), (3, ADDRESS_C), (4, ADDRESS_A)] {
        packages.insert(create_test_package(id, address)).unwrap();
    }

    let mut deferred = PackageBuilder::new(PackageId::new(5), PLACEHOLDER);
    deferred
        .set_zip(String::from("84103"))
        .set_notes(String::from("Wrong address listed"));
    packages.insert(deferred.build()).unwrap();

    let mut builder = DispatchProblemBuilder::default();
    builder
        .set_addresses(create_test_addresses())
        .set_distances(create_test_distances())
        .set_packages(packages)
        .set_deferred_address(create_test_deferred_address());

    builder.build().unwrap()
}

pub fn create_test_vehicle(number: u32, depart_time: Time, packages: &[u32]) -> Vehicle {
    let mut builder = VehicleBuilder::default();
    builder
        .set_number(number)
        .set_home(String::from(HUB))
        .set_depart_time(depart_time)
        .set_packages(packages.iter().copied().map(PackageId::new).collect());

    builder.build().unwrap()
}
