use std::hint::black_box;

use courier_dispatch::{
    problem::{
        address_index::AddressIndex,
        dispatch_problem::{DispatchProblem, DispatchProblemBuilder},
        distance_matrix::DistanceMatrix,
        package::{PackageBuilder, PackageId},
        package_store::PackageStore,
        vehicle::{Vehicle, VehicleBuilder},
    },
    solver::dispatcher::route_all,
};
use criterion::{Criterion, criterion_group, criterion_main};
use jiff::civil::time;

const NUM_ADDRESSES: usize = 27;
const NUM_PACKAGES: u32 = 40;

fn address(index: usize) -> String {
    format!("{index} Bench St")
}

fn create_problem() -> DispatchProblem {
    let addresses = AddressIndex::from_addresses((0..NUM_ADDRESSES).map(address)).unwrap();

    // Points on a line with a small per-pair jitter, kept symmetric.
    let distances = DistanceMatrix::from_dense(
        (0..NUM_ADDRESSES)
            .map(|i| {
                (0..NUM_ADDRESSES)
                    .map(|j| {
                        if i == j {
                            0.0
                        } else {
                            i.abs_diff(j) as f64 * 0.7 + ((i * j) % 5) as f64 * 0.1
                        }
                    })
                    .collect()
            })
            .collect(),
    )
    .unwrap();

    let mut packages = PackageStore::default();
    for id in 1..=NUM_PACKAGES {
        let location = (id as usize * 7) % (NUM_ADDRESSES - 1) + 1;
        packages
            .insert(PackageBuilder::new(PackageId::new(id), address(location)).build())
            .unwrap();
    }

    let mut builder = DispatchProblemBuilder::default();
    builder
        .set_addresses(addresses)
        .set_distances(distances)
        .set_packages(packages);

    builder.build().unwrap()
}

fn create_fleet(num_vehicles: u32) -> Vec<Vehicle> {
    (0..num_vehicles)
        .map(|number| {
            let mut builder = VehicleBuilder::default();
            builder
                .set_number(number + 1)
                .set_home(address(0))
                .set_depart_time(time(8, 0, 0, 0))
                .set_packages(
                    (1..=NUM_PACKAGES)
                        .filter(|id| id % num_vehicles == number)
                        .map(PackageId::new)
                        .collect(),
                );
            builder.build().unwrap()
        })
        .collect()
}

fn nearest_neighbor_benchmark(c: &mut Criterion) {
    let mut problem = create_problem();

    let mut single = create_fleet(1);
    c.bench_function("route 40 packages on one vehicle", |b| {
        b.iter(|| route_all(black_box(&mut problem), black_box(&mut single)).unwrap())
    });

    let mut fleet = create_fleet(3);
    c.bench_function("route 40 packages on three vehicles", |b| {
        b.iter(|| route_all(black_box(&mut problem), black_box(&mut fleet)).unwrap())
    });
}

criterion_group!(benches, nearest_neighbor_benchmark);
criterion_main!(benches);
