use std::path::PathBuf;

use jiff::{SignedDuration, civil::Time};
use thiserror::Error;

use crate::problem::{package::PackageId, vehicle::VehicleNumber};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    #[error("Package store is full ({capacity} slots)")]
    Capacity { capacity: usize },

    #[error("Package {0} not found")]
    PackageNotFound(PackageId),

    #[error("Address '{address}' of package {package_id} is not in the address index")]
    UnknownAddress {
        package_id: PackageId,
        address: String,
    },

    #[error("Address '{0}' is not in the address index")]
    UnknownLocation(String),

    #[error("Vehicle {vehicle} is assigned package {package_id} which is not in the store")]
    UnassignedPackage {
        vehicle: VehicleNumber,
        package_id: PackageId,
    },

    #[error("No distance between address rows {from} and {to}")]
    MissingDistance { from: usize, to: usize },

    #[error("Distances between address rows {from} and {to} differ by direction")]
    AsymmetricDistance { from: usize, to: usize },

    #[error("Package {package_id} is assigned to both vehicle {first} and vehicle {second}")]
    DuplicateAssignment {
        package_id: PackageId,
        first: VehicleNumber,
        second: VehicleNumber,
    },

    #[error("Package {package_id} would be delivered before it departs")]
    InvalidAssignment { package_id: PackageId },

    #[error("Vehicle {vehicle} has a non-positive speed ({speed})")]
    InvalidSpeed { vehicle: VehicleNumber, speed: f64 },

    #[error("Address '{0}' appears more than once in the address index")]
    DuplicateAddress(String),

    #[error("Address row {row} is out of range or repeated ({len} addresses)")]
    InvalidAddressRow { row: usize, len: usize },

    #[error("Distance matrix row {row} has {len} cells, expected at most {expected}")]
    MatrixRowTooLong {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("Distance matrix has {rows} rows but the address index has {addresses} entries")]
    MatrixDimension { rows: usize, addresses: usize },

    #[error("Distance {value} between rows {from} and {to} is not a finite non-negative number")]
    InvalidDistance { from: usize, to: usize, value: f64 },

    #[error("Clock overflow: {start} + {duration:?} runs past midnight")]
    ClockOverflow {
        start: Time,
        duration: SignedDuration,
    },
}

#[derive(Error, Debug)]
pub enum ReferenceDataError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("Distance cell ({row}, {column}) is not a number: '{value}'")]
    InvalidDistanceCell {
        row: usize,
        column: usize,
        value: String,
    },

    #[error("Address row {line} should have index, name and address columns, found {len}")]
    MalformedAddressRow { line: usize, len: usize },

    #[error("Address index '{0}' is not a row number")]
    InvalidAddressIndex(String),

    #[error("Unknown package status '{0}'")]
    InvalidStatus(String),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}
