use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use tracing::{Level, info, instrument};

use crate::{
    error::{DispatchError, ReferenceDataError},
    parsers::parser::ReferenceDataParser,
    problem::{
        address_index::AddressIndex,
        deferred_address::DeferredAddress,
        dispatch_problem::{DispatchProblem, DispatchProblemBuilder},
        distance_matrix::{Distance, DistanceMatrix},
        package::{Package, PackageBuilder, PackageId, PackageStatus},
        package_store::{DEFAULT_CAPACITY, PackageStore},
    },
};

/// Packages, addresses and distances as loaded from disk, before they are
/// handed to a [`DispatchProblem`].
#[derive(Debug)]
pub struct ReferenceData {
    pub packages: PackageStore,
    pub addresses: AddressIndex,
    pub distances: DistanceMatrix,
}

impl ReferenceData {
    /// Loads `packages.csv`, `addresses.csv` and `distances.csv` from `dir`.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self, ReferenceDataError> {
        CsvReferenceDataParser::default().parse(dir)
    }

    pub fn from_readers(
        packages: impl Read,
        addresses: impl Read,
        distances: impl Read,
        store_capacity: usize,
    ) -> Result<Self, ReferenceDataError> {
        Ok(ReferenceData {
            packages: read_packages(packages, store_capacity)?,
            addresses: read_addresses(addresses)?,
            distances: read_distances(distances)?,
        })
    }

    pub fn into_problem(
        self,
        deferred_address: Option<DeferredAddress>,
    ) -> Result<DispatchProblem, DispatchError> {
        let mut builder = DispatchProblemBuilder::default();
        builder
            .set_addresses(self.addresses)
            .set_distances(self.distances)
            .set_packages(self.packages);

        if let Some(deferred_address) = deferred_address {
            builder.set_deferred_address(deferred_address);
        }

        builder.build()
    }
}

pub struct CsvReferenceDataParser {
    pub packages_file: String,
    pub addresses_file: String,
    pub distances_file: String,
    pub store_capacity: usize,
}

impl Default for CsvReferenceDataParser {
    fn default() -> Self {
        CsvReferenceDataParser {
            packages_file: String::from("packages.csv"),
            addresses_file: String::from("addresses.csv"),
            distances_file: String::from("distances.csv"),
            store_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl ReferenceDataParser for CsvReferenceDataParser {
    #[instrument(skip_all, level = Level::DEBUG)]
    fn parse<P: AsRef<Path>>(&self, dir: P) -> Result<ReferenceData, ReferenceDataError> {
        let dir = dir.as_ref();

        let data = ReferenceData::from_readers(
            open(dir.join(&self.packages_file))?,
            open(dir.join(&self.addresses_file))?,
            open(dir.join(&self.distances_file))?,
            self.store_capacity,
        )?;

        info!(
            dir = %dir.display(),
            packages = data.packages.len(),
            addresses = data.addresses.len(),
            "Reference data loaded"
        );

        Ok(data)
    }
}

fn open(path: PathBuf) -> Result<File, ReferenceDataError> {
    File::open(&path).map_err(|source| ReferenceDataError::Io { path, source })
}

#[derive(Debug, Deserialize)]
struct PackageRecord {
    #[serde(rename = "PackageID")]
    id: u32,
    #[serde(rename = "Address")]
    address: String,
    #[serde(rename = "City", default)]
    city: String,
    #[serde(rename = "State", default)]
    state: String,
    #[serde(rename = "Zip", default)]
    zip: String,
    #[serde(rename = "Deadline", default)]
    deadline: String,
    #[serde(rename = "Weight", default)]
    weight: Option<f64>,
    #[serde(rename = "Notes", default)]
    notes: String,
    #[serde(rename = "Status", default)]
    status: Option<String>,
}

impl TryFrom<PackageRecord> for Package {
    type Error = ReferenceDataError;

    fn try_from(record: PackageRecord) -> Result<Self, Self::Error> {
        let status = match record.status {
            Some(status) => status
                .parse::<PackageStatus>()
                .map_err(|_| ReferenceDataError::InvalidStatus(status))?,
            None => PackageStatus::AtHub,
        };

        let mut builder = PackageBuilder::new(PackageId::new(record.id), record.address);
        builder
            .set_city(record.city)
            .set_state(record.state)
            .set_zip(record.zip)
            .set_notes(record.notes)
            .set_status(status);

        if !record.deadline.is_empty() {
            builder.set_deadline(record.deadline);
        }
        if let Some(weight) = record.weight {
            builder.set_weight(weight);
        }

        Ok(builder.build())
    }
}

/// Headed packages file. A repeated id keeps the last row.
pub fn read_packages(
    reader: impl Read,
    store_capacity: usize,
) -> Result<PackageStore, ReferenceDataError> {
    let mut csv = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut store = PackageStore::with_capacity(store_capacity);

    for record in csv.deserialize::<PackageRecord>() {
        store.insert(Package::try_from(record?)?)?;
    }

    Ok(store)
}

/// Headerless `index,name,address` rows. The delivery address is the third
/// column; packages are matched against it exactly.
pub fn read_addresses(reader: impl Read) -> Result<AddressIndex, ReferenceDataError> {
    let mut csv = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut entries = Vec::new();
    for (line, record) in csv.records().enumerate() {
        let record = record?;
        if record.len() < 3 {
            return Err(ReferenceDataError::MalformedAddressRow {
                line: line + 1,
                len: record.len(),
            });
        }

        let row = record[0]
            .parse::<usize>()
            .map_err(|_| ReferenceDataError::InvalidAddressIndex(record[0].to_owned()))?;
        entries.push((row, record[2].to_owned()));
    }

    Ok(AddressIndex::new(entries)?)
}

/// Headerless matrix rows. Empty cells are left missing and resolved through
/// the transposed cell, so a lower-triangular file is enough.
pub fn read_distances(reader: impl Read) -> Result<DistanceMatrix, ReferenceDataError> {
    let mut csv = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut rows: Vec<Vec<Option<Distance>>> = Vec::new();
    for (row, record) in csv.records().enumerate() {
        let record = record?;
        let cells = record
            .iter()
            .enumerate()
            .map(|(column, cell)| {
                if cell.is_empty() {
                    return Ok(None);
                }

                cell.parse::<Distance>()
                    .map(Some)
                    .map_err(|_| ReferenceDataError::InvalidDistanceCell {
                        row,
                        column,
                        value: cell.to_owned(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(cells);
    }

    Ok(DistanceMatrix::new(rows)?)
}
