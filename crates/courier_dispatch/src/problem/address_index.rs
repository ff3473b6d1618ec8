use fxhash::FxHashMap;

use crate::{define_index_newtype, error::DispatchError};

define_index_newtype!(AddressIdx, String);

/// Maps delivery addresses onto rows of the distance matrix.
///
/// Rows form a bijection onto `0..len()`, so the index and the matrix can be
/// checked against each other by size alone.
#[derive(Debug, Clone)]
pub struct AddressIndex {
    addresses: Vec<String>,
    rows: FxHashMap<String, AddressIdx>,
}

impl AddressIndex {
    /// Builds the index from `(row, address)` pairs in any order.
    pub fn new(entries: Vec<(usize, String)>) -> Result<Self, DispatchError> {
        let len = entries.len();
        let mut slots: Vec<Option<String>> = vec![None; len];
        let mut rows = FxHashMap::default();

        for (row, address) in entries {
            if row >= len || slots[row].is_some() {
                return Err(DispatchError::InvalidAddressRow { row, len });
            }

            if rows.insert(address.clone(), AddressIdx::new(row)).is_some() {
                return Err(DispatchError::DuplicateAddress(address));
            }

            slots[row] = Some(address);
        }

        Ok(AddressIndex {
            addresses: slots.into_iter().flatten().collect(),
            rows,
        })
    }

    /// Builds the index with rows numbered in iteration order.
    pub fn from_addresses<I, S>(addresses: I) -> Result<Self, DispatchError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            addresses
                .into_iter()
                .map(Into::into)
                .enumerate()
                .collect(),
        )
    }

    pub fn index_of(&self, address: &str) -> Option<AddressIdx> {
        self.rows.get(address).copied()
    }

    pub fn address(&self, index: AddressIdx) -> &str {
        &self.addresses[index]
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AddressIdx, &str)> {
        self.addresses
            .iter()
            .enumerate()
            .map(|(row, address)| (AddressIdx::new(row), address.as_str()))
    }
}
