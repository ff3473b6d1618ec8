use jiff::civil::Time;
use serde::{Deserialize, Serialize};

use crate::{
    clock::format_clock,
    problem::package::{Package, PackageId},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressState {
    pub address: String,
    pub zip: String,
}

impl AddressState {
    pub fn new(address: impl Into<String>, zip: impl Into<String>) -> Self {
        AddressState {
            address: address.into(),
            zip: zip.into(),
        }
    }
}

/// A package whose address is only known to be correct from `cutoff` on.
///
/// Before the cutoff the package carries the `placeholder` address; from the
/// cutoff on it carries `corrected` and its notes end with `annotation`
/// exactly once. Evaluation is a function of the clock only, so moving the
/// clock backwards undoes the correction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeferredAddress {
    package_id: PackageId,
    cutoff: Time,
    placeholder: AddressState,
    corrected: AddressState,
    annotation: String,
}

impl DeferredAddress {
    pub fn new(
        package_id: PackageId,
        cutoff: Time,
        placeholder: AddressState,
        corrected: AddressState,
    ) -> Self {
        DeferredAddress {
            package_id,
            cutoff,
            placeholder,
            corrected,
            annotation: format!(". Address fixed at {}", format_clock(cutoff)),
        }
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = annotation.into();
        self
    }

    pub fn package_id(&self) -> PackageId {
        self.package_id
    }

    pub fn cutoff(&self) -> Time {
        self.cutoff
    }

    pub fn placeholder(&self) -> &AddressState {
        &self.placeholder
    }

    pub fn corrected(&self) -> &AddressState {
        &self.corrected
    }

    pub fn annotation(&self) -> &str {
        &self.annotation
    }

    pub fn applies_to(&self, package_id: PackageId) -> bool {
        self.package_id == package_id
    }

    pub fn is_corrected_at(&self, time: Time) -> bool {
        time >= self.cutoff
    }

    pub fn address_at(&self, time: Time) -> &AddressState {
        if self.is_corrected_at(time) {
            &self.corrected
        } else {
            &self.placeholder
        }
    }

    /// Notes as they read at `time`.
    pub fn notes_at(&self, notes: &str, time: Time) -> String {
        if self.annotation.is_empty() {
            return notes.to_owned();
        }

        let mut notes = notes.replace(&self.annotation, "");
        if self.is_corrected_at(time) {
            notes.push_str(&self.annotation);
        }

        notes
    }

    /// Brings the package's address and notes in line with `time`. Returns
    /// whether anything changed; other packages are left untouched.
    pub fn apply(&self, package: &mut Package, time: Time) -> bool {
        if !self.applies_to(package.id()) {
            return false;
        }

        let state = self.address_at(time);
        let notes = self.notes_at(package.notes(), time);
        let changed =
            package.address() != state.address || package.zip() != state.zip || package.notes() != notes;

        if changed {
            package.set_delivery_address(&state.address, &state.zip);
            package.set_notes(notes);
        }

        changed
    }
}
