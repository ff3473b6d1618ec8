use crate::{
    error::DispatchError,
    problem::package::{Package, PackageId},
};

pub const DEFAULT_CAPACITY: usize = 40;

/// Fixed-capacity open-addressing table of packages keyed by id.
///
/// The home slot of id `k` is `k mod S`; collisions probe linearly and an
/// empty slot ends every probe. The table never grows, so `S` must exceed the
/// number of packages to keep probes short.
#[derive(Debug, Clone)]
pub struct PackageStore {
    slots: Vec<Option<Package>>,
    len: usize,
}

fn probe_sequence(home: usize, capacity: usize) -> impl Iterator<Item = usize> {
    (0..capacity).map(move |step| (home + step) % capacity)
}

impl Default for PackageStore {
    fn default() -> Self {
        PackageStore::with_capacity(DEFAULT_CAPACITY)
    }
}

impl PackageStore {
    pub fn with_capacity(capacity: usize) -> Self {
        PackageStore {
            slots: vec![None; capacity.max(1)],
            len: 0,
        }
    }

    #[inline(always)]
    fn home_slot(&self, id: PackageId) -> usize {
        id.get() as usize % self.slots.len()
    }

    fn probe(&self, id: PackageId) -> impl Iterator<Item = usize> {
        probe_sequence(self.home_slot(id), self.slots.len())
    }

    fn find_slot(&self, id: PackageId) -> Option<usize> {
        for slot in self.probe(id) {
            match &self.slots[slot] {
                None => return None,
                Some(package) if package.id() == id => return Some(slot),
                Some(_) => {}
            }
        }

        None
    }

    /// Inserts the package under its own id, replacing and returning any
    /// previous record for that id. Fails when every slot is taken by other
    /// ids; the package is not stored in that case.
    pub fn insert(&mut self, package: Package) -> Result<Option<Package>, DispatchError> {
        let id = package.id();

        for slot in probe_sequence(self.home_slot(id), self.slots.len()) {
            match &mut self.slots[slot] {
                entry @ None => {
                    *entry = Some(package);
                    self.len += 1;
                    return Ok(None);
                }
                Some(existing) if existing.id() == id => {
                    return Ok(Some(std::mem::replace(existing, package)));
                }
                Some(_) => {}
            }
        }

        Err(DispatchError::Capacity {
            capacity: self.slots.len(),
        })
    }

    pub fn lookup(&self, id: PackageId) -> Option<&Package> {
        self.find_slot(id).and_then(|slot| self.slots[slot].as_ref())
    }

    pub fn lookup_mut(&mut self, id: PackageId) -> Option<&mut Package> {
        self.find_slot(id).and_then(|slot| self.slots[slot].as_mut())
    }

    pub fn contains(&self, id: PackageId) -> bool {
        self.find_slot(id).is_some()
    }

    /// Removes the package and re-inserts the occupied run that follows the
    /// freed slot, so probes for displaced ids don't stop at the gap.
    pub fn remove(&mut self, id: PackageId) -> Option<Package> {
        let slot = self.find_slot(id)?;
        let removed = self.slots[slot].take();
        self.len -= 1;

        let capacity = self.slots.len();
        let mut next = (slot + 1) % capacity;
        for _ in 1..capacity {
            let Some(displaced) = self.slots[next].take() else {
                break;
            };
            self.reinsert(displaced);
            next = (next + 1) % capacity;
        }

        removed
    }

    /// Places a package taken out of its slot during `remove`. At least one
    /// slot is free at that point, so the probe always finds room.
    fn reinsert(&mut self, package: Package) {
        let capacity = self.slots.len();
        let mut slot = self.home_slot(package.id());

        while self.slots[slot].is_some() {
            slot = (slot + 1) % capacity;
        }

        self.slots[slot] = Some(package);
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Packages in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Package> {
        self.slots.iter().flatten()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Package> {
        self.slots.iter_mut().flatten()
    }

    /// Stored ids in ascending order.
    pub fn ids(&self) -> Vec<PackageId> {
        let mut ids: Vec<PackageId> = self.iter().map(Package::id).collect();
        ids.sort_unstable();
        ids
    }

    #[cfg(test)]
    fn slot_of(&self, id: PackageId) -> Option<usize> {
        self.find_slot(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{problem::package::PackageBuilder, test_utils::create_test_package};

    #[test]
    fn test_insert_and_lookup() {
        let mut store = PackageStore::default();
        for id in 1..=40 {
            store
                .insert(create_test_package(id, "A"))
                .unwrap();
        }

        assert_eq!(store.len(), 40);
        for id in 1..=40 {
            assert_eq!(store.lookup(PackageId::new(id)).unwrap().id(), PackageId::new(id));
        }
    }

    #[test]
    fn test_lookup_never_inserted() {
        let mut store = PackageStore::with_capacity(10);
        store.insert(create_test_package(3, "A")).unwrap();

        assert!(store.lookup(PackageId::new(4)).is_none());
        assert!(store.lookup(PackageId::new(13)).is_none());
        assert!(!store.contains(PackageId::new(0)));
    }

    #[test]
    fn test_insert_is_upsert() {
        let mut store = PackageStore::with_capacity(10);
        store.insert(create_test_package(5, "A")).unwrap();

        let mut builder = PackageBuilder::new(PackageId::new(5), "B");
        builder.set_weight(12.5);
        let previous = store.insert(builder.build()).unwrap();

        assert_eq!(previous.unwrap().address(), "A");
        assert_eq!(store.len(), 1);
        let stored = store.lookup(PackageId::new(5)).unwrap();
        assert_eq!(stored.address(), "B");
        assert_eq!(stored.weight(), 12.5);
    }

    #[test]
    fn test_collisions_probe_linearly() {
        let mut store = PackageStore::with_capacity(10);
        for id in [3, 13, 23] {
            store.insert(create_test_package(id, "A")).unwrap();
        }

        assert_eq!(store.slot_of(PackageId::new(3)), Some(3));
        assert_eq!(store.slot_of(PackageId::new(13)), Some(4));
        assert_eq!(store.slot_of(PackageId::new(23)), Some(5));
    }

    #[test]
    fn test_remove_repairs_probe_chain() {
        let mut store = PackageStore::with_capacity(10);
        for id in [3, 13, 23, 4] {
            store.insert(create_test_package(id, "A")).unwrap();
        }

        let removed = store.remove(PackageId::new(13)).unwrap();
        assert_eq!(removed.id(), PackageId::new(13));

        assert!(store.lookup(PackageId::new(13)).is_none());
        assert_eq!(store.len(), 3);
        for id in [3, 23, 4] {
            assert!(store.lookup(PackageId::new(id)).is_some(), "lost {id}");
        }
        assert_eq!(store.slot_of(PackageId::new(23)), Some(4));
        assert_eq!(store.slot_of(PackageId::new(4)), Some(5));
    }

    #[test]
    fn test_remove_wraps_around() {
        let mut store = PackageStore::with_capacity(5);
        for id in [4, 9, 14] {
            store.insert(create_test_package(id, "A")).unwrap();
        }
        assert_eq!(store.slot_of(PackageId::new(14)), Some(1));

        store.remove(PackageId::new(4)).unwrap();

        assert_eq!(store.slot_of(PackageId::new(9)), Some(4));
        assert_eq!(store.slot_of(PackageId::new(14)), Some(0));
    }

    #[test]
    fn test_remove_missing() {
        let mut store = PackageStore::with_capacity(5);
        store.insert(create_test_package(1, "A")).unwrap();

        assert!(store.remove(PackageId::new(6)).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_from_full_table() {
        let mut store = PackageStore::with_capacity(3);
        for id in [0, 3, 6] {
            store.insert(create_test_package(id, "A")).unwrap();
        }

        store.remove(PackageId::new(0)).unwrap();

        assert!(store.lookup(PackageId::new(3)).is_some());
        assert!(store.lookup(PackageId::new(6)).is_some());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_capacity_exhausted() {
        let mut store = PackageStore::with_capacity(2);
        store.insert(create_test_package(1, "A")).unwrap();
        store.insert(create_test_package(2, "A")).unwrap();

        let result = store.insert(create_test_package(3, "A"));

        assert_eq!(result.unwrap_err(), DispatchError::Capacity { capacity: 2 });
        assert_eq!(store.len(), 2);
        assert!(store.lookup(PackageId::new(3)).is_none());

        // Updates still succeed on a full table.
        assert!(store.insert(create_test_package(2, "B")).unwrap().is_some());
    }

    #[test]
    fn test_ids_sorted() {
        let mut store = PackageStore::with_capacity(7);
        for id in [12, 1, 8, 3] {
            store.insert(create_test_package(id, "A")).unwrap();
        }

        let ids: Vec<u32> = store.ids().iter().map(PackageId::get).collect();
        assert_eq!(ids, vec![1, 3, 8, 12]);
    }
}
