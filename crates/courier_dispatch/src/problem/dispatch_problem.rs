use jiff::civil::Time;

use crate::{
    error::DispatchError,
    problem::{
        address_index::{AddressIdx, AddressIndex},
        deferred_address::DeferredAddress,
        distance_matrix::{Distance, DistanceMatrix},
        package::Package,
        package_store::PackageStore,
    },
};

/// Read-only road network: addresses and the distances between them.
#[derive(Debug, Clone)]
pub struct RoadNetwork {
    addresses: AddressIndex,
    distances: DistanceMatrix,
}

impl RoadNetwork {
    pub fn new(addresses: AddressIndex, distances: DistanceMatrix) -> Result<Self, DispatchError> {
        if addresses.len() != distances.num_locations() {
            return Err(DispatchError::MatrixDimension {
                rows: distances.num_locations(),
                addresses: addresses.len(),
            });
        }

        Ok(RoadNetwork {
            addresses,
            distances,
        })
    }

    pub fn addresses(&self) -> &AddressIndex {
        &self.addresses
    }

    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    pub fn locate(&self, address: &str) -> Result<AddressIdx, DispatchError> {
        self.addresses
            .index_of(address)
            .ok_or_else(|| DispatchError::UnknownLocation(address.to_owned()))
    }

    /// Row of the package's current delivery address.
    pub fn locate_package(&self, package: &Package) -> Result<AddressIdx, DispatchError> {
        self.addresses
            .index_of(package.address())
            .ok_or_else(|| DispatchError::UnknownAddress {
                package_id: package.id(),
                address: package.address().to_owned(),
            })
    }

    pub fn distance(&self, from: AddressIdx, to: AddressIdx) -> Distance {
        self.distances.distance(from, to)
    }

    pub fn distance_between(&self, from: &str, to: &str) -> Result<Distance, DispatchError> {
        Ok(self.distance(self.locate(from)?, self.locate(to)?))
    }
}

/// Everything routing needs, loaded once: the road network, the package
/// store and the optional deferred-address rule.
#[derive(Debug)]
pub struct DispatchProblem {
    network: RoadNetwork,
    packages: PackageStore,
    deferred_address: Option<DeferredAddress>,
}

impl DispatchProblem {
    pub fn network(&self) -> &RoadNetwork {
        &self.network
    }

    pub fn packages(&self) -> &PackageStore {
        &self.packages
    }

    pub fn packages_mut(&mut self) -> &mut PackageStore {
        &mut self.packages
    }

    pub fn deferred_address(&self) -> Option<&DeferredAddress> {
        self.deferred_address.as_ref()
    }

    /// Borrows the read-only parts alongside the mutable store.
    pub(crate) fn split_mut(
        &mut self,
    ) -> (&RoadNetwork, Option<&DeferredAddress>, &mut PackageStore) {
        (
            &self.network,
            self.deferred_address.as_ref(),
            &mut self.packages,
        )
    }

    /// Clears every routing stamp and puts the deferred-address package back
    /// on its placeholder address.
    pub fn reset_packages(&mut self) {
        for package in self.packages.iter_mut() {
            package.reset();
            if let Some(rule) = &self.deferred_address {
                rule.apply(package, Time::midnight());
            }
        }
    }
}

#[derive(Default)]
pub struct DispatchProblemBuilder {
    addresses: Option<AddressIndex>,
    distances: Option<DistanceMatrix>,
    packages: Option<PackageStore>,
    deferred_address: Option<DeferredAddress>,
}

impl DispatchProblemBuilder {
    pub fn set_addresses(&mut self, addresses: AddressIndex) -> &mut DispatchProblemBuilder {
        self.addresses = Some(addresses);
        self
    }

    pub fn set_distances(&mut self, distances: DistanceMatrix) -> &mut DispatchProblemBuilder {
        self.distances = Some(distances);
        self
    }

    pub fn set_packages(&mut self, packages: PackageStore) -> &mut DispatchProblemBuilder {
        self.packages = Some(packages);
        self
    }

    pub fn set_deferred_address(
        &mut self,
        deferred_address: DeferredAddress,
    ) -> &mut DispatchProblemBuilder {
        self.deferred_address = Some(deferred_address);
        self
    }

    /// Checks that the address index and matrix agree in size and that the
    /// deferred-address package exists with both of its addresses indexed.
    pub fn build(self) -> Result<DispatchProblem, DispatchError> {
        let addresses = match self.addresses {
            Some(addresses) => addresses,
            None => AddressIndex::new(vec![])?,
        };
        let distances = match self.distances {
            Some(distances) => distances,
            None => DistanceMatrix::new(vec![])?,
        };
        let network = RoadNetwork::new(addresses, distances)?;
        let packages = self.packages.unwrap_or_default();

        if let Some(rule) = &self.deferred_address {
            if !packages.contains(rule.package_id()) {
                return Err(DispatchError::PackageNotFound(rule.package_id()));
            }

            for state in [rule.placeholder(), rule.corrected()] {
                if network.addresses().index_of(&state.address).is_none() {
                    return Err(DispatchError::UnknownAddress {
                        package_id: rule.package_id(),
                        address: state.address.clone(),
                    });
                }
            }
        }

        Ok(DispatchProblem {
            network,
            packages,
            deferred_address: self.deferred_address,
        })
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::time;

    use super::*;
    use crate::{
        problem::package::PackageId,
        solver::nearest_neighbor::route_vehicle,
        test_utils::{self, ADDRESS_A, ADDRESS_C, CORRECTED, HUB, PLACEHOLDER},
    };

    #[test]
    fn test_distance_between_addresses() {
        let problem = test_utils::create_test_problem();
        let network = problem.network();

        assert_eq!(network.distance_between(HUB, ADDRESS_A).unwrap(), 2.0);
        assert_eq!(network.distance_between(ADDRESS_C, HUB).unwrap(), 6.0);
        assert_eq!(
            network.distance_between(HUB, "1 Nowhere Ln").unwrap_err(),
            DispatchError::UnknownLocation(String::from("1 Nowhere Ln"))
        );
    }

    #[test]
    fn test_reset_restores_placeholder_address() {
        let mut problem = test_utils::create_test_problem();
        let mut vehicle = test_utils::create_test_vehicle(3, time(9, 0, 0, 0), &[5]);
        route_vehicle(&mut problem, &mut vehicle).unwrap();

        let package = problem.packages().lookup(PackageId::new(5)).unwrap();
        assert_eq!(package.address(), CORRECTED);

        problem.reset_packages();

        let package = problem.packages().lookup(PackageId::new(5)).unwrap();
        assert!(!package.is_assigned());
        assert_eq!(package.address(), PLACEHOLDER);
        assert_eq!(package.zip(), "84103");
        assert_eq!(package.notes(), "Wrong address listed");
        assert!(package.to_string().contains("Address: 300 State St,"));
        assert!(!package.to_string().contains("Address fixed"));
    }

    #[test]
    fn test_dimension_mismatch() {
        let addresses = AddressIndex::from_addresses([HUB, ADDRESS_A]).unwrap();
        let distances = DistanceMatrix::from_dense(vec![vec![0.0]]).unwrap();

        let mut builder = DispatchProblemBuilder::default();
        builder.set_addresses(addresses).set_distances(distances);

        assert!(matches!(
            builder.build(),
            Err(DispatchError::MatrixDimension {
                rows: 1,
                addresses: 2
            })
        ));
    }

    #[test]
    fn test_deferred_package_must_exist() {
        let mut builder = DispatchProblemBuilder::default();
        builder
            .set_addresses(test_utils::create_test_addresses())
            .set_distances(test_utils::create_test_distances())
            .set_packages(PackageStore::with_capacity(10))
            .set_deferred_address(test_utils::create_test_deferred_address());

        assert!(matches!(
            builder.build(),
            Err(DispatchError::PackageNotFound(_))
        ));
    }
}
