pub mod address_index;
pub mod deferred_address;
pub mod dispatch_problem;
pub mod distance_matrix;
pub mod package;
pub mod package_store;
pub mod vehicle;
