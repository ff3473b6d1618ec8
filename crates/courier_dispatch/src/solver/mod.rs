pub mod dispatcher;
pub mod nearest_neighbor;
pub mod status;
