pub mod error;
pub mod json;
pub mod parsers;
pub mod problem;
pub mod solver;
mod utils;

pub use utils::clock;

#[cfg(test)]
pub(crate) mod test_utils;
