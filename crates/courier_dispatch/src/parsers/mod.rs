pub mod parser;
pub mod reference_data;
