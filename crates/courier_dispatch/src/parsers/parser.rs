use std::path::Path;

use crate::{error::ReferenceDataError, parsers::reference_data::ReferenceData};

pub trait ReferenceDataParser {
    fn parse<P: AsRef<Path>>(&self, dir: P) -> Result<ReferenceData, ReferenceDataError>;
}
