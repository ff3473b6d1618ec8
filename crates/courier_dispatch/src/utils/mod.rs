pub mod clock;
pub mod newtype_index;
