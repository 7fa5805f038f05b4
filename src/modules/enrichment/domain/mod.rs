pub mod flags;
pub mod geo;
