/// Per-task enrichment: fetch the subject, its events and optionally its
/// coordinates, derive the activity flags and store the merged record.
pub mod application;
pub mod domain;

pub use application::enricher::{Enricher, TaskError};
pub use domain::{
    flags::{derive_flags, Activity},
    geo::place_to_location,
};
