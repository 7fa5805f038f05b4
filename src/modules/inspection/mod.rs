/// Turns a repository name into a populated backlog and a started run
pub mod application;
pub mod domain;

pub use application::service::{InspectionService, InspectionSummary};
pub use domain::repository_name::RepositoryName;
