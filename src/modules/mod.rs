pub mod backlog;
pub mod enrichment;
pub mod inspection;
pub mod processor;
pub mod provider;
pub mod results;
pub mod run;
pub mod snapshot;
