pub mod outcomes;
pub mod progress;

pub use outcomes::{ProcessorPhase, ResumeOutcome, StartOutcome, TickOutcome};
pub use progress::{plan_persistence, PersistPlan};
