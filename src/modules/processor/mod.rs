/// Drives a run: paced dequeue, fire-and-forget enrichment, throttled
/// persistence, a grace period and a single finalize.
///
/// `RunProgress::current` is the number of tasks dispatched. Enrichments are
/// not awaited, so a run at 100% may still have requests in flight until the
/// grace period ends.
pub mod domain;
pub mod notifier;
pub mod queue_processor;

pub use domain::{ProcessorPhase, ResumeOutcome, StartOutcome, TickOutcome};
pub use notifier::{LogNotifier, NotificationKind, Notifier};
pub use queue_processor::{ProcessorPorts, QueueProcessor};
