use crate::modules::backlog::Task;

/// Lifecycle of the processor itself, observable through a watch channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorPhase {
    Idle,
    Running,
    Finalizing,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// One task was dequeued and its enrichment spawned
    Dispatched(Task),
    /// The backlog is empty; the loop should stop and finalize
    Drained,
    /// The run was deactivated externally and has been torn down
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    AlreadyRunning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeOutcome {
    /// State was restored from a snapshot (and the loop restarted if the run was live)
    Resumed,
    /// No snapshot; nothing to continue
    Fresh,
    /// The loop was already ticking; nothing was touched
    AlreadyRunning,
    /// The snapshot belonged to a run deactivated while the process was down
    Discarded,
}
