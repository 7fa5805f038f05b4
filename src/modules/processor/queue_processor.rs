//! Paced, resumable queue processor
//!
//! One run at a time. A timer loop dequeues one task per tick and spawns its
//! enrichment without waiting for it, so enrichments of consecutive ticks may
//! overlap and complete out of order. Progress therefore counts dispatched
//! tasks, not finished ones.
//!
//! The loop exits before finalize runs, and only the loop calls finalize, so
//! each run submits its result at most once.

use super::domain::{
    plan_persistence, ProcessorPhase, ResumeOutcome, StartOutcome, TickOutcome,
};
use super::notifier::{NotificationKind, Notifier};
use crate::modules::backlog::{Backlog, Task};
use crate::modules::enrichment::Enricher;
use crate::modules::provider::{ResultPayload, ResultSubmitter};
use crate::modules::results::ResultStore;
use crate::modules::run::{HistoryStore, RunProgress, RunSettings, RunStage, RunState, RunStore};
use crate::modules::snapshot::{Snapshot, SnapshotStore, SNAPSHOT_KEY};
use crate::shared::config::ProcessorConfig;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::logger::{LogContext, TimedOperation};
use crate::{log_debug, log_error, log_info, log_warn};
use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Collaborators the processor reads from and writes to
#[derive(Clone)]
pub struct ProcessorPorts {
    pub run_store: Arc<dyn RunStore>,
    pub result_store: Arc<dyn ResultStore>,
    pub history: Arc<dyn HistoryStore>,
    pub snapshots: Arc<dyn SnapshotStore>,
    pub submitter: Arc<dyn ResultSubmitter>,
    pub notifier: Arc<dyn Notifier>,
}

struct TickLoop {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl TickLoop {
    fn is_live(&self) -> bool {
        !self.handle.is_finished()
    }
}

/// Everything guarded by the lifecycle lock: a tick, a cancel and a start
/// never interleave.
#[derive(Default)]
struct Lifecycle {
    backlog: Backlog,
    tick_loop: Option<TickLoop>,
}

struct ProcessorInner {
    ports: ProcessorPorts,
    enricher: Arc<Enricher>,
    config: ProcessorConfig,
    lifecycle: Mutex<Lifecycle>,
    in_flight: Arc<AtomicUsize>,
    phase: watch::Sender<ProcessorPhase>,
}

#[derive(Clone)]
pub struct QueueProcessor {
    inner: Arc<ProcessorInner>,
}

impl QueueProcessor {
    pub fn new(ports: ProcessorPorts, enricher: Arc<Enricher>, config: ProcessorConfig) -> Self {
        let (phase, _) = watch::channel(ProcessorPhase::Idle);
        Self {
            inner: Arc::new(ProcessorInner {
                ports,
                enricher,
                config,
                lifecycle: Mutex::new(Lifecycle::default()),
                in_flight: Arc::new(AtomicUsize::new(0)),
                phase,
            }),
        }
    }

    // ---------------------------------------------------------------------
    // Backlog access
    // ---------------------------------------------------------------------

    /// Append tasks; returns the new tail index
    pub async fn enqueue<I>(&self, tasks: I) -> usize
    where
        I: IntoIterator<Item = Task>,
    {
        let mut lifecycle = self.inner.lifecycle.lock().await;
        for task in tasks {
            lifecycle.backlog.enqueue(task);
        }
        lifecycle.backlog.tail_index()
    }

    /// Copy of the current backlog, cursors included
    pub async fn backlog(&self) -> Backlog {
        self.inner.lifecycle.lock().await.backlog.clone()
    }

    /// Drop all queued tasks. Refused while the loop is ticking.
    pub async fn reset_backlog(&self) -> AppResult<()> {
        let mut lifecycle = self.inner.lifecycle.lock().await;
        if Self::loop_is_live(&lifecycle) {
            return Err(AppError::InvalidInput(
                "Cannot reset the backlog while a run is processing".to_string(),
            ));
        }
        lifecycle.backlog.reset();
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Observation
    // ---------------------------------------------------------------------

    pub async fn is_running(&self) -> bool {
        let lifecycle = self.inner.lifecycle.lock().await;
        Self::loop_is_live(&lifecycle)
    }

    /// Dispatched/total as last written for observers
    pub async fn progress(&self) -> AppResult<RunProgress> {
        Ok(self.inner.ports.run_store.get().await?.progress)
    }

    /// Enrichments spawned and not yet finished
    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::SeqCst)
    }

    pub fn phase(&self) -> ProcessorPhase {
        *self.inner.phase.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ProcessorPhase> {
        self.inner.phase.subscribe()
    }

    /// Resolves once the processor is back to IDLE (finalized or cancelled)
    pub async fn wait_until_idle(&self) {
        let mut phase = self.subscribe();
        // Sender lives as long as `self`, so this only ends on Idle
        let _ = phase.wait_for(|phase| *phase == ProcessorPhase::Idle).await;
    }

    // ---------------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------------

    /// Begin (or re-begin after a restore) processing the backlog.
    ///
    /// Idempotent: a second call while the loop is ticking does nothing.
    pub async fn start(&self, settings: RunSettings) -> AppResult<StartOutcome> {
        let mut lifecycle = self.inner.lifecycle.lock().await;
        if Self::loop_is_live(&lifecycle) {
            log_warn!("Queue processor is already running");
            return Ok(StartOutcome::AlreadyRunning);
        }

        let ports = &self.inner.ports;
        let mut state = ports.run_store.get().await?;
        state.run_id = state.run_id.or_else(|| Some(Uuid::new_v4()));
        state.started_at = state.started_at.or_else(|| Some(Utc::now()));
        state.active = true;
        state.stage = RunStage::FetchingUsers;
        state.settings = settings;
        state.progress = RunProgress::new(
            lifecycle.backlog.head_index(),
            lifecycle.backlog.tail_index(),
        );
        state.result_id = None;
        state.error = None;
        ports.run_store.set(&state).await?;

        // Crash recovery point before the first dequeue
        self.persist_snapshot(&lifecycle.backlog).await?;

        let interval = self
            .inner
            .config
            .pacing_interval(state.settings.geocode_enabled);
        let token = CancellationToken::new();
        let processor = self.clone();
        let loop_token = token.clone();
        let handle = tokio::spawn(async move {
            processor.run_loop(loop_token, interval).await;
        });
        lifecycle.tick_loop = Some(TickLoop { token, handle });
        self.inner.phase.send_replace(ProcessorPhase::Running);

        log_info!(
            "Run {} started for '{}': {} of {} tasks remaining, ticking every {:?}",
            state.run_id.map(|id| id.to_string()).unwrap_or_default(),
            state.settings.repository,
            lifecycle.backlog.len(),
            lifecycle.backlog.tail_index(),
            interval
        );

        Ok(StartOutcome::Started)
    }

    /// Restore backlog, run state and results from the durable snapshot.
    /// Does not start ticking.
    pub async fn load_snapshot(&self) -> AppResult<ResumeOutcome> {
        let ports = &self.inner.ports;
        let snapshot = match ports.snapshots.get(SNAPSHOT_KEY).await? {
            Some(snapshot) => snapshot,
            None => return Ok(ResumeOutcome::Fresh),
        };

        // A durable run store may have seen the run deactivated while we were down
        let current = ports.run_store.get().await?;
        if current.run_id.is_some()
            && current.run_id == snapshot.run_state.run_id
            && !current.active
        {
            log_info!("Snapshot belongs to a deactivated run, discarding it");
            ports.snapshots.remove(SNAPSHOT_KEY).await?;
            ports.run_store.reset().await?;
            return Ok(ResumeOutcome::Discarded);
        }

        let restored = snapshot.restore().map_err(|e| {
            AppError::SerializationError(format!("Snapshot cannot be restored: {}", e))
        })?;

        let mut lifecycle = self.inner.lifecycle.lock().await;
        if Self::loop_is_live(&lifecycle) {
            return Ok(ResumeOutcome::AlreadyRunning);
        }

        ports.result_store.replace(restored.results).await?;
        ports.run_store.set(&restored.run_state).await?;
        log_info!(
            "Restored run snapshot: {}/{} dispatched",
            restored.backlog.head_index(),
            restored.backlog.tail_index()
        );
        lifecycle.backlog = restored.backlog;

        Ok(ResumeOutcome::Resumed)
    }

    /// Pick up an in-progress run after a process restart
    pub async fn continue_from_run(&self) -> AppResult<ResumeOutcome> {
        if self.is_running().await {
            return Ok(ResumeOutcome::AlreadyRunning);
        }

        let outcome = self.load_snapshot().await?;
        if outcome != ResumeOutcome::Resumed {
            return Ok(outcome);
        }

        let state = self.inner.ports.run_store.get().await?;
        if !state.active {
            log_info!("Restored run is not active; not resuming the loop");
            return Ok(outcome);
        }

        match self.start(state.settings).await? {
            StartOutcome::Started => Ok(ResumeOutcome::Resumed),
            StartOutcome::AlreadyRunning => Ok(ResumeOutcome::AlreadyRunning),
        }
    }

    /// Stop ticking and discard the run: no submission, no history entry
    pub async fn cancel(&self) -> AppResult<()> {
        let mut lifecycle = self.inner.lifecycle.lock().await;
        self.cancel_locked(&mut lifecycle).await
    }

    /// One tick of the loop. Public so hosts can drive their own timer.
    pub async fn tick(&self) -> AppResult<TickOutcome> {
        let mut lifecycle = self.inner.lifecycle.lock().await;
        let ports = &self.inner.ports;

        let state = ports.run_store.get().await?;
        if !state.active {
            log_info!("Run deactivated externally, cancelling");
            self.cancel_locked(&mut lifecycle).await?;
            return Ok(TickOutcome::Cancelled);
        }

        if lifecycle.backlog.is_empty() {
            return Ok(TickOutcome::Drained);
        }

        let task = lifecycle
            .backlog
            .dequeue()
            .map_err(|e| AppError::InternalError(e.to_string()))?;
        self.dispatch(task.clone(), state.settings.geocode_enabled);

        let backlog = &lifecycle.backlog;
        let plan = plan_persistence(backlog.len(), backlog.tail_index(), &self.inner.config);
        if plan.progress {
            let progress = RunProgress::new(backlog.head_index(), backlog.tail_index());
            ports.run_store.set_progress(progress).await?;
            LogContext::run_progress(progress.current, progress.max, plan.snapshot);
        }
        if plan.snapshot {
            self.persist_snapshot(backlog).await?;
        }

        Ok(TickOutcome::Dispatched(task))
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn loop_is_live(lifecycle: &Lifecycle) -> bool {
        lifecycle.tick_loop.as_ref().is_some_and(TickLoop::is_live)
    }

    /// Fire-and-forget enrichment; failures abandon only this task
    fn dispatch(&self, task: Task, geocode_enabled: bool) {
        let enricher = Arc::clone(&self.inner.enricher);
        let in_flight = Arc::clone(&self.inner.in_flight);
        in_flight.fetch_add(1, Ordering::SeqCst);

        tokio::spawn(async move {
            if let Err(e) = enricher.process(&task, geocode_enabled).await {
                log_warn!(
                    "Abandoning {} task {}: {}",
                    task.category,
                    task.subject_url,
                    e
                );
            }
            in_flight.fetch_sub(1, Ordering::SeqCst);
        });
    }

    async fn persist_snapshot(&self, backlog: &Backlog) -> AppResult<()> {
        let ports = &self.inner.ports;
        let state = ports.run_store.get().await?;
        let results = ports.result_store.all().await?;
        let snapshot = Snapshot::capture(backlog, state, results);
        ports.snapshots.set(SNAPSHOT_KEY, &snapshot).await?;
        log_debug!(
            "Snapshot persisted at {}/{}",
            snapshot.head_index,
            snapshot.tail_index
        );
        Ok(())
    }

    async fn cancel_locked(&self, lifecycle: &mut Lifecycle) -> AppResult<()> {
        // Never awaits the loop handle: the loop itself may be the caller
        if let Some(tick_loop) = lifecycle.tick_loop.take() {
            tick_loop.token.cancel();
        }
        self.inner.phase.send_replace(ProcessorPhase::Cancelled);

        lifecycle.backlog.reset();
        let ports = &self.inner.ports;
        ports.snapshots.remove(SNAPSHOT_KEY).await?;
        ports.run_store.reset().await?;

        self.inner.phase.send_replace(ProcessorPhase::Idle);
        log_info!("Run cancelled; backlog and snapshot cleared");
        Ok(())
    }

    async fn run_loop(self, token: CancellationToken, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = ticker.tick() => {}
            }

            match self.tick().await {
                Ok(TickOutcome::Dispatched(_)) => {}
                Ok(TickOutcome::Drained) => break,
                Ok(TickOutcome::Cancelled) => return,
                Err(e) => {
                    // Store hiccup: the same task is not retried, the loop moves on
                    log_error!("Tick failed: {}", e);
                }
            }
        }

        // Timer is stopped from here on
        let grace = self.inner.config.grace_period;
        log_info!(
            "Backlog drained, waiting {:?} for {} in-flight enrichments",
            grace,
            self.in_flight()
        );
        tokio::select! {
            _ = token.cancelled() => return,
            _ = tokio::time::sleep(grace) => {}
        }

        self.inner.phase.send_replace(ProcessorPhase::Finalizing);
        if let Err(e) = self.finalize().await {
            LogContext::error_with_context(&e, "Finalize failed");
        }

        // Cancel always takes the slot, so an uncancelled token means it is still ours
        let mut lifecycle = self.inner.lifecycle.lock().await;
        if !token.is_cancelled() {
            lifecycle.tick_loop = None;
            self.inner.phase.send_replace(ProcessorPhase::Idle);
        }
    }

    /// Submit the aggregate and record the outcome. Only the loop calls this,
    /// after it has stopped ticking.
    async fn finalize(&self) -> AppResult<RunState> {
        let timer = TimedOperation::new("finalize run");
        let ports = &self.inner.ports;

        let mut state = ports.run_store.get().await?;
        let results = ports.result_store.all().await?;
        let finished_at = Utc::now();
        let record_count = results.len();

        let payload = ResultPayload {
            run_id: state.run_id,
            repository: state.settings.repository.clone(),
            settings: state.settings.clone(),
            progress: state.progress,
            started_at: state.started_at,
            finished_at,
            results,
        };

        match ports.submitter.submit(&payload).await {
            Ok(receipt) => {
                state.stage = RunStage::Done;
                state.result_id = Some(receipt.id.clone());
                ports.notifier.notify(
                    NotificationKind::Success,
                    &format!(
                        "Inspection of {} finished: {} users, result {}",
                        payload.repository, record_count, receipt.id
                    ),
                );
            }
            Err(e) => {
                LogContext::error_with_context(&e, "Result submission failed");
                state.stage = RunStage::Error;
                state.error = Some(e.to_string());
                ports.notifier.notify(
                    NotificationKind::Failure,
                    &format!("Inspection of {} failed: {}", payload.repository, e),
                );
            }
        }
        state.active = false;
        state.finished_at = Some(finished_at);

        // Snapshot first: once submitted, the run must not be resumable
        let mut failed_steps = 0;
        let removed = ports.snapshots.remove(SNAPSHOT_KEY).await;
        failed_steps += cleanup_step("remove snapshot", removed);

        // Observers get a glimpse of the terminal stage before the reset
        let recorded = ports.run_store.set(&state).await;
        failed_steps += cleanup_step("record terminal state", recorded);
        failed_steps += cleanup_step("append history", ports.history.set(&state).await);
        failed_steps += cleanup_step("clear results", ports.result_store.refresh().await);
        self.inner.lifecycle.lock().await.backlog.reset();
        failed_steps += cleanup_step("reset run store", ports.run_store.reset().await);

        timer.finish_with_info(&format!(
            "{} records, stage {}, {} cleanup failures",
            record_count, state.stage, failed_steps
        ));
        Ok(state)
    }
}

/// Log a failed finalize cleanup step without stopping the ones after it
fn cleanup_step(step: &str, result: AppResult<()>) -> usize {
    match result {
        Ok(()) => 0,
        Err(e) => {
            LogContext::error_with_context(&e, &format!("Finalize could not {}", step));
            1
        }
    }
}
