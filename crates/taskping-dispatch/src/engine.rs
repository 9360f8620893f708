//! The dispatch engine — interval loop, pass orchestration, lifecycle.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use taskping_core::types::TaskRecord;
use taskping_mailer::{compose_reminder, MailTransport, MailerError};
use taskping_store::TaskStore;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::error::Result;
use crate::evaluate::due_tasks;
use crate::state::DispatchState;
use crate::types::{DeliveryFailure, PassReport};

/// Orchestrates evaluate-and-notify passes against the shared task store.
pub struct DispatchEngine {
    store: Arc<TaskStore>,
    transport: Arc<dyn MailTransport>,
    state: DispatchState,
    send_timeout: Duration,
}

impl DispatchEngine {
    pub fn new(
        store: Arc<TaskStore>,
        transport: Arc<dyn MailTransport>,
        send_timeout: Duration,
    ) -> Self {
        Self {
            store,
            transport,
            state: DispatchState::new(),
            send_timeout,
        }
    }

    /// Main loop. The first fire happens one full `interval` after start;
    /// the loop then re-arms until `shutdown` broadcasts `true`. A tick in
    /// flight always finishes before the loop exits.
    pub async fn run(mut self, interval: Duration, mut shutdown: watch::Receiver<bool>) {
        info!(interval_secs = interval.as_secs(), "dispatcher started");
        let mut ticker =
            tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.tick(Utc::now()).await {
                        error!("dispatch tick failed: {e}");
                    }
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("dispatcher shutting down");
                        break;
                    }
                }
            }
        }
    }

    /// One scheduler tick: the interval pass, plus the once-daily sweep on
    /// the first tick of a new day.
    ///
    /// Public so tests can drive the engine at chosen instants without the
    /// timer.
    pub async fn tick(&mut self, now: DateTime<Utc>) -> Result<PassReport> {
        let tasks = self.store.list_all()?;
        let mut report = self.pass(now, &tasks).await;

        if self.state.should_run_daily_sweep(now) {
            // Re-read so the sweep also covers records written since the
            // list above; the per-task ledger keeps it from re-sending.
            let tasks = self.store.list_all()?;
            let sweep = self.pass(now, &tasks).await;
            report.absorb(sweep);
            self.state.record_daily_sweep(now);
        }

        info!(
            evaluated = report.evaluated,
            sent = report.sent,
            skipped = report.skipped,
            data_errors = report.data_errors.len(),
            failures = report.failures.len(),
            "dispatch pass complete"
        );
        Ok(report)
    }

    /// One evaluate-and-notify pass over `tasks`. Per-task failures land in
    /// the report; nothing here aborts the loop.
    async fn pass(&mut self, now: DateTime<Utc>, tasks: &[TaskRecord]) -> PassReport {
        let (due, data_errors) = due_tasks(now, tasks);
        for err in &data_errors {
            warn!(task_id = err.task_id, raw = %err.raw, "skipping record with unparseable due date");
        }
        let mut report = PassReport {
            evaluated: tasks.len(),
            data_errors,
            ..PassReport::default()
        };

        for item in due {
            if self.state.already_notified_today(item.task.id, now) {
                report.skipped += 1;
                continue;
            }

            let email = compose_reminder(&item.task, item.due);
            let attempt =
                tokio::time::timeout(self.send_timeout, self.transport.send(&email)).await;
            match attempt {
                Ok(Ok(())) => {
                    self.state.record_notified(item.task.id, now);
                    report.sent += 1;
                }
                Ok(Err(e)) => {
                    warn!(task_id = item.task.id, to = %email.to, error = %e, "reminder delivery failed");
                    report.failures.push(DeliveryFailure {
                        task_id: item.task.id,
                        to: email.to,
                        error: e,
                    });
                }
                Err(_) => {
                    let ms = self.send_timeout.as_millis() as u64;
                    warn!(task_id = item.task.id, to = %email.to, timeout_ms = ms, "reminder delivery timed out");
                    report.failures.push(DeliveryFailure {
                        task_id: item.task.id,
                        to: email.to,
                        error: MailerError::Timeout { ms },
                    });
                }
            }
        }
        report
    }
}

/// Running dispatcher: shutdown sender plus the spawned loop task.
pub struct DispatcherHandle {
    shutdown: watch::Sender<bool>,
    join: JoinHandle<()>,
}

/// Spawn the engine loop. The first pass runs one `interval` after this
/// call returns.
pub fn start(engine: DispatchEngine, interval: Duration) -> DispatcherHandle {
    let (shutdown, rx) = watch::channel(false);
    let join = tokio::spawn(engine.run(interval, rx));
    DispatcherHandle { shutdown, join }
}

impl DispatcherHandle {
    /// Signal shutdown and wait for the loop to finish. Any pass in flight
    /// completes first; no tick fires after this returns.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.join.await {
            error!("dispatcher task ended abnormally: {e}");
        }
    }

    /// Completes only if the loop exits without being told to stop — the
    /// dispatcher subsystem is dead and no further reminders will go out.
    /// The hosting process should treat this as fatal.
    pub async fn faulted(&mut self) {
        let _ = (&mut self.join).await;
    }
}
