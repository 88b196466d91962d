//! The sampling loop.
//!
//! Each tick reads the host scalars, gathers and ranks the process table,
//! commits the CPU/memory history and publishes everything to the
//! [`Presenter`]. The next tick starts `interval` after the previous one
//! finished, so ticks never overlap. A failed tick is reported once and the
//! loop carries on.

use crate::aggregator;
use crate::history::{HistoryBuffer, DEFAULT_CAPACITY};
use crate::provider::MetricsProvider;
use crate::rank::rank;
use chrono::{DateTime, Local};
use eco_core::{
    MetricKind, MetricSample, MonitorError, Presenter, RankedView, Result, Snapshot,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::{self, JoinHandle};
use tokio::time;
use tracing::{debug, info, warn};

/// Delay between the end of one tick and the start of the next.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(2_000);

/// Length of the ranked process view.
pub const DEFAULT_TOP_N: usize = 10;

/// Tunables the loop reads at the start of every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSettings {
    pub interval:         Duration,
    pub top_n:            usize,
    pub history_capacity: usize,
    pub disk_path:        PathBuf,
}

impl Default for TickSettings {
    fn default() -> Self {
        Self {
            interval:         DEFAULT_INTERVAL,
            top_n:            DEFAULT_TOP_N,
            history_capacity: DEFAULT_CAPACITY,
            disk_path:        PathBuf::from("/"),
        }
    }
}

impl TickSettings {
    /// Zero interval, top-N or capacity would stall or blank the display.
    fn clamped(mut self) -> Self {
        self.interval = self.interval.max(Duration::from_millis(1));
        self.top_n = self.top_n.max(1);
        self.history_capacity = self.history_capacity.max(1);
        self
    }
}

/// Where the loop currently is. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Sampling,
    Publishing,
    Stopped,
}

/// Requests accepted between ticks.
#[derive(Debug, Clone)]
pub enum Command {
    Reconfigure(TickSettings),
    Shutdown,
}

/// Summary of a successful tick.
#[derive(Debug, Clone)]
pub struct TickReport {
    pub taken_at:      DateTime<Local>,
    pub process_count: usize,
    pub ranked_count:  usize,
}

/// Everything read from the provider in one tick, before any of it is
/// committed.
struct TickSample {
    cpu:      MetricSample,
    memory:   MetricSample,
    disk:     MetricSample,
    snapshot: Snapshot,
    ranked:   RankedView,
}

/// Blocking part of a tick. Runs on the blocking pool.
fn sample_tick<P>(provider: &P, disk_path: &Path, top_n: usize) -> Result<TickSample>
where
    P: MetricsProvider + ?Sized,
{
    let cpu    = MetricSample::new(MetricKind::Cpu, provider.sample_cpu()?)?;
    let memory = MetricSample::new(MetricKind::Memory, provider.sample_memory()?)?;
    let disk   = MetricSample::new(MetricKind::Disk, provider.sample_disk(disk_path)?)?;

    let snapshot = aggregator::collect(provider)?;
    let ranked = rank(&snapshot, top_n);

    Ok(TickSample { cpu, memory, disk, snapshot, ranked })
}

/// Owns the history buffers and the latest snapshot; the only mutator of
/// either.
pub struct Scheduler<P, V> {
    provider:       Arc<P>,
    presenter:      V,
    settings:       TickSettings,
    cpu_history:    HistoryBuffer,
    memory_history: HistoryBuffer,
    snapshot:       Snapshot,
    ranked:         RankedView,
    state:          watch::Sender<SchedulerState>,
}

impl<P, V> Scheduler<P, V>
where
    P: MetricsProvider,
    V: Presenter,
{
    pub fn new(provider: P, presenter: V, settings: TickSettings) -> Self {
        let settings = settings.clamped();
        let (state, _) = watch::channel(SchedulerState::Idle);
        Self {
            provider: Arc::new(provider),
            presenter,
            cpu_history: HistoryBuffer::new(settings.history_capacity),
            memory_history: HistoryBuffer::new(settings.history_capacity),
            settings,
            snapshot: Snapshot::new(),
            ranked: RankedView::default(),
            state,
        }
    }

    /// Start the loop on the Tokio runtime. The first tick runs immediately.
    pub fn spawn(self) -> SchedulerHandle {
        let (commands, rx) = mpsc::channel(8);
        let state = self.state.subscribe();
        let task = tokio::spawn(self.run(rx));
        SchedulerHandle { commands, state, task }
    }

    pub fn state(&self) -> SchedulerState {
        *self.state.borrow()
    }

    pub fn cpu_history(&self) -> &HistoryBuffer {
        &self.cpu_history
    }

    pub fn memory_history(&self) -> &HistoryBuffer {
        &self.memory_history
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn ranked(&self) -> &RankedView {
        &self.ranked
    }

    /// Run one tick to completion.
    ///
    /// On failure the presenter is notified once, history and the previous
    /// snapshot are left untouched, and the error is returned.
    pub async fn tick(&mut self) -> Result<TickReport> {
        self.set_state(SchedulerState::Sampling);

        let provider = Arc::clone(&self.provider);
        let disk_path = self.settings.disk_path.clone();
        let top_n = self.settings.top_n;

        let sampled = task::spawn_blocking(move || sample_tick(provider.as_ref(), &disk_path, top_n))
            .await
            .map_err(|e| MonitorError::Scheduler(format!("sampling task failed: {e}")))
            .and_then(|res| res);

        let sample = match sampled {
            Ok(sample) => sample,
            Err(e) => {
                self.presenter
                    .notify_error(&format!("Failed to update system data: {e}"));
                self.set_state(SchedulerState::Idle);
                return Err(e);
            }
        };

        self.set_state(SchedulerState::Publishing);

        self.cpu_history.push(sample.cpu.value);
        self.memory_history.push(sample.memory.value);
        self.snapshot = sample.snapshot;
        self.ranked = sample.ranked;

        self.presenter
            .update_scalars(sample.cpu.value, sample.memory.value, sample.disk.value);
        self.presenter
            .update_history(&self.cpu_history.values(), &self.memory_history.values());
        self.presenter.update_ranked_processes(&self.ranked);

        self.set_state(SchedulerState::Idle);

        Ok(TickReport {
            taken_at:      Local::now(),
            process_count: self.snapshot.len(),
            ranked_count:  self.ranked.len(),
        })
    }

    async fn run(mut self, mut commands: mpsc::Receiver<Command>) {
        info!(
            "Sampling every {} ms after each tick (top {})",
            self.settings.interval.as_millis(),
            self.settings.top_n
        );

        loop {
            match self.tick().await {
                Ok(report) => debug!(
                    "tick at {}: {} processes, {} ranked",
                    report.taken_at.format("%H:%M:%S"),
                    report.process_count,
                    report.ranked_count
                ),
                Err(e) => warn!("Tick abandoned: {e}"),
            }

            let delay = time::sleep(self.settings.interval);
            tokio::pin!(delay);

            loop {
                tokio::select! {
                    () = &mut delay => break,
                    cmd = commands.recv() => match cmd {
                        Some(Command::Reconfigure(settings)) => self.apply(settings),
                        Some(Command::Shutdown) | None => {
                            self.set_state(SchedulerState::Stopped);
                            info!("Sampling stopped");
                            return;
                        }
                    },
                }
            }
        }
    }

    /// Takes effect from the next tick; a pending delay is not shortened.
    fn apply(&mut self, settings: TickSettings) {
        let settings = settings.clamped();
        self.cpu_history.set_capacity(settings.history_capacity);
        self.memory_history.set_capacity(settings.history_capacity);
        info!(
            "Sampling reconfigured: every {} ms, top {}, {} samples, disk '{}'",
            settings.interval.as_millis(),
            settings.top_n,
            settings.history_capacity,
            settings.disk_path.display()
        );
        self.settings = settings;
    }

    fn set_state(&self, state: SchedulerState) {
        self.state.send_replace(state);
    }
}

/// Control handle for a spawned [`Scheduler`].
///
/// Dropping the handle also stops the loop once its current tick completes.
pub struct SchedulerHandle {
    commands: mpsc::Sender<Command>,
    state:    watch::Receiver<SchedulerState>,
    task:     JoinHandle<()>,
}

impl SchedulerHandle {
    /// Watch state transitions.
    pub fn subscribe(&self) -> watch::Receiver<SchedulerState> {
        self.state.clone()
    }

    pub async fn reconfigure(&self, settings: TickSettings) -> Result<()> {
        self.commands
            .send(Command::Reconfigure(settings))
            .await
            .map_err(|_| MonitorError::Scheduler("scheduler has stopped".into()))
    }

    /// Ask the loop to stop and wait for it. A tick in flight is allowed to
    /// finish first.
    pub async fn shutdown(self) -> Result<()> {
        // A closed channel means the loop is already gone; joining still
        // surfaces a panic if there was one.
        let _ = self.commands.send(Command::Shutdown).await;
        self.task
            .await
            .map_err(|e| MonitorError::Scheduler(format!("scheduler task failed: {e}")))
    }
}
