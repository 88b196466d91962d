use eco_core::{ProcessReadError, ProcessRecord, Result};
use std::path::Path;

/// Source of instantaneous host statistics.
///
/// Implementations may block: [`sample_cpu`](Self::sample_cpu) in particular
/// is expected to measure over a short window. The scheduler only calls a
/// provider from the blocking pool, never from an async task.
pub trait MetricsProvider: Send + Sync + 'static {
    /// Opaque reference to one entry of the process table.
    type Handle: Send;

    /// Overall CPU utilisation, 0 – 100.
    fn sample_cpu(&self) -> Result<f32>;

    /// Used memory as a percentage of total RAM.
    fn sample_memory(&self) -> Result<f32>;

    /// Used space of the filesystem holding `path`, as a percentage.
    fn sample_disk(&self, path: &Path) -> Result<f32>;

    /// Every process currently in the table, in a stable order.
    fn enumerate_processes(&self) -> Result<Vec<Self::Handle>>;

    /// Read one process. Failure here is per-process and never fatal.
    fn read_process(&self, handle: &Self::Handle) -> Result<ProcessRecord, ProcessReadError>;
}
