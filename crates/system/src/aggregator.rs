use crate::provider::MetricsProvider;
use eco_core::{MonitorError, ProcessRecord, Result, Snapshot};
use tracing::trace;

/// Gather one [`Snapshot`] of the process table.
///
/// Processes that vanish, refuse access, or are zombies while being read are
/// left out silently; they may show up again next tick. So is a record with
/// nonsensical usage figures. Only a failure to enumerate the table at all is
/// an error.
pub fn collect<P>(provider: &P) -> Result<Snapshot>
where
    P: MetricsProvider + ?Sized,
{
    let handles = provider.enumerate_processes()?;
    let mut snapshot = Snapshot::new();

    for handle in &handles {
        match provider.read_process(handle) {
            Ok(record) => match validate(&record) {
                Ok(()) => snapshot.insert(record),
                Err(e) => trace!("excluded from snapshot: {e}"),
            },
            Err(reason) => trace!("excluded from snapshot: {reason}"),
        }
    }

    trace!(
        "collected {} of {} processes",
        snapshot.len(),
        handles.len()
    );
    Ok(snapshot)
}

fn validate(record: &ProcessRecord) -> Result<()> {
    let cpu_ok = record.cpu_percent.is_finite() && record.cpu_percent >= 0.0;
    let mem_ok = record.memory_percent.is_finite()
        && (0.0..=100.0).contains(&record.memory_percent);

    if cpu_ok && mem_ok {
        Ok(())
    } else {
        Err(MonitorError::MalformedData(format!(
            "process {} reported cpu {} / memory {}",
            record.pid, record.cpu_percent, record.memory_percent
        )))
    }
}
