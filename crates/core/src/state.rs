use crate::error::{MonitorError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which host metric a sample describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Cpu,
    Memory,
    Disk,
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MetricKind::Cpu    => "CPU",
            MetricKind::Memory => "Memory",
            MetricKind::Disk   => "Disk",
        };
        f.write_str(name)
    }
}

/// A single utilisation reading, as a percentage in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub kind:  MetricKind,
    pub value: f32,
}

impl MetricSample {
    /// Wrap a raw provider value, rejecting anything outside `[0, 100]`.
    pub fn new(kind: MetricKind, value: f32) -> Result<Self> {
        if !value.is_finite() || !(0.0..=100.0).contains(&value) {
            return Err(MonitorError::MalformedData(format!(
                "{kind} usage out of range: {value}"
            )));
        }
        Ok(Self { kind, value })
    }
}

/// One row of the process table, read fresh every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub pid:   u32,
    pub name:  String,
    /// Owning user name, `"Unknown"` when it cannot be resolved.
    pub owner: String,
    /// Share of one core; exceeds 100 when a process spans several cores.
    pub cpu_percent: f32,
    /// Resident memory as a share of total RAM (0.0 – 100.0).
    pub memory_percent: f32,
}

impl ProcessRecord {
    pub const UNKNOWN_OWNER: &'static str = "Unknown";
}

/// All process records gathered during one tick.
///
/// Keeps enumeration order (ranking ties are broken by it) and holds at most
/// one record per pid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    records: Vec<ProcessRecord>,
    index:   HashMap<u32, usize>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record. A record whose pid is already present replaces the old
    /// one in its original position.
    pub fn insert(&mut self, record: ProcessRecord) {
        match self.index.get(&record.pid) {
            Some(&slot) => self.records[slot] = record,
            None => {
                self.index.insert(record.pid, self.records.len());
                self.records.push(record);
            }
        }
    }

    pub fn get(&self, pid: u32) -> Option<&ProcessRecord> {
        self.index.get(&pid).map(|&slot| &self.records[slot])
    }

    /// Records in enumeration order.
    pub fn records(&self) -> &[ProcessRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<ProcessRecord> for Snapshot {
    fn from_iter<I: IntoIterator<Item = ProcessRecord>>(iter: I) -> Self {
        let mut snapshot = Snapshot::new();
        for record in iter {
            snapshot.insert(record);
        }
        snapshot
    }
}

/// The busiest processes of a snapshot, highest CPU first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankedView {
    records: Vec<ProcessRecord>,
}

impl RankedView {
    /// Wrap records that are already in ranked order.
    pub fn from_ranked(records: Vec<ProcessRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ProcessRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProcessRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a RankedView {
    type Item = &'a ProcessRecord;
    type IntoIter = std::slice::Iter<'a, ProcessRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pid: u32, name: &str, cpu: f32) -> ProcessRecord {
        ProcessRecord {
            pid,
            name: name.to_string(),
            owner: ProcessRecord::UNKNOWN_OWNER.to_string(),
            cpu_percent: cpu,
            memory_percent: 0.5,
        }
    }

    #[test]
    fn sample_accepts_bounds() {
        assert!(MetricSample::new(MetricKind::Cpu, 0.0).is_ok());
        assert!(MetricSample::new(MetricKind::Memory, 100.0).is_ok());
    }

    #[test]
    fn sample_rejects_out_of_range() {
        let err = MetricSample::new(MetricKind::Disk, 140.0).unwrap_err();
        assert!(matches!(err, MonitorError::MalformedData(_)));
        assert!(MetricSample::new(MetricKind::Cpu, f32::NAN).is_err());
        assert!(MetricSample::new(MetricKind::Cpu, -1.0).is_err());
    }

    #[test]
    fn snapshot_keeps_enumeration_order() {
        let snapshot: Snapshot = [record(9, "a", 1.0), record(2, "b", 2.0), record(5, "c", 3.0)]
            .into_iter()
            .collect();
        let pids: Vec<u32> = snapshot.records().iter().map(|r| r.pid).collect();
        assert_eq!(pids, vec![9, 2, 5]);
    }

    #[test]
    fn snapshot_replaces_duplicate_pid_in_place() {
        let mut snapshot = Snapshot::new();
        snapshot.insert(record(1, "first", 1.0));
        snapshot.insert(record(2, "other", 1.0));
        snapshot.insert(record(1, "second", 7.0));

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.records()[0].name, "second");
        assert_eq!(snapshot.get(1).map(|r| r.cpu_percent), Some(7.0));
    }

    #[test]
    fn ranked_view_serializes_as_list() {
        let view = RankedView::from_ranked(vec![record(3, "sh", 4.0)]);
        let json = serde_json::to_string(&view).unwrap();
        assert!(json.starts_with("[{"));
        assert!(json.contains("\"pid\":3"));
    }
}
