//! Scripted provider shared by the unit tests of this crate.

use crate::provider::MetricsProvider;
use eco_core::{MonitorError, ProcessReadError, ProcessRecord, Result};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub fn record(pid: u32, cpu: f32) -> ProcessRecord {
    ProcessRecord {
        pid,
        name: format!("proc-{pid}"),
        owner: "tester".to_string(),
        cpu_percent: cpu,
        memory_percent: 1.0,
    }
}

/// CPU readings are consumed from a script; once it runs dry every reading
/// is `25.0`.
#[derive(Default)]
pub struct FakeProvider {
    cpu:       Mutex<VecDeque<Result<f32>>>,
    memory:    f32,
    disk:      f32,
    processes: Vec<Result<ProcessRecord, ProcessReadError>>,
    enumeration_fails: AtomicBool,
    cpu_delay: Duration,
    cpu_log:   Arc<Mutex<Vec<Instant>>>,
}

impl FakeProvider {
    pub fn with_cpu_script(self, script: Vec<Result<f32>>) -> Self {
        Self { cpu: Mutex::new(script.into()), ..self }
    }

    pub fn with_memory(self, memory: f32) -> Self {
        Self { memory, ..self }
    }

    pub fn with_disk(self, disk: f32) -> Self {
        Self { disk, ..self }
    }

    pub fn with_processes(self, processes: Vec<Result<ProcessRecord, ProcessReadError>>) -> Self {
        Self { processes, ..self }
    }

    pub fn fail_enumeration(&self) {
        self.enumeration_fails.store(true, Ordering::SeqCst);
    }

    /// Make every CPU reading block for `delay`, like a real measurement
    /// window.
    pub fn with_cpu_delay(self, delay: Duration) -> Self {
        Self { cpu_delay: delay, ..self }
    }

    /// When each CPU reading started. Clone before handing the provider over.
    pub fn cpu_log(&self) -> Arc<Mutex<Vec<Instant>>> {
        Arc::clone(&self.cpu_log)
    }
}

impl MetricsProvider for FakeProvider {
    type Handle = usize;

    fn sample_cpu(&self) -> Result<f32> {
        self.cpu_log.lock().unwrap().push(Instant::now());
        if !self.cpu_delay.is_zero() {
            std::thread::sleep(self.cpu_delay);
        }
        self.cpu
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(25.0))
    }

    fn sample_memory(&self) -> Result<f32> {
        Ok(self.memory)
    }

    fn sample_disk(&self, _path: &Path) -> Result<f32> {
        Ok(self.disk)
    }

    fn enumerate_processes(&self) -> Result<Vec<usize>> {
        if self.enumeration_fails.load(Ordering::SeqCst) {
            return Err(MonitorError::Provider("process table unavailable".into()));
        }
        Ok((0..self.processes.len()).collect())
    }

    fn read_process(&self, handle: &usize) -> Result<ProcessRecord, ProcessReadError> {
        self.processes[*handle].clone()
    }
}
