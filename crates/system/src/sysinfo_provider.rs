use crate::provider::MetricsProvider;
use eco_core::{MonitorError, ProcessReadError, ProcessRecord, Result};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use sysinfo::{Disks, Pid, ProcessStatus, ProcessesToUpdate, System, Users};

/// [`MetricsProvider`] backed by the `sysinfo` crate.
///
/// Holds one long-lived `System` so per-process CPU usage is measured
/// between consecutive refreshes (the first tick reports 0 for every process).
pub struct SysinfoProvider {
    system:     Mutex<System>,
    users:      Mutex<Users>,
    cpu_window: Duration,
}

impl SysinfoProvider {
    /// `cpu_window` is how long [`sample_cpu`](MetricsProvider::sample_cpu)
    /// blocks; it never goes below `sysinfo::MINIMUM_CPU_UPDATE_INTERVAL`.
    pub fn new(cpu_window: Duration) -> Self {
        Self {
            system:     Mutex::new(System::new_all()),
            users:      Mutex::new(Users::new_with_refreshed_list()),
            cpu_window: cpu_window.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL),
        }
    }

    fn system(&self) -> Result<MutexGuard<'_, System>> {
        self.system
            .lock()
            .map_err(|_| MonitorError::Provider("system table lock poisoned".into()))
    }
}

impl Default for SysinfoProvider {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl MetricsProvider for SysinfoProvider {
    type Handle = Pid;

    fn sample_cpu(&self) -> Result<f32> {
        let mut sys = self.system()?;
        sys.refresh_cpu_usage();
        std::thread::sleep(self.cpu_window);
        sys.refresh_cpu_usage();

        if sys.cpus().is_empty() {
            return Err(MonitorError::Provider("no CPUs reported".into()));
        }
        Ok(sys.global_cpu_usage())
    }

    fn sample_memory(&self) -> Result<f32> {
        let mut sys = self.system()?;
        sys.refresh_memory();

        let total = sys.total_memory();
        if total == 0 {
            return Err(MonitorError::Provider("total memory reported as zero".into()));
        }
        Ok((sys.used_memory() as f64 / total as f64 * 100.0) as f32)
    }

    fn sample_disk(&self, path: &Path) -> Result<f32> {
        let disks = Disks::new_with_refreshed_list();
        disk_usage(
            path,
            disks
                .iter()
                .map(|d| (d.mount_point(), d.total_space(), d.available_space())),
        )
    }

    fn enumerate_processes(&self) -> Result<Vec<Pid>> {
        let mut sys = self.system()?;
        sys.refresh_processes(ProcessesToUpdate::All, true);

        if let Ok(mut users) = self.users.lock() {
            users.refresh();
        }

        let mut pids: Vec<Pid> = sys.processes().keys().copied().collect();
        pids.sort_unstable();
        Ok(pids)
    }

    fn read_process(&self, pid: &Pid) -> Result<ProcessRecord, ProcessReadError> {
        let raw_pid = pid.as_u32();
        let sys = self
            .system
            .lock()
            .map_err(|_| ProcessReadError::AccessDenied(raw_pid))?;

        let process = sys.process(*pid).ok_or(ProcessReadError::Exited(raw_pid))?;
        if matches!(process.status(), ProcessStatus::Zombie | ProcessStatus::Dead) {
            return Err(ProcessReadError::Zombie(raw_pid));
        }

        let owner = self
            .users
            .lock()
            .ok()
            .and_then(|users| {
                process
                    .user_id()
                    .and_then(|uid| users.get_user_by_id(uid))
                    .map(|u| u.name().to_string())
            })
            .unwrap_or_else(|| ProcessRecord::UNKNOWN_OWNER.to_string());

        let total = sys.total_memory();
        let memory_percent = if total == 0 {
            0.0
        } else {
            (process.memory() as f64 / total as f64 * 100.0) as f32
        };

        Ok(ProcessRecord {
            pid: raw_pid,
            name: process.name().to_string_lossy().into_owned(),
            owner,
            cpu_percent: process.cpu_usage(),
            memory_percent,
        })
    }
}

/// Usage percentage of the innermost mount containing `path`.
///
/// `mounts` yields `(mount_point, total_bytes, available_bytes)`. Matching
/// is per path component, so `/home2` is not under `/home`.
fn disk_usage<'a, I>(path: &Path, mounts: I) -> Result<f32>
where
    I: IntoIterator<Item = (&'a Path, u64, u64)>,
{
    let (mount, total, available) = mounts
        .into_iter()
        .filter(|(mount, _, _)| path.starts_with(mount))
        .max_by_key(|(mount, _, _)| mount.components().count())
        .ok_or_else(|| {
            MonitorError::Provider(format!(
                "no mounted filesystem contains '{}'",
                path.display()
            ))
        })?;

    if total == 0 {
        return Err(MonitorError::Provider(format!(
            "filesystem at '{}' reports zero size",
            mount.display()
        )));
    }
    let used = total.saturating_sub(available);
    Ok((used as f64 / total as f64 * 100.0) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Tests going through `SysinfoProvider` read the live host, so they only
    // assert shapes, not values.

    #[test]
    fn memory_is_a_percentage() {
        let provider = SysinfoProvider::default();
        let pct = provider.sample_memory().unwrap();
        assert!((0.0..=100.0).contains(&pct));
    }

    #[test]
    fn root_disk_is_a_percentage() {
        let provider = SysinfoProvider::default();
        let pct = provider.sample_disk(Path::new("/")).unwrap();
        assert!((0.0..=100.0).contains(&pct));
    }

    #[test]
    fn innermost_mount_wins() {
        let mounts = [
            (Path::new("/"), 1_000, 900),
            (Path::new("/home"), 200, 50),
        ];
        let pct = disk_usage(Path::new("/home/x"), mounts).unwrap();
        assert_eq!(pct, 75.0);
    }

    #[test]
    fn sibling_prefix_is_not_a_match() {
        let mounts = [
            (Path::new("/"), 1_000, 900),
            (Path::new("/home"), 200, 50),
        ];
        let pct = disk_usage(Path::new("/home2"), mounts).unwrap();
        assert_eq!(pct, 10.0);
    }

    #[test]
    fn relative_path_has_no_mount() {
        let mounts = [(Path::new("/"), 1_000, 900)];
        let err = disk_usage(Path::new("home/x"), mounts).unwrap_err();
        assert!(matches!(err, MonitorError::Provider(_)));
    }

    #[test]
    fn zero_sized_mount_is_a_provider_failure() {
        let mounts = [(Path::new("/"), 0, 0)];
        let err = disk_usage(Path::new("/"), mounts).unwrap_err();
        assert!(matches!(err, MonitorError::Provider(_)));
    }

    #[test]
    fn own_process_is_readable() {
        let provider = SysinfoProvider::default();
        let pids = provider.enumerate_processes().unwrap();
        let me = Pid::from_u32(std::process::id());
        assert!(pids.contains(&me));
        assert!(pids.windows(2).all(|w| w[0] < w[1]));

        let record = provider.read_process(&me).unwrap();
        assert_eq!(record.pid, std::process::id());
        assert!(!record.owner.is_empty());
    }

    #[test]
    fn vanished_pid_reads_as_exited() {
        let provider = SysinfoProvider::default();
        provider.enumerate_processes().unwrap();
        let ghost = Pid::from_u32(u32::MAX - 1);
        assert_eq!(
            provider.read_process(&ghost),
            Err(ProcessReadError::Exited(u32::MAX - 1))
        );
    }
}
