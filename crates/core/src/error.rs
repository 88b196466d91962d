use thiserror::Error;

/// Top-level error type used across the entire application.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("config error: {0}")]
    Config(String),

    /// A whole-system reading (CPU, memory, disk, process table) failed.
    #[error("provider unavailable: {0}")]
    Provider(String),

    /// The provider answered, but with a value that makes no sense.
    #[error("malformed data: {0}")]
    MalformedData(String),

    /// The sampling loop is gone or could not take a command.
    #[error("scheduler error: {0}")]
    Scheduler(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

/// Why a single process could not be read during enumeration.
///
/// These are expected while walking a live process table and never abort a
/// tick; the aggregator simply leaves the process out of the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProcessReadError {
    #[error("process {0} exited")]
    Exited(u32),

    #[error("access to process {0} denied")]
    AccessDenied(u32),

    #[error("process {0} is a zombie")]
    Zombie(u32),
}

pub type Result<T, E = MonitorError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_message() {
        let err = MonitorError::Provider("cpu counters missing".into());
        assert_eq!(err.to_string(), "provider unavailable: cpu counters missing");
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: MonitorError = io.into();
        assert!(matches!(err, MonitorError::Io { .. }));
    }
}
