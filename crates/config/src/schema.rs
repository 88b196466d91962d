use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure parsed from `ecomon.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Sampling loop settings.
    pub sampling: SamplingConfig,
    /// How completed ticks are rendered.
    pub output: OutputConfig,
}

/// Sampling loop settings. One interval drives every metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Delay between the end of one tick and the start of the next.
    pub interval_ms: u64,
    /// How long the CPU reading blocks to measure utilisation.
    pub cpu_window_ms: u64,
    /// Number of processes in the ranked view.
    pub top_n: usize,
    /// Samples kept per history buffer.
    pub history_capacity: usize,
    /// Path whose filesystem is reported as disk usage.
    pub disk_path: PathBuf,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            interval_ms:      2_000,
            cpu_window_ms:    1_000,
            top_n:            10,
            history_capacity: 30,
            disk_path:        PathBuf::from("/"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

/// Console rendering style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Labels, sparklines and a process table.
    #[default]
    Table,
    /// One JSON object per tick.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let cfg: MonitorConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, MonitorConfig::default());
        assert_eq!(cfg.sampling.interval_ms, 2_000);
        assert_eq!(cfg.sampling.history_capacity, 30);
        assert_eq!(cfg.sampling.top_n, 10);
    }

    #[test]
    fn partial_sampling_section() {
        let cfg: MonitorConfig = toml::from_str(
            r#"
            [sampling]
            top_n = 5
            disk_path = "/home"

            [output]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.sampling.top_n, 5);
        assert_eq!(cfg.sampling.disk_path, PathBuf::from("/home"));
        assert_eq!(cfg.sampling.cpu_window_ms, 1_000);
        assert_eq!(cfg.output.format, OutputFormat::Json);
    }

    #[test]
    fn unknown_format_is_rejected() {
        let res: Result<MonitorConfig, _> = toml::from_str("[output]\nformat = \"xml\"");
        assert!(res.is_err());
    }
}
