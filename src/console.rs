//! Terminal rendering of published ticks.

use chrono::Local;
use eco_config::OutputFormat;
use eco_core::{Message, RankedView};
use serde::Serialize;
use std::io::{IsTerminal, Write};
use tracing::error;

const SPARK: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const NAME_WIDTH: usize = 24;

/// Collects one tick's worth of messages and draws a frame once the ranked
/// view (the last message of a tick) arrives.
pub struct Console {
    format:  OutputFormat,
    scalars: (f32, f32, f32),
    cpu:     Vec<f32>,
    memory:  Vec<f32>,
}

#[derive(Serialize)]
struct JsonFrame<'a> {
    taken_at:       String,
    cpu_percent:    f32,
    memory_percent: f32,
    disk_percent:   f32,
    cpu_history:    &'a [f32],
    memory_history: &'a [f32],
    processes:      &'a RankedView,
}

impl Console {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            scalars: (0.0, 0.0, 0.0),
            cpu:     Vec::new(),
            memory:  Vec::new(),
        }
    }

    pub fn set_format(&mut self, format: OutputFormat) {
        self.format = format;
    }

    pub fn handle(&mut self, msg: Message) -> anyhow::Result<()> {
        match msg {
            Message::ScalarsUpdated { cpu, memory, disk } => self.scalars = (cpu, memory, disk),
            Message::HistoryUpdated { cpu, memory } => {
                self.cpu = cpu;
                self.memory = memory;
            }
            Message::RankedProcessesUpdated(ranked) => {
                let frame = match self.format {
                    OutputFormat::Table => self.table(&ranked),
                    OutputFormat::Json  => self.json(&ranked)?,
                };
                let mut out = std::io::stdout().lock();
                if self.format == OutputFormat::Table && out.is_terminal() {
                    write!(out, "\x1b[2J\x1b[H")?;
                }
                writeln!(out, "{frame}")?;
                out.flush()?;
            }
            Message::ErrorRaised(text) => {
                error!("{text}");
                eprintln!("Error: {text}");
            }
        }
        Ok(())
    }

    fn table(&self, ranked: &RankedView) -> String {
        let (cpu, memory, disk) = self.scalars;
        let mut out = String::new();

        out.push_str(&format!("EcoKernel Process Monitor | {}\n\n", Local::now().format("%H:%M:%S")));
        out.push_str(&format!("CPU Usage: {cpu:.1}%\n"));
        out.push_str(&format!("Memory Usage: {memory:.1}%\n"));
        out.push_str(&format!("Disk Usage: {disk:.1}%\n\n"));
        out.push_str(&format!("CPU    {}\n", sparkline(&self.cpu)));
        out.push_str(&format!("Memory {}\n\n", sparkline(&self.memory)));
        out.push_str(&process_table(ranked));
        out
    }

    fn json(&self, ranked: &RankedView) -> serde_json::Result<String> {
        let (cpu, memory, disk) = self.scalars;
        serde_json::to_string(&JsonFrame {
            taken_at:       Local::now().to_rfc3339(),
            cpu_percent:    cpu,
            memory_percent: memory,
            disk_percent:   disk,
            cpu_history:    &self.cpu,
            memory_history: &self.memory,
            processes:      ranked,
        })
    }
}

/// One block character per sample, scaled over 0 – 100 %.
fn sparkline(series: &[f32]) -> String {
    series
        .iter()
        .map(|v| {
            let step = (v.clamp(0.0, 100.0) / 100.0 * (SPARK.len() - 1) as f32).round();
            SPARK[step as usize]
        })
        .collect()
}

fn process_table(ranked: &RankedView) -> String {
    let mut out = format!(
        "{:>7}  {:<NAME_WIDTH$}  {:<12}  {:>6}  {:>8}\n",
        "PID", "Name", "User", "CPU %", "Memory %"
    );
    for p in ranked {
        let name: String = p.name.chars().take(NAME_WIDTH).collect();
        let owner: String = p.owner.chars().take(12).collect();
        out.push_str(&format!(
            "{:>7}  {:<NAME_WIDTH$}  {:<12}  {:>6.1}  {:>8.1}\n",
            p.pid, name, owner, p.cpu_percent, p.memory_percent
        ));
    }
    out
}
