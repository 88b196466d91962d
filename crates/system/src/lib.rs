//! Host sampling for `ecomon`: the OS adapter, history windows, process
//! aggregation and ranking, and the scheduler that drives them.

pub mod aggregator;
pub mod history;
pub mod provider;
pub mod publish;
pub mod rank;
pub mod scheduler;
pub mod sysinfo_provider;

#[cfg(test)]
mod testing;

pub use aggregator::collect;
pub use history::HistoryBuffer;
pub use provider::MetricsProvider;
pub use publish::ChannelPresenter;
pub use rank::rank;
pub use scheduler::{Command, Scheduler, SchedulerHandle, SchedulerState, TickReport, TickSettings};
pub use sysinfo_provider::SysinfoProvider;
