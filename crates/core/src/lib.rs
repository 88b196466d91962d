pub mod error;
pub mod event;
pub mod presenter;
pub mod state;

pub use error::{MonitorError, ProcessReadError, Result};
pub use event::Message;
pub use presenter::Presenter;
pub use state::{MetricKind, MetricSample, ProcessRecord, RankedView, Snapshot};
