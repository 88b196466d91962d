use crate::state::RankedView;

/// Messages flowing from the sampling core to the display surface.
///
/// Each variant mirrors one [`Presenter`](crate::Presenter) operation so a
/// channel-backed presenter can hand updates to another task unchanged.
/// A successful tick emits, in order: `ScalarsUpdated`, `HistoryUpdated`,
/// `RankedProcessesUpdated`. A failed tick emits a single `ErrorRaised`.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Current CPU, memory and disk usage (percent).
    ScalarsUpdated { cpu: f32, memory: f32, disk: f32 },
    /// Full CPU and memory history windows, oldest first.
    HistoryUpdated { cpu: Vec<f32>, memory: Vec<f32> },
    /// Top processes by CPU for the latest tick.
    RankedProcessesUpdated(RankedView),
    /// A tick was abandoned; the text is meant for the user.
    ErrorRaised(String),
}
