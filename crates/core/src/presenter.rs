use crate::state::RankedView;

/// The display surface fed by the scheduler.
///
/// Presenters are purely reactive: every call carries complete data for one
/// tick, so an implementation never observes a buffer mid-update. Rendering
/// is left entirely to the implementor.
pub trait Presenter: Send + 'static {
    fn update_scalars(&mut self, cpu: f32, memory: f32, disk: f32);

    /// Series are ordered oldest first.
    fn update_history(&mut self, cpu: &[f32], memory: &[f32]);

    fn update_ranked_processes(&mut self, ranked: &RankedView);

    /// Called at most once per tick, only when that tick failed.
    fn notify_error(&mut self, message: &str);
}
