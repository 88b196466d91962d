use eco_core::{Message, Presenter, RankedView};
use tokio::sync::mpsc;
use tracing::debug;

/// [`Presenter`] that forwards every update as a [`Message`] to whichever
/// task owns the display.
///
/// The channel is unbounded so publishing never blocks the scheduler; one
/// tick produces at most three messages.
#[derive(Debug, Clone)]
pub struct ChannelPresenter {
    tx: mpsc::UnboundedSender<Message>,
}

impl ChannelPresenter {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, msg: Message) {
        if self.tx.send(msg).is_err() {
            debug!("display receiver dropped; update discarded");
        }
    }
}

impl Presenter for ChannelPresenter {
    fn update_scalars(&mut self, cpu: f32, memory: f32, disk: f32) {
        self.send(Message::ScalarsUpdated { cpu, memory, disk });
    }

    fn update_history(&mut self, cpu: &[f32], memory: &[f32]) {
        self.send(Message::HistoryUpdated {
            cpu:    cpu.to_vec(),
            memory: memory.to_vec(),
        });
    }

    fn update_ranked_processes(&mut self, ranked: &RankedView) {
        self.send(Message::RankedProcessesUpdated(ranked.clone()));
    }

    fn notify_error(&mut self, message: &str) {
        self.send(Message::ErrorRaised(message.to_string()));
    }
}
