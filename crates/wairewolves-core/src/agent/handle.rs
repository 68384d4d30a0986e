use super::event::AgentEvent;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc::UnboundedSender;

/// Producer side of an agent seat's queue.
///
/// Cloning is cheap; every clone feeds the same worker.
#[derive(Debug, Clone)]
pub struct AgentHandle {
    seat: String,
    sender: UnboundedSender<AgentEvent>,
    stopped: Arc<AtomicBool>,
}

impl AgentHandle {
    pub(crate) fn new(
        seat: String,
        sender: UnboundedSender<AgentEvent>,
        stopped: Arc<AtomicBool>,
    ) -> Self {
        Self {
            seat,
            sender,
            stopped,
        }
    }

    pub fn seat(&self) -> &str {
        &self.seat
    }

    /// Enqueues an event. Returns `false` once the seat is stopped or gone.
    pub fn notify(&self, event: AgentEvent) -> bool {
        if self.is_stopped() {
            tracing::debug!(seat = %self.seat, ?event, "Dropping event for stopped agent seat");
            return false;
        }
        self.sender.send(event).is_ok()
    }

    /// Requests a cooperative stop.
    ///
    /// Sets the stop flag and enqueues the sentinel behind everything already
    /// queued. Calling it again has no effect.
    pub fn stop(&self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        tracing::info!(seat = %self.seat, "Stopping agent seat");
        let _ = self.sender.send(AgentEvent::Stop);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}
