//! The consumer loop of an agent seat.

use super::capability::{AgentError, ChatCapability};
use super::event::AgentEvent;
use super::handle::AgentHandle;
use super::host::SeatHost;
use super::prompt::{self, sanitize_vote};
use crate::config::GameConfig;
use crate::transport::{ChannelId, Transport};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

/// Chat lines collected from one channel since the last reply.
#[derive(Debug)]
struct Batch {
    channel: ChannelId,
    text: String,
}

impl Batch {
    fn start(channel: ChannelId, author: &str, text: &str) -> Self {
        let mut batch = Self {
            channel,
            text: String::new(),
        };
        batch.push(author, text);
        batch
    }

    fn push(&mut self, author: &str, text: &str) {
        self.text.push_str(author);
        self.text.push_str(": ");
        self.text.push_str(text);
        self.text.push('\n');
    }
}

/// Drives one agent seat.
///
/// Events are consumed strictly in order, one at a time. Blocking model calls
/// run on the blocking pool with the capability moved in and back out, so
/// the worker owns its transcript exclusively.
pub struct AgentWorker {
    seat: String,
    chat: Option<Box<dyn ChatCapability>>,
    host: Arc<dyn SeatHost>,
    transport: Arc<dyn Transport>,
    queue: mpsc::UnboundedReceiver<AgentEvent>,
    stopped: Arc<AtomicBool>,
    batch: Option<Batch>,
}

impl AgentWorker {
    /// Creates a worker and the handle feeding it. Nothing runs until
    /// [`AgentWorker::run`] is awaited.
    pub fn new(
        seat: impl Into<String>,
        chat: Box<dyn ChatCapability>,
        host: Arc<dyn SeatHost>,
        transport: Arc<dyn Transport>,
    ) -> (Self, AgentHandle) {
        let seat = seat.into();
        let (sender, queue) = mpsc::unbounded_channel();
        let stopped = Arc::new(AtomicBool::new(false));
        let handle = AgentHandle::new(seat.clone(), sender, stopped.clone());
        let worker = Self {
            seat,
            chat: Some(chat),
            host,
            transport,
            queue,
            stopped,
            batch: None,
        };
        (worker, handle)
    }

    /// Starts a seat: primes the persona, spawns the loop and its timer.
    pub fn spawn(
        seat: &str,
        mut chat: Box<dyn ChatCapability>,
        host: Arc<dyn SeatHost>,
        transport: Arc<dyn Transport>,
        config: &GameConfig,
    ) -> AgentHandle {
        chat.system(&config.persona_for(seat));
        let (worker, handle) = Self::new(seat, chat, host, transport);
        tokio::spawn(worker.run());
        spawn_ticker(handle.clone(), config.agent_tick());
        tracing::info!(seat = %seat, "Agent seat started");
        handle
    }

    /// Consumes events until the stop sentinel or until the capability is lost.
    pub async fn run(mut self) {
        while let Some(event) = self.queue.recv().await {
            if event == AgentEvent::Stop {
                break;
            }
            if let Err(err) = self.process(event).await {
                if err.is_recoverable() {
                    tracing::warn!(seat = %self.seat, "Agent seat skipped an event: {}", err);
                } else {
                    tracing::error!(seat = %self.seat, "Agent seat failed: {}", err);
                    break;
                }
            }
        }
        self.stopped.store(true, Ordering::SeqCst);
        tracing::info!(seat = %self.seat, "Agent seat stopped");
    }

    async fn process(&mut self, event: AgentEvent) -> Result<(), AgentError> {
        match event {
            AgentEvent::Chat {
                channel,
                author,
                text,
            } => self.collect(channel, &author, &text).await,
            AgentEvent::Moderator { channel, prompt } => {
                let reply = self.ask(prompt).await?;
                self.post(&channel, &reply).await;
                Ok(())
            }
            AgentEvent::Private { text } => {
                self.chat_mut()?.advice(&text, None);
                Ok(())
            }
            AgentEvent::DecisionRequested => self.decide().await,
            AgentEvent::Tick => {
                self.flush().await?;
                self.decide().await
            }
            AgentEvent::Stop => Ok(()),
        }
    }

    /// Appends a chat line to the current batch. A line from another channel
    /// flushes the batch first.
    async fn collect(
        &mut self,
        channel: ChannelId,
        author: &str,
        text: &str,
    ) -> Result<(), AgentError> {
        if let Some(batch) = self.batch.as_mut().filter(|batch| batch.channel == channel) {
            batch.push(author, text);
            return Ok(());
        }
        self.flush().await?;
        self.batch = Some(Batch::start(channel, author, text));
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), AgentError> {
        let Some(batch) = self.batch.take() else {
            return Ok(());
        };
        tracing::debug!(seat = %self.seat, channel = %batch.channel, "Answering chat batch");
        self.chat_mut()?
            .advice(prompt::RECENT_CHAT_QUESTION, Some(&batch.text));
        let reply = self.ask(prompt::JOIN_CONVERSATION.to_string()).await?;
        self.post(&batch.channel, &reply).await;
        Ok(())
    }

    async fn decide(&mut self) -> Result<(), AgentError> {
        let Some(decisions) = self.host.pending_decisions(&self.seat).await else {
            return Ok(());
        };
        for decision in decisions {
            let reply = self.ask(decision.prompt().to_string()).await?;
            let Some(target) = sanitize_vote(&reply) else {
                tracing::debug!(seat = %self.seat, ?decision, "Empty decision reply");
                continue;
            };
            if !self.host.has_seat(&target).await {
                tracing::debug!(seat = %self.seat, ?decision, reply = %target, "Decision names no seat, dropped");
                continue;
            }
            match self.host.submit_vote(&self.seat, decision, &target).await {
                Ok(true) => {
                    tracing::info!(seat = %self.seat, ?decision, target = %target, "Agent seat decided");
                }
                Ok(false) => {
                    tracing::debug!(seat = %self.seat, ?decision, "Decision no longer owed, dropped");
                }
                Err(err) => tracing::warn!(seat = %self.seat, "Agent vote failed: {}", err),
            }
        }
        Ok(())
    }

    async fn ask(&mut self, prompt: String) -> Result<String, AgentError> {
        let mut chat = self.chat.take().ok_or(AgentError::CapabilityLost)?;
        let (chat, reply) = tokio::task::spawn_blocking(move || {
            let reply = chat.ask(&prompt);
            (chat, reply)
        })
        .await
        .map_err(|e| AgentError::Join(e.to_string()))?;
        self.chat = Some(chat);
        reply
    }

    async fn post(&mut self, channel: &ChannelId, reply: &str) {
        let text = format!("**{}**: {}", self.seat, reply.trim());
        self.transport.send_to_channel(channel, &text).await;
    }

    fn chat_mut(&mut self) -> Result<&mut Box<dyn ChatCapability>, AgentError> {
        self.chat.as_mut().ok_or(AgentError::CapabilityLost)
    }
}

/// Enqueues a `Tick` every `period` until the seat stops.
fn spawn_ticker(handle: AgentHandle, period: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // The first tick completes immediately.
        interval.tick().await;
        loop {
            interval.tick().await;
            if handle.is_stopped() || !handle.notify(AgentEvent::Tick) {
                break;
            }
        }
    });
}
