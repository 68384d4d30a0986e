//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use wairewolves_core::agent::{AgentError, ChatCapability, ChatFactory, Decision};
use wairewolves_core::telemetry;
use wairewolves_core::{
    ChannelId, Command, GameError, GameSession, Result, Role, SessionServices, SharedSession,
    Transport,
};

pub const VILLAGE: &str = "village";
pub const SECRET: &str = "WerewolvesOnly_village";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Channel(ChannelId, String),
    Direct(String, String),
}

/// Transport that records everything it is asked to do.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<Sent>>,
    created: Mutex<Vec<String>>,
    deleted: Mutex<Vec<ChannelId>>,
    refuse_secret_channel: AtomicBool,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A transport whose secret channel creation always fails.
    pub fn refusing_secret_channel() -> Arc<Self> {
        let transport = Self::default();
        transport.refuse_secret_channel.store(true, Ordering::SeqCst);
        Arc::new(transport)
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn channel_messages(&self, channel: &str) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|sent| match sent {
                Sent::Channel(id, text) if id.as_str() == channel => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn direct_messages(&self, seat: &str) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|sent| match sent {
                Sent::Direct(to, text) if to == seat => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn last_channel_message(&self, channel: &str) -> Option<String> {
        self.channel_messages(channel).pop()
    }

    pub fn has_channel_message(&self, channel: &str, text: &str) -> bool {
        self.channel_messages(channel).iter().any(|sent| sent == text)
    }

    pub fn created(&self) -> Vec<String> {
        self.created.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<ChannelId> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send_to_channel(&self, channel: &ChannelId, text: &str) {
        self.sent
            .lock()
            .unwrap()
            .push(Sent::Channel(channel.clone(), text.to_string()));
    }

    async fn send_direct_message(&self, seat: &str, text: &str) {
        self.sent
            .lock()
            .unwrap()
            .push(Sent::Direct(seat.to_string(), text.to_string()));
    }

    async fn create_secret_channel(&self, name: &str) -> Result<ChannelId> {
        if self.refuse_secret_channel.load(Ordering::SeqCst) {
            return Err(GameError::transport("missing permission to create channels"));
        }
        self.created.lock().unwrap().push(name.to_string());
        Ok(ChannelId::new(name))
    }

    async fn delete_secret_channel(&self, channel: &ChannelId) {
        self.deleted.lock().unwrap().push(channel.clone());
    }
}

/// Keeps the generated order, so seats are dealt deterministically.
pub fn keep_order(_roles: &mut [Role]) {}

pub fn services(transport: Arc<RecordingTransport>) -> SessionServices {
    SessionServices::new(transport).with_shuffle(keep_order)
}

pub fn session(services: SessionServices) -> SharedSession {
    telemetry::init_test_tracing();
    GameSession::shared(VILLAGE, ChannelId::new(VILLAGE), services)
}

/// Seats `names` as humans, in order.
pub async fn seated(services: SessionServices, names: &[&str]) -> SharedSession {
    let session = session(services);
    {
        let mut game = session.lock().await;
        for name in names {
            game.handle(Command::join(*name)).await.unwrap();
        }
    }
    session
}

/// Seats `names` and starts the game.
///
/// With four seats the second one is the werewolf; with five seats the first
/// is the seer and the second and third are werewolves.
pub async fn started(services: SessionServices, names: &[&str]) -> SharedSession {
    let session = seated(services, names).await;
    session.lock().await.handle(Command::Start).await.unwrap();
    session
}

pub async fn run(session: &SharedSession, command: Command) {
    session.lock().await.handle(command).await.unwrap();
}

/// Model double: names `target` whenever asked for a decision.
pub struct ScriptedChat {
    target: String,
    pub transcript: Arc<Mutex<Vec<String>>>,
}

impl ChatCapability for ScriptedChat {
    fn system(&mut self, context: &str) {
        self.transcript
            .lock()
            .unwrap()
            .push(format!("system: {context}"));
    }

    fn advice(&mut self, question: &str, answer: Option<&str>) {
        self.transcript
            .lock()
            .unwrap()
            .push(format!("advice: {question} / {}", answer.unwrap_or("-")));
    }

    fn ask(&mut self, prompt: &str) -> std::result::Result<String, AgentError> {
        self.transcript.lock().unwrap().push(format!("ask: {prompt}"));
        let decisions = [
            Decision::WerewolfVote,
            Decision::VillagerVote,
            Decision::SeerAsk,
        ];
        if decisions.iter().any(|decision| decision.prompt() == prompt) {
            Ok(format!(" {}.\n", self.target))
        } else {
            Ok("Hello everyone!".to_string())
        }
    }
}

/// Factory handing every agent seat a [`ScriptedChat`] naming `target`.
pub fn scripted_factory(
    target: &str,
    transcript: Arc<Mutex<Vec<String>>>,
) -> Arc<dyn ChatFactory> {
    let target = target.to_string();
    Arc::new(move |_seat: &str| -> Box<dyn ChatCapability> {
        Box::new(ScriptedChat {
            target: target.clone(),
            transcript: transcript.clone(),
        })
    })
}
