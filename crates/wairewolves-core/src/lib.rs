//! Core of the wAIrewolves moderator.
//!
//! This crate owns the Werewolves game itself: the role-mix generator, the
//! players and their per-round vote state, the Ready/Night/Day session state
//! machine, and the worker that lets an LLM-backed agent occupy a seat.
//!
//! Everything platform specific stays outside: chat transports implement
//! [`transport::Transport`], LLM backends implement
//! [`agent::ChatCapability`], and hosts keep their sessions in a
//! [`registry::SessionRegistry`].
//!
//! # Module Structure
//!
//! - `role`: roles and the deterministic role-mix generator
//! - `player`: seats (human or agent) and their vote state
//! - `command`: commands consumed by the active phase
//! - `game`: the session state machine and its phase handlers
//! - `agent`: the agent-seat worker, its queue and the LLM capability seam
//! - `registry`: create-or-get registry of running sessions
//! - `transport`: outbound messaging seam
//! - `config`: game configuration
//! - `telemetry`: tracing subscriber setup for hosts and tests

pub mod agent;
pub mod command;
pub mod config;
pub mod error;
pub mod game;
pub mod player;
pub mod registry;
pub mod role;
pub mod telemetry;
pub mod transport;

pub use command::{Command, SeatKind};
pub use config::GameConfig;
pub use error::{GameError, Result};
pub use game::{GameSession, Phase, SessionServices, SharedSession};
pub use player::{Player, Seat};
pub use registry::SessionRegistry;
pub use role::Role;
pub use transport::{ChannelId, Transport};
