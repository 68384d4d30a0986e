//! LLM backends for wAIrewolves agent seats.
//!
//! Implements [`wairewolves_core::agent::ChatCapability`] on top of the OpenAI
//! chat completions API, with credentials from `secret.json` or the
//! environment.

pub mod config;
pub mod error;
pub mod openai_chat;

pub use config::{OpenAiConfig, SecretConfig, load_secret_config, load_secret_config_from};
pub use error::InteractionError;
pub use openai_chat::{ChatMessage, OpenAiChat, OpenAiChatFactory};
