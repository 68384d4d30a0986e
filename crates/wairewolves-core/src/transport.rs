//! Outbound messaging seam to the chat platform.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a chat channel, assigned by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(String);

impl ChannelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChannelId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Outbound side of a chat platform.
///
/// Sends are fire-and-forget: implementations log delivery failures
/// themselves, the game never waits for an acknowledgment. Only creating the
/// werewolves' secret channel can fail the calling command.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Posts `text` into a channel.
    async fn send_to_channel(&self, channel: &ChannelId, text: &str);

    /// Sends a private message to a human seat.
    async fn send_direct_message(&self, seat: &str, text: &str);

    /// Creates the werewolves-only side channel named `name`.
    async fn create_secret_channel(&self, name: &str) -> Result<ChannelId>;

    /// Deletes a side channel created by [`Transport::create_secret_channel`].
    async fn delete_secret_channel(&self, channel: &ChannelId);
}
