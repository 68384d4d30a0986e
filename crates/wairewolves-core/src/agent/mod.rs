//! Agent seats.
//!
//! An agent seat is a player driven by an LLM. Each seat runs one
//! [`AgentWorker`]: a single consumer loop over a FIFO queue of
//! [`AgentEvent`]s plus a periodic tick. Producers (the transport relaying
//! chat, the session announcing a new phase, private role reveals) only ever
//! enqueue through an [`AgentHandle`]. The worker reads the game and submits
//! its votes through a [`SeatHost`], never holding the session while it waits
//! for the model.
//!
//! # Module Structure
//!
//! - `capability`: the LLM seam (`ChatCapability`, `ChatFactory`)
//! - `event`: queue items
//! - `handle`: producer side of a seat's queue
//! - `host`: the worker's view of its session (`SeatHost`, `SessionLink`)
//! - `prompt`: prompt texts and reply sanitizing
//! - `worker`: the consumer loop

mod capability;
mod event;
mod handle;
mod host;
pub(crate) mod prompt;
mod worker;

pub use capability::{AgentError, ChatCapability, ChatFactory};
pub use event::AgentEvent;
pub use handle::AgentHandle;
pub use host::{Decision, SeatHost, SessionLink};
pub use prompt::sanitize_vote;
pub use worker::AgentWorker;
