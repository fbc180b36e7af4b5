//! Reply Backend Integration
//!
//! Where agent turns come from. A backend takes the user's message and
//! returns an [`InboundTurn`](crate::events::InboundTurn) for the Conductor.
//!
//! # Available Backends
//!
//! - **Ollama**: Local LLM server (default)
//!
//! # Usage
//!
//! ```ignore
//! use zenorb_core::backend::{OllamaBackend, ReplyBackend};
//!
//! let backend = OllamaBackend::from_env()?;
//! let turn = backend.reply("What colour is calm?").await?;
//! conductor.handle_inbound(turn);
//! ```

mod ollama;
mod traits;

pub use ollama::{OllamaBackend, DEFAULT_SYSTEM_PROMPT};
pub use traits::{parse_reply, BackendError, ReplyBackend};
