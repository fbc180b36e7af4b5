//! Reply Backend Traits
//!
//! A reply backend turns one user message into one [`InboundTurn`]. The
//! Conductor never talks to a backend directly: surfaces call the backend
//! off the frame loop and hand the result to
//! [`Conductor::handle_inbound`](crate::Conductor::handle_inbound).
//!
//! # Design Philosophy
//!
//! Backends are asked for a JSON object of the inbound wire form. Models do
//! not always comply, so [`parse_reply`] treats anything that is not such an
//! object as plain text with no colour directive.

use async_trait::async_trait;
use thiserror::Error;

use crate::events::InboundTurn;

/// Errors from a reply backend
#[derive(Debug, Error)]
pub enum BackendError {
    /// Transport-level failure
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The server answered with a non-success status
    #[error("backend returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },
    /// The response did not have the expected shape
    #[error("unexpected response: {0}")]
    Decode(String),
}

/// Produces agent replies for user messages
#[async_trait]
pub trait ReplyBackend: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &'static str;

    /// Whether the backend is reachable
    async fn health_check(&self) -> bool;

    /// Ask for a reply to `message`
    async fn reply(&self, message: &str) -> Result<InboundTurn, BackendError>;
}

/// Interpret raw model output
///
/// A JSON object is read as the inbound wire form. Anything else becomes a
/// text-only turn carrying the raw output.
#[must_use]
pub fn parse_reply(content: &str) -> InboundTurn {
    match InboundTurn::from_json(content.trim()) {
        Ok(turn) => turn,
        Err(e) => {
            tracing::debug!(error = %e, "Reply is not structured; using it as plain text");
            InboundTurn::text(content)
        }
    }
}
