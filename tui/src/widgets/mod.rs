//! Widgets
//!
//! - [`OrbView`]: The engine raster drawn with half-block cells
//! - [`ConversationView`]: Borderless, scrollable message list

mod conversation;
mod orb;

pub use conversation::{conversation_lines, ConversationState, ConversationView, AGENT_PREFIX};
pub use orb::{raster_size, OrbView};
