//! Message Store
//!
//! An append-only, ordered list of conversation turns. Turns are never
//! removed or reordered, so a turn's index is a stable handle for the life
//! of the engine.
//!
//! User turns are complete on arrival. Agent turns start empty and are filled
//! in by the typing animator through [`MessageStore::reveal`], the only
//! mutation the store allows after a push. Once an agent turn is fully
//! revealed it is frozen.

use serde::{Deserialize, Serialize};

/// One conversation turn
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    source_text: String,
    is_agent: bool,
    is_revealing: bool,
    revealed_text: String,
}

impl Turn {
    /// A fully visible user turn
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            revealed_text: text.clone(),
            source_text: text,
            is_agent: false,
            is_revealing: false,
        }
    }

    /// An agent turn waiting to be revealed
    #[must_use]
    pub fn agent(text: impl Into<String>) -> Self {
        Self {
            source_text: text.into(),
            is_agent: true,
            is_revealing: true,
            revealed_text: String::new(),
        }
    }

    /// Full text of the turn
    #[must_use]
    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    /// Whether the agent produced this turn
    #[must_use]
    pub fn is_agent(&self) -> bool {
        self.is_agent
    }

    /// Whether characters are still being revealed
    #[must_use]
    pub fn is_revealing(&self) -> bool {
        self.is_revealing
    }

    /// Currently visible text, always a prefix of [`Turn::source_text`]
    #[must_use]
    pub fn revealed_text(&self) -> &str {
        &self.revealed_text
    }

    /// Fully revealed and no longer animating
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !self.is_revealing && self.revealed_text.len() == self.source_text.len()
    }

    /// Borrowed view for display
    #[must_use]
    pub fn view(&self) -> TurnView<'_> {
        TurnView {
            is_agent: self.is_agent,
            text: &self.revealed_text,
            is_revealing: self.is_revealing,
        }
    }
}

/// What a surface needs to draw a turn
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnView<'a> {
    /// Agent or user
    pub is_agent: bool,
    /// Visible text
    pub text: &'a str,
    /// Draw a cursor after the text
    pub is_revealing: bool,
}

/// Ordered conversation history
#[derive(Clone, Debug, Default)]
pub struct MessageStore {
    turns: Vec<Turn>,
}

impl MessageStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user turn, returning its index
    pub fn push_user(&mut self, text: impl Into<String>) -> usize {
        self.push(Turn::user(text))
    }

    /// Append an agent turn, returning its index
    pub fn push_agent(&mut self, text: impl Into<String>) -> usize {
        self.push(Turn::agent(text))
    }

    fn push(&mut self, turn: Turn) -> usize {
        self.turns.push(turn);
        self.turns.len() - 1
    }

    /// Turn at `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Turn> {
        self.turns.get(index)
    }

    /// All turns in order
    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Views of all turns in order
    pub fn views(&self) -> impl Iterator<Item = TurnView<'_>> {
        self.turns.iter().map(Turn::view)
    }

    /// Number of turns
    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether there are no turns
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Write a revealed prefix into an agent turn
    ///
    /// Rejected (returning `false`) when the turn does not exist, is a user
    /// turn, is already settled, or `prefix` is not a prefix of its text.
    pub fn reveal(&mut self, index: usize, prefix: &str, is_revealing: bool) -> bool {
        let Some(turn) = self.turns.get_mut(index) else {
            tracing::warn!(index, "Reveal for unknown turn");
            return false;
        };
        if !turn.is_agent || turn.is_settled() {
            tracing::warn!(index, "Reveal rejected: turn is not revealable");
            return false;
        }
        if !turn.source_text.starts_with(prefix) {
            tracing::warn!(index, "Reveal rejected: not a prefix of the turn text");
            return false;
        }

        turn.revealed_text.clear();
        turn.revealed_text.push_str(prefix);
        turn.is_revealing = is_revealing;
        true
    }
}
