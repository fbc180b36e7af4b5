//! Typing Animator
//!
//! Reveals an agent turn one character at a time. Each step writes the next
//! longer prefix into the [`MessageStore`]: first the empty prefix, then one
//! more character per step, ending with the full text and
//! `is_revealing == false`. A text of `n` characters therefore produces
//! `n + 1` writes.
//!
//! Characters are Unicode scalar values, so a prefix never splits a
//! multi-byte character.

use std::time::Duration;

use rand::Rng;

use crate::messages::MessageStore;

/// Characters after which the surface takes a breath
#[must_use]
pub fn is_breath_boundary(c: char) -> bool {
    matches!(c, ' ' | '.' | ',' | '?' | '!')
}

/// Bounds for the random per-character delay
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypingSpeed {
    /// Shortest delay
    pub min: Duration,
    /// Longest delay
    pub max: Duration,
}

impl TypingSpeed {
    /// Create bounds; reversed bounds are swapped
    #[must_use]
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Draw a delay uniformly from `[min, max]`
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let secs = rng.gen_range(self.min.as_secs_f64()..=self.max.as_secs_f64());
        Duration::from_secs_f64(secs).clamp(self.min, self.max)
    }
}

/// Outcome of one reveal step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RevealStep {
    /// Characters visible after this step
    pub revealed: usize,
    /// The character this step revealed, if any
    pub revealed_char: Option<char>,
    /// This was the final write
    pub finished: bool,
}

/// Reveals one agent turn
#[derive(Clone, Debug)]
pub struct TypingAnimator {
    turn: usize,
    text: String,
    /// Byte offset of the end of each prefix, `offsets[i]` for `i` characters
    offsets: Vec<usize>,
    next: usize,
    speed: TypingSpeed,
}

impl TypingAnimator {
    /// Prepare to reveal `text` into turn `turn`
    #[must_use]
    pub fn new(turn: usize, text: impl Into<String>, speed: TypingSpeed) -> Self {
        let text = text.into();
        let offsets = std::iter::once(0)
            .chain(text.char_indices().map(|(i, c)| i + c.len_utf8()))
            .collect();
        Self {
            turn,
            text,
            offsets,
            next: 0,
            speed,
        }
    }

    /// Index of the turn being revealed
    #[must_use]
    pub fn turn(&self) -> usize {
        self.turn
    }

    /// Number of characters in the text
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Whether every prefix has been written
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.next > self.char_count()
    }

    /// Begin revealing
    ///
    /// Empty text completes on the spot: the turn is written as revealed and
    /// `false` is returned, meaning no steps need scheduling.
    pub fn start(&mut self, store: &mut MessageStore) -> bool {
        if self.char_count() > 0 {
            return true;
        }
        self.advance(store);
        false
    }

    /// Delay before the next step
    pub fn next_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        self.speed.sample(rng)
    }

    /// Write the next prefix
    ///
    /// Returns `None` once the full text has been written.
    pub fn advance(&mut self, store: &mut MessageStore) -> Option<RevealStep> {
        if self.is_finished() {
            return None;
        }

        let revealed = self.next;
        self.next += 1;

        let finished = revealed == self.char_count();
        let prefix = &self.text[..self.offsets[revealed]];
        if !store.reveal(self.turn, prefix, !finished) {
            tracing::debug!(turn = self.turn, revealed, "Reveal write skipped");
        }

        let revealed_char = revealed
            .checked_sub(1)
            .and_then(|prev| self.text[self.offsets[prev]..].chars().next());

        Some(RevealStep {
            revealed,
            revealed_char,
            finished,
        })
    }
}
