//! Animation System - Time-Driven Surface Animators
//!
//! Three animators move the surface state forward. None of them owns a timer:
//! the [`Conductor`](crate::Conductor) schedules their steps on the shared
//! [`Scheduler`](crate::scheduler::Scheduler) and hands each one the logical
//! time the step was due.
//!
//! # Design Philosophy
//!
//! - **Step-driven**: Animators expose a single-step operation; the caller
//!   decides when steps happen
//! - **Deterministic**: Same inputs, same clock readings, same output
//! - **Cancellable**: Every animator can be halted mid-flight on dispose
//!
//! # Architecture
//!
//! ```text
//! Conductor
//!     │
//!     ├─→ TypingAnimator          (MessageStore: revealed prefixes)
//!     │       └─→ BreathingAnimator   (SurfaceParameters.scale)
//!     │
//!     └─→ ColorTransitionController (SurfaceParameters colours + mix ratio)
//! ```

mod breathing;
mod color_transition;
mod easing;
mod typing;

pub use breathing::{BreathStep, BreathingAnimator, BreathingState, TriggerOutcome};
pub use color_transition::{ColorTransitionController, TransitionState};
pub use easing::EasingFunction;
pub use typing::{is_breath_boundary, RevealStep, TypingAnimator, TypingSpeed};
