//! Zenorb Core - Headless Engine for a Breathing Conversational Surface
//!
//! This crate animates a translucent, noise-deformed sphere that reacts to a
//! conversation: agent replies are revealed character by character, the
//! surface takes a short breath at word and sentence boundaries, and replies
//! can carry a colour that the surface slowly fades into. It is independent
//! of any UI framework and renders into a plain RGB8 frame buffer.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                         UI Surface (TUI)                         │
//! │     user text ──┐                         ┌── FrameBuffer        │
//! │                 │    InboundTurn (JSON)   │   TurnView list      │
//! └─────────────────┼───────────┬─────────────┼──────────────────────┘
//!                   │           │             │
//! ┌─────────────────┼───────────┼─────────────┼──────────────────────┐
//! │                 ▼           ▼             │     ZENORB CORE      │
//! │  ┌──────────────────────────────────────────────────────────┐    │
//! │  │                        Conductor                         │    │
//! │  │  ┌────────────┐ ┌───────────┐ ┌───────────┐ ┌──────────┐ │    │
//! │  │  │  Message   │ │  Typing   │ │ Breathing │ │  Colour  │ │    │
//! │  │  │   Store    │ │ Animator  │ │ Animator  │ │Transition│ │    │
//! │  │  └────────────┘ └───────────┘ └───────────┘ └──────────┘ │    │
//! │  │          Scheduler (jobs due on the render clock)        │    │
//! │  │   RenderLoop: Clock + SurfaceParameters + Rasterizer     │    │
//! │  └──────────────────────────────────────────────────────────┘    │
//! │                                                                  │
//! │  backend: ReplyBackend (Ollama) ── user text → InboundTurn       │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Conductor`]: Owns everything and advances it one tick at a time
//! - [`SurfaceParameters`]: The numbers the Surface Model renders from
//! - [`InboundTurn`]: Agent text plus an optional colour directive
//! - [`Turn`]: One entry of the conversation history
//! - [`EngineConfig`]: Layered TOML and environment configuration
//!
//! # Quick Start
//!
//! ```ignore
//! use std::time::Duration;
//! use zenorb_core::{Conductor, EngineConfig, InboundTurn};
//!
//! let mut conductor = Conductor::new(EngineConfig::from_env());
//! conductor.start(160, 90);
//!
//! conductor.push_user_turn("What colour is the sea?");
//! conductor.handle_inbound(InboundTurn::text("Deep blue.").with_color("#1e5aa8"));
//!
//! // Once per display frame
//! if let Some(frame) = conductor.tick() {
//!     // blit frame.pixels()
//! }
//!
//! conductor.dispose();
//! ```
//!
//! # Module Overview
//!
//! - [`animation`]: Typing, breathing and colour transition animators
//! - [`backend`]: Reply backend abstraction (Ollama)
//! - [`clock`]: The logical render clock
//! - [`color`]: Colours, palettes and hex parsing
//! - [`conductor`]: Main Conductor struct
//! - [`config`]: Configuration loading and validation
//! - [`events`]: Inbound turns and colour directives
//! - [`messages`]: Append-only conversation history
//! - [`render`]: Render loop, camera, mesh and rasteriser
//! - [`scheduler`]: Timed job queue driven by the render clock
//! - [`surface`]: The Surface Model (deformation and colour)
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework. It's pure engine logic that can be used anywhere.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod animation;
pub mod backend;
pub mod clock;
pub mod color;
pub mod conductor;
pub mod config;
pub mod events;
pub mod messages;
pub mod render;
pub mod scheduler;
pub mod surface;

// Re-exports for convenience
pub use conductor::Conductor;
pub use events::{ColorRequest, InboundTurn, SceneUpdate};
pub use messages::{MessageStore, Turn, TurnView};

// Animation exports
pub use animation::{
    BreathingAnimator, BreathingState, ColorTransitionController, EasingFunction, TransitionState,
    TypingAnimator, TypingSpeed,
};

// Backend exports
pub use backend::{parse_reply, BackendError, OllamaBackend, ReplyBackend};

// Colour exports
pub use color::{ColorParseError, Palette, Rgb};

// Render exports
pub use render::{FrameBuffer, LoopState, RenderLoop};

// Surface exports
pub use surface::SurfaceParameters;

// Config exports
pub use config::{
    default_config_path, load_config, load_config_from_path, ConfigError, ConfigSource,
    EngineConfig,
};
