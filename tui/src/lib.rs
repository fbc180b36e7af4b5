//! Zenorb TUI - Terminal surface for the breathing orb
//!
//! This crate draws the engine's raster in a terminal and feeds it a
//! conversation with a reply backend.
//!
//! # Architecture
//!
//! - **App**: Event loop, frame tick, reply channel
//! - **Widgets**: Half-block orb view and a borderless scrollable conversation
//! - **Theme**: Text colours around the orb

pub mod app;
pub mod theme;
pub mod widgets;

pub use app::App;
