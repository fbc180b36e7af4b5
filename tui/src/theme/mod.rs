//! Theme and Colors
//!
//! The orb paints itself from the engine's raster, so the theme only covers
//! the text around it.

use ratatui::style::Color;

// ============================================================================
// Conversation Colors
// ============================================================================

/// User turns - soft green
pub const USER_GREEN: Color = Color::Rgb(130, 220, 130);

/// Agent turns - muted violet, close to the default palette
pub const ORB_VIOLET: Color = Color::Rgb(180, 150, 230);

/// Reveal cursor shown after a turn that is still typing
pub const CURSOR_GLOW: Color = Color::Rgb(255, 223, 128);

// ============================================================================
// UI Colors
// ============================================================================

/// Input prompt
pub const PROMPT: Color = Color::Rgb(150, 180, 255);

/// System/dim text
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Error red
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);
