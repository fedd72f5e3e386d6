//! Color theme constants for the ragdesk UI
//!
//! Defines the minimal dark color palette used throughout the UI.

use ratatui::style::Color;

/// Primary border color
pub const COLOR_BORDER: Color = Color::DarkGray;

/// Border of the focused panel
pub const COLOR_FOCUS: Color = Color::White;

/// Accent color for highlights and important elements
pub const COLOR_ACCENT: Color = Color::White;

/// User turn header
pub const COLOR_USER: Color = Color::Cyan;

/// Assistant turn header
pub const COLOR_ASSISTANT: Color = Color::Rgb(4, 181, 117);

/// Active/running elements
pub const COLOR_ACTIVE: Color = Color::LightGreen;

/// Dim text for less important info
pub const COLOR_DIM: Color = Color::DarkGray;

/// Errors in the transcript and the status bar
pub const COLOR_ERROR: Color = Color::Red;

/// Failed requests that may succeed when repeated
pub const COLOR_RETRYABLE: Color = Color::LightYellow;

/// Selected filter values
pub const COLOR_SELECTED: Color = Color::Yellow;

/// Spinner frames shown while something is in flight
pub const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];
