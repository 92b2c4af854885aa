// RLM Log Reader - ui/theme.rs
//
// Colours and layout constants. No dependencies on app state.

use egui::Color32;

/// Error and warning text.
pub const ERROR_TEXT: Color32 = Color32::from_rgb(220, 38, 38); // Red 600
pub const WARNING_TEXT: Color32 = Color32::from_rgb(217, 119, 6); // Amber 600

/// Layout constants.
pub const WINDOW_SIZE: [f32; 2] = [640.0, 240.0];
pub const MIN_WINDOW_SIZE: [f32; 2] = [480.0, 200.0];
pub const LABEL_WIDTH: f32 = 110.0;
pub const PATH_FIELD_MIN_WIDTH: f32 = 280.0;
pub const DIALOG_WIDTH: f32 = 420.0;
pub const CONFLICT_LIST_HEIGHT: f32 = 160.0;

/// Repaint interval while a background analysis is running.
pub const JOB_POLL_INTERVAL_MS: u64 = 100;
