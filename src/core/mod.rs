// RLM Log Reader - core/mod.rs
//
// Core business logic layer: format detection, event extraction, usage
// analysis, and report writers.
// Must NOT depend on: ui, platform, app, or open files directly.

pub mod duration;
pub mod events;
pub mod export;
pub mod format;
pub mod model;
pub mod text;
pub mod time;
pub mod usage;
