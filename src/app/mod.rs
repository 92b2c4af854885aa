// RLM Log Reader - app/mod.rs
//
// Application layer: the analysis pipeline, batch runs, background jobs,
// settings persistence, and window state.
// Dependencies: core and platform layers.
// Must NOT depend on: ui.

pub mod analysis;
pub mod batch;
pub mod job;
pub mod settings;
pub mod state;
