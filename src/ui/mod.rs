// RLM Log Reader - ui/mod.rs
//
// UI layer: presentation only.
// Dependencies: app (state), core (read-only models), egui, rfd.
// Must NOT depend on: direct I/O.

pub mod panels;
pub mod theme;
