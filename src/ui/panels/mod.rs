// RLM Log Reader - ui/panels/mod.rs

pub mod about;
pub mod dialogs;
pub mod form;
