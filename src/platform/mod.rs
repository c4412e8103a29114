//! Platform layer
//!
//! Translates terminal events into simulation intents. The simulation never
//! sees physical keys.

pub mod input;

pub use input::intent_for_event;
