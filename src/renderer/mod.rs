//! Rendering
//!
//! Renderers consume a `view::Snapshot` and never touch the simulation.

pub mod terminal;

pub use terminal::{Cell, Frame, draw, rasterize};
