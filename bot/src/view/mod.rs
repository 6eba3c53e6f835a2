//! View rendering
//!
//! Pure functions turning tournament state into page content.

pub mod renderer;

pub use renderer::{render_view, RenderedView};
