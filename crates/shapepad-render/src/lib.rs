//! Shapepad Render Library
//!
//! A small drawing-surface abstraction, the scene renderer that drives it,
//! and two surfaces: a recording one for headless use and a Vello one for
//! the GPU.

mod recording;
mod renderer;
mod surface;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use recording::{DrawCommand, RecordingSurface};
pub use renderer::{DEFAULT_FONT_SIZE, DEFAULT_STROKE_WIDTH, RenderContext, render};
pub use surface::DrawingSurface;

#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloSurface;
