//! nabu engine crate.
//!
//! Tile-map line rendering and overlay selection on top of a small
//! winit + wgpu runtime:
//! - `geometry` / `layers`: packing polylines into stippled-line quads
//! - `render`: batching those quads into GPU draws
//! - `overlay` / `input`: turning taps and long presses into item selection

pub mod core;
pub mod device;
pub mod input;
pub mod time;
pub mod window;

pub mod coords;
pub mod geo;
pub mod geometry;
pub mod layers;
pub mod logging;
pub mod overlay;
pub mod paint;
pub mod render;
pub mod view;
