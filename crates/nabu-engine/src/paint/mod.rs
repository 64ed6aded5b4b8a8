//! Color model shared by line styles and the frame clear.

pub mod color;

pub use color::Color;
