//! Stippled ("textured") line rendering.
//!
//! `LineBatchRenderer` owns the draw logic: per-layer uniforms, even/odd
//! passes and chunking against the static index buffer. It talks to the GPU
//! only through [`LineBackend`], so the same logic drives wgpu
//! ([`WgpuLineBackend`]) and the recording backend used in tests.

mod backend;
mod error;
mod renderer;
mod wgpu_backend;

#[cfg(test)]
pub(crate) mod recording;

pub use backend::{AttributeBinding, LineBackend, LineUniforms};
pub use error::LineRenderError;
pub use renderer::{LineBatchRenderer, LineRendererConfig, Pass, RendererState};
pub use wgpu_backend::WgpuLineBackend;
