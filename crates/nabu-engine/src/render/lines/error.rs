/// Failures of the one-time line renderer setup.
///
/// Either variant disables the renderer for the rest of the session.
#[derive(Debug, thiserror::Error)]
pub enum LineRenderError {
    /// Shader compilation or pipeline creation failed.
    #[error("line program setup failed: {0}")]
    Setup(String),

    /// Static flip/index buffers could not be allocated.
    #[error("line buffer allocation failed: {0}")]
    Allocation(String),
}
