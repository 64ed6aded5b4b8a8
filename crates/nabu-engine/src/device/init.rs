/// Surface and device preferences, applied once per window.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Pick an sRGB surface when one exists. Line colors are premultiplied
    /// linear RGBA and rely on the surface for sRGB encoding.
    pub prefer_srgb: bool,
    /// Wait for vertical blank; off trades tearing for latency.
    pub vsync: bool,
    pub power_preference: wgpu::PowerPreference,
    /// Used when the surface supports it.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,
    /// Frames the CPU may queue ahead of the GPU.
    pub max_frames_in_flight: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            vsync: true,
            power_preference: wgpu::PowerPreference::LowPower,
            alpha_mode: None,
            max_frames_in_flight: 2,
        }
    }
}

impl GpuInit {
    pub fn present_mode(&self) -> wgpu::PresentMode {
        if self.vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        }
    }

    /// Device limits for the line renderer.
    ///
    /// The quad pipeline binds three vertex buffers and one dynamic uniform
    /// buffer, which every downlevel adapter supports.
    pub fn required_limits(&self, adapter: &wgpu::Adapter) -> wgpu::Limits {
        wgpu::Limits::downlevel_defaults().using_resolution(adapter.limits())
    }
}
