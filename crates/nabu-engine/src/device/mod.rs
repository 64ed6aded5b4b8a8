//! Window surface and GPU device.
//!
//! One [`Gpu`] per window: it owns the device, queue and swapchain, hands
//! out a [`GpuFrame`] per presented frame and recovers from surface loss.

mod gpu;
mod init;
mod surface;

pub use gpu::{Gpu, GpuFrame};
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
