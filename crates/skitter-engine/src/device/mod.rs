//! GPU device + surface management.
//!
//! Creates the wgpu adapter/device/queue, configures the surface (swapchain)
//! and hands out per-frame encoders.

mod gpu;

pub use gpu::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
