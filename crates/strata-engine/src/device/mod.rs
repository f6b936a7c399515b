//! GPU device management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - submitting recorded command buffers
//!
//! There is no surface here: rendering goes to offscreen targets owned by
//! `render`.

mod gpu;
mod init;

pub use gpu::Gpu;
pub use init::GpuInit;
