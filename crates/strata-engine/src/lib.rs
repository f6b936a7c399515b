//! Strata engine crate.
//!
//! Depth-layered textured sprites on wgpu: the sprite shader and its CPU
//! reference, the host-side bindings that feed it, and a headless device for
//! offscreen rendering.

pub mod coords;
pub mod device;
pub mod logging;
pub mod render;
pub mod scene;
pub mod sprite;
