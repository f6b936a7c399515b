//! GPU rendering subsystem.
//!
//! `SpriteRenderer` consumes a `scene::DrawList` of sprites and issues wgpu
//! commands. It owns the pipeline and the bind group layouts; the per-camera,
//! per-model and per-texture bindings it hands out are owned by the caller.
//!
//! Convention:
//! - world space is 2D, mapped to clip XY by the camera's view-projection
//! - depth comes from integer layers; farther layers get smaller Z
//! - depth is cleared to `0.0` and tested with `GreaterEqual` by default

mod bindings;
mod ctx;
mod depth;
mod offscreen;
mod sprite;
mod texture;

pub use bindings::{CameraBinding, ModelBinding};
pub use ctx::{RenderCtx, RenderTarget};
pub use depth::DepthTexture;
pub use offscreen::OffscreenTarget;
pub use sprite::{SpriteDraw, SpriteList, SpriteRenderer, SpriteRendererConfig};
pub use texture::{SamplerConfig, SpriteTexture};
