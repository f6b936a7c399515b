//! Scene (draw stream) types.
//!
//! Responsibilities:
//! - record what to draw this frame without touching the GPU
//! - provide deterministic paint order (layer back-to-front + insertion order)

mod key;
mod layer;
mod list;

pub use key::SortKey;
pub use layer::Layer;
pub use list::{DrawItem, DrawList};
