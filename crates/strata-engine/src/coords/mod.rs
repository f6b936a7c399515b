//! Coordinate and transform types shared by the sprite shader's CPU side.
//!
//! World space is 2D with +Y up. Transforms are 3x3 matrices acting on
//! homogeneous points `(x, y, 1)`; the camera's view-projection maps world
//! space straight onto clip-space XY.

mod color;
mod mat3;
mod vec2;

pub use color::ColorRgba;
pub use mat3::Mat3;
pub use vec2::Vec2;
