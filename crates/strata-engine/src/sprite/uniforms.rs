use bytemuck::{Pod, Zeroable};

use crate::coords::{Mat3, Vec2};

// ── camera ────────────────────────────────────────────────────────────────

/// Per-frame camera state: view-projection plus the reference layer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub view_proj: Mat3,
    pub depth: i32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            view_proj: Mat3::IDENTITY,
            depth: 0,
        }
    }
}

impl Camera {
    #[inline]
    pub const fn new(view_proj: Mat3, depth: i32) -> Self {
        Self { view_proj, depth }
    }

    /// Camera looking at `[left, right] x [bottom, top]` from layer `depth`.
    pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, depth: i32) -> Self {
        Self::new(Mat3::orthographic(left, right, bottom, top), depth)
    }

    #[inline]
    pub fn to_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_proj.to_std140(),
            depth: self.depth,
            _pad: [0; 3],
        }
    }
}

/// `CameraUniform` as laid out in the uniform address space (64 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 3],
    pub depth: i32,
    pub _pad: [u32; 3],
}

// ── model ─────────────────────────────────────────────────────────────────

/// Per-drawable state: local-to-world transform, layer and quad extents.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Model {
    pub transform: Mat3,
    pub depth: i32,
    pub width: f32,
    pub height: f32,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            transform: Mat3::IDENTITY,
            depth: 0,
            width: 1.0,
            height: 1.0,
        }
    }
}

impl Model {
    #[inline]
    pub const fn new(transform: Mat3, depth: i32, width: f32, height: f32) -> Self {
        Self {
            transform,
            depth,
            width,
            height,
        }
    }

    /// Axis-aligned sprite of `size` centered at `center`.
    pub fn at(center: Vec2, size: Vec2, depth: i32) -> Self {
        Self::new(Mat3::translation(center), depth, size.x, size.y)
    }

    #[inline]
    pub fn to_uniform(&self) -> ModelUniform {
        ModelUniform {
            transform: self.transform.to_std140(),
            depth: self.depth,
            width: self.width,
            height: self.height,
            _pad: 0,
        }
    }
}

/// `ModelUniform` as laid out in the uniform address space (64 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ModelUniform {
    pub transform: [[f32; 4]; 3],
    pub depth: i32,
    pub width: f32,
    pub height: f32,
    pub _pad: u32,
}

// ── vertex ────────────────────────────────────────────────────────────────

/// Unit-quad vertex: location 0 = position, location 1 = texture coordinates.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
}

impl SpriteVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x2  // tex_coords
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Quad centered on the origin spanning `[-0.5, 0.5]`.
///
/// V is flipped against +Y so image row 0 shows at the top of the sprite.
pub const UNIT_QUAD_VERTICES: [SpriteVertex; 4] = [
    SpriteVertex {
        position: [-0.5, -0.5],
        tex_coords: [0.0, 1.0],
    },
    SpriteVertex {
        position: [0.5, -0.5],
        tex_coords: [1.0, 1.0],
    },
    SpriteVertex {
        position: [0.5, 0.5],
        tex_coords: [1.0, 0.0],
    },
    SpriteVertex {
        position: [-0.5, 0.5],
        tex_coords: [0.0, 0.0],
    },
];

pub const UNIT_QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];
