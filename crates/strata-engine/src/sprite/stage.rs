//! CPU implementation of `vs_main` / `fs_main`.
//!
//! Kept numerically identical to the WGSL so host code and tests can reason
//! about clip positions and depth ordering without a device.

use image::RgbaImage;

use crate::coords::Vec2;

use super::{Camera, Model, SpriteVertex};

/// Vertex stage input (unit-quad position + texture coordinates).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct VertexInput {
    pub position: Vec2,
    pub tex_coords: Vec2,
}

impl From<SpriteVertex> for VertexInput {
    fn from(v: SpriteVertex) -> Self {
        Self {
            position: v.position.into(),
            tex_coords: v.tex_coords.into(),
        }
    }
}

/// Vertex stage output. Depth is encoded in `clip_position[2]`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct VertexOutput {
    pub clip_position: [f32; 4],
    pub tex_coords: Vec2,
}

/// Pseudo-depth of a model layer relative to the camera layer.
///
/// The integer difference is taken before converting to `f32`. A gap of `-1`
/// divides by zero and yields `+inf`; see [`layer_gap_is_valid`].
#[inline]
pub fn layer_depth(model_depth: i32, camera_depth: i32) -> f32 {
    1.0 / (model_depth.wrapping_sub(camera_depth).wrapping_add(1)) as f32
}

/// Returns `true` when `model_depth - camera_depth + 1 >= 1` without `i32`
/// overflow, i.e. the reciprocal depth is finite and in `(0, 1]`.
#[inline]
pub fn layer_gap_is_valid(model_depth: i32, camera_depth: i32) -> bool {
    model_depth
        .checked_sub(camera_depth)
        .and_then(|gap| gap.checked_add(1))
        .is_some_and(|gap| gap >= 1)
}

/// Maps one unit-quad vertex to clip space.
pub fn vertex_stage(camera: &Camera, model: &Model, input: VertexInput) -> VertexOutput {
    let sized = input.position.scale(Vec2::new(model.width, model.height));
    let world = model.transform.mul_vec3([sized.x, sized.y, 1.0]);
    let clip = camera.view_proj.mul_vec3(world);

    VertexOutput {
        clip_position: [clip[0], clip[1], layer_depth(model.depth, camera.depth), 1.0],
        tex_coords: input.tex_coords,
    }
}

/// Samples `texture` at `tex_coords` the way a nearest, clamp-to-edge sampler does.
///
/// Returns transparent black for an empty texture.
pub fn fragment_stage(texture: &RgbaImage, tex_coords: Vec2) -> [u8; 4] {
    let (w, h) = texture.dimensions();
    if w == 0 || h == 0 {
        return [0; 4];
    }
    let x = nearest_texel(tex_coords.x, w);
    let y = nearest_texel(tex_coords.y, h);
    texture.get_pixel(x, y).0
}

fn nearest_texel(coord: f32, extent: u32) -> u32 {
    let t = (coord * extent as f32).floor();
    if t.is_nan() || t < 0.0 {
        0
    } else {
        (t as u32).min(extent - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Mat3;
    use crate::sprite::UNIT_QUAD_VERTICES;

    fn input(x: f32, y: f32) -> VertexInput {
        VertexInput {
            position: Vec2::new(x, y),
            tex_coords: Vec2::new(0.25, 0.75),
        }
    }

    // ── depth ─────────────────────────────────────────────────────────────

    #[test]
    fn reference_layer_sits_at_depth_one() {
        assert_eq!(layer_depth(4, 4), 1.0);
        assert_eq!(layer_depth(5, 4), 0.5);
        assert_eq!(layer_depth(13, 4), 0.1);
    }

    #[test]
    fn depth_is_finite_and_nonzero_away_from_the_pole() {
        for camera in [-50, -1, 0, 3, 100] {
            for gap in -40..40 {
                if gap == -1 {
                    continue;
                }
                let d = layer_depth(camera + gap, camera);
                assert!(d.is_finite(), "gap {gap}");
                assert_ne!(d, 0.0, "gap {gap}");
            }
        }
    }

    #[test]
    fn gap_of_minus_one_is_not_clamped() {
        assert_eq!(layer_depth(2, 3), f32::INFINITY);
        assert!(!layer_gap_is_valid(2, 3));
    }

    #[test]
    fn farther_layers_get_smaller_depth() {
        let camera = 2;
        let mut prev = layer_depth(camera, camera);
        for model in camera + 1..camera + 200 {
            let d = layer_depth(model, camera);
            assert!(d < prev, "layer {model}: {d} !< {prev}");
            prev = d;
        }
    }

    #[test]
    fn valid_gaps_stay_in_unit_range() {
        assert!(layer_gap_is_valid(0, 0));
        assert!(layer_gap_is_valid(10, -10));
        assert!(!layer_gap_is_valid(-1, 0));
        for gap in 0..100 {
            let d = layer_depth(gap, 0);
            assert!(d > 0.0 && d <= 1.0);
        }
    }

    #[test]
    fn overflowing_gaps_are_invalid() {
        // Wraps to -1 in i32, so the depth would be 1/0.
        assert!(!layer_gap_is_valid(i32::MAX, i32::MIN));
        assert!(!layer_gap_is_valid(i32::MAX, -1));
        assert!(!layer_gap_is_valid(i32::MIN, 1));
        assert!(layer_gap_is_valid(i32::MAX - 1, 0));

        for (model, camera) in [(i32::MAX, i32::MIN), (i32::MAX, 0), (0, i32::MIN + 1)] {
            if layer_gap_is_valid(model, camera) {
                let d = layer_depth(model, camera);
                assert!(d.is_finite() && d > 0.0 && d <= 1.0, "({model}, {camera}) -> {d}");
            }
        }
    }

    // ── vertex ────────────────────────────────────────────────────────────

    #[test]
    fn identity_transforms_pass_position_through() {
        let out = vertex_stage(&Camera::default(), &Model::default(), input(0.5, 0.5));
        assert_eq!(out.clip_position, [0.5, 0.5, 1.0, 1.0]);
    }

    #[test]
    fn extents_scale_before_the_model_transform() {
        let model = Model::new(Mat3::translation(Vec2::new(10.0, 0.0)), 0, 4.0, 2.0);
        let out = vertex_stage(&Camera::default(), &model, input(0.5, -0.5));
        assert_eq!(out.clip_position[..2], [12.0, -1.0]);
    }

    #[test]
    fn camera_applies_after_the_model() {
        let camera = Camera::new(Mat3::scale(Vec2::new(0.5, 0.5)), 0);
        let model = Model::new(Mat3::translation(Vec2::new(2.0, 2.0)), 0, 1.0, 1.0);
        let out = vertex_stage(&camera, &model, input(0.0, 0.0));
        assert_eq!(out.clip_position[..2], [1.0, 1.0]);
    }

    #[test]
    fn orthographic_camera_frames_a_sprite() {
        let camera = Camera::orthographic(0.0, 100.0, 0.0, 100.0, 0);
        let model = Model::at(Vec2::new(50.0, 50.0), Vec2::new(100.0, 100.0), 0);
        let corners: Vec<[f32; 4]> = UNIT_QUAD_VERTICES
            .iter()
            .map(|&v| vertex_stage(&camera, &model, v.into()).clip_position)
            .collect();
        let near = |a: f32, b: f32| (a - b).abs() < 1e-5;
        assert!(near(corners[0][0], -1.0) && near(corners[0][1], -1.0));
        assert!(near(corners[2][0], 1.0) && near(corners[2][1], 1.0));
    }

    #[test]
    fn texture_coordinates_pass_through() {
        let camera = Camera::orthographic(-3.0, 7.0, -1.0, 9.0, 2);
        let model = Model::new(Mat3::rotation(1.3), 9, 3.0, 0.5);
        for v in UNIT_QUAD_VERTICES {
            let vin = VertexInput::from(v);
            assert_eq!(vertex_stage(&camera, &model, vin).tex_coords, vin.tex_coords);
        }
    }

    #[test]
    fn depth_reflects_model_and_camera_layers() {
        let camera = Camera::new(Mat3::IDENTITY, 1);
        let near = Model { depth: 1, ..Model::default() };
        let far = Model { depth: 3, ..Model::default() };
        let zn = vertex_stage(&camera, &near, input(0.0, 0.0)).clip_position[2];
        let zf = vertex_stage(&camera, &far, input(0.0, 0.0)).clip_position[2];
        assert_eq!(zn, 1.0);
        assert!(zf < zn);
    }

    // ── fragment ──────────────────────────────────────────────────────────

    fn quadrants() -> RgbaImage {
        RgbaImage::from_fn(2, 2, |x, y| match (x, y) {
            (0, 0) => image::Rgba([255, 0, 0, 255]),
            (1, 0) => image::Rgba([0, 255, 0, 255]),
            (0, 1) => image::Rgba([0, 0, 255, 255]),
            _ => image::Rgba([255, 255, 255, 255]),
        })
    }

    #[test]
    fn nearest_lookup_returns_stored_texels() {
        let tex = quadrants();
        assert_eq!(fragment_stage(&tex, Vec2::new(0.25, 0.25)), [255, 0, 0, 255]);
        assert_eq!(fragment_stage(&tex, Vec2::new(0.75, 0.25)), [0, 255, 0, 255]);
        assert_eq!(fragment_stage(&tex, Vec2::new(0.25, 0.75)), [0, 0, 255, 255]);
        assert_eq!(fragment_stage(&tex, Vec2::new(0.75, 0.75)), [255, 255, 255, 255]);
    }

    #[test]
    fn out_of_range_coordinates_clamp_to_edge() {
        let tex = quadrants();
        assert_eq!(fragment_stage(&tex, Vec2::new(-3.0, -0.1)), [255, 0, 0, 255]);
        assert_eq!(fragment_stage(&tex, Vec2::new(1.0, 1.0)), [255, 255, 255, 255]);
        assert_eq!(fragment_stage(&tex, Vec2::new(f32::NAN, 9.0)), [0, 0, 255, 255]);
    }

    #[test]
    fn empty_texture_samples_transparent() {
        assert_eq!(fragment_stage(&RgbaImage::new(0, 0), Vec2::zero()), [0; 4]);
    }
}
