//! Sprite transform & depth-sort shader.
//!
//! The WGSL program lives in `shaders/sprite.wgsl`. This module holds the
//! host-side mirrors of its uniform blocks and vertex format, plus a CPU
//! implementation of both stages used for tests and host-side checks.
//!
//! Depth convention: a sprite's layer gap is `model.depth - camera.depth`.
//! Clip-space Z is `1 / (gap + 1)`, so larger layers sit farther away and the
//! reference layer itself lands on Z = 1.

mod stage;
mod uniforms;

pub use stage::{
    fragment_stage, layer_depth, layer_gap_is_valid, vertex_stage, VertexInput, VertexOutput,
};
pub use uniforms::{
    Camera, CameraUniform, Model, ModelUniform, SpriteVertex, UNIT_QUAD_INDICES,
    UNIT_QUAD_VERTICES,
};

/// WGSL source for the sprite pipeline.
pub const SHADER_SOURCE: &str = include_str!("shaders/sprite.wgsl");

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

pub const CAMERA_GROUP: u32 = 0;
pub const MODEL_GROUP: u32 = 1;
pub const TEXTURE_GROUP: u32 = 2;

#[cfg(test)]
mod tests {
    use super::*;

    fn parse() -> naga::Module {
        naga::front::wgsl::parse_str(SHADER_SOURCE).expect("sprite.wgsl parses")
    }

    #[test]
    fn shader_validates() {
        let module = parse();
        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator.validate(&module).expect("sprite.wgsl validates");
    }

    #[test]
    fn shader_exposes_both_entry_points() {
        let module = parse();
        let vs = module.entry_points.iter().find(|e| e.name == VERTEX_ENTRY);
        let fs = module.entry_points.iter().find(|e| e.name == FRAGMENT_ENTRY);
        assert_eq!(vs.map(|e| e.stage), Some(naga::ShaderStage::Vertex));
        assert_eq!(fs.map(|e| e.stage), Some(naga::ShaderStage::Fragment));
    }

    #[test]
    fn shader_bindings_match_host_layout() {
        let module = parse();
        let mut bindings: Vec<(u32, u32, String)> = module
            .global_variables
            .iter()
            .filter_map(|(_, var)| {
                let rb = var.binding.as_ref()?;
                Some((rb.group, rb.binding, var.name.clone().unwrap_or_default()))
            })
            .collect();
        bindings.sort();

        assert_eq!(
            bindings,
            vec![
                (CAMERA_GROUP, 0, "camera".to_string()),
                (MODEL_GROUP, 0, "model".to_string()),
                (TEXTURE_GROUP, 0, "t_diffuse".to_string()),
                (TEXTURE_GROUP, 1, "s_diffuse".to_string()),
            ]
        );
    }

    #[test]
    fn uniform_struct_sizes_match_wgsl() {
        let module = parse();
        let size_of = |name: &str| {
            module
                .types
                .iter()
                .find(|(_, ty)| ty.name.as_deref() == Some(name))
                .map(|(_, ty)| ty.inner.size(module.to_ctx()))
        };
        assert_eq!(size_of("CameraUniform"), Some(std::mem::size_of::<CameraUniform>() as u32));
        assert_eq!(size_of("ModelUniform"), Some(std::mem::size_of::<ModelUniform>() as u32));
    }
}
