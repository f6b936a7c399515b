use std::path::Path;

use anyhow::Result;
use image::RgbaImage;
use wgpu::util::DeviceExt;

use crate::coords::ColorRgba;
use crate::scene::DrawList;
use crate::sprite::{
    self, Camera, CameraUniform, Model, ModelUniform, SpriteVertex, UNIT_QUAD_INDICES,
    UNIT_QUAD_VERTICES,
};

use super::texture::{decode_image, open_image};
use super::{
    CameraBinding, DepthTexture, ModelBinding, RenderCtx, RenderTarget, SamplerConfig,
    SpriteTexture,
};

/// Sprite pipeline configuration.
#[derive(Debug, Clone)]
pub struct SpriteRendererConfig {
    /// Depth test. Farther layers produce smaller Z, so the default keeps the
    /// larger value.
    pub depth_compare: wgpu::CompareFunction,
    pub depth_write: bool,
    /// Value the depth attachment is cleared to when a pass clears.
    pub clear_depth: f32,
    /// Sampler used by textures created through this renderer.
    pub sampler: SamplerConfig,
}

impl Default for SpriteRendererConfig {
    fn default() -> Self {
        Self {
            depth_compare: wgpu::CompareFunction::GreaterEqual,
            depth_write: true,
            clear_depth: 0.0,
            sampler: SamplerConfig::default(),
        }
    }
}

/// One sprite: its model binding and the texture it samples.
#[derive(Copy, Clone)]
pub struct SpriteDraw<'a> {
    pub model: &'a ModelBinding,
    pub texture: &'a SpriteTexture,
}

/// Draw list of sprites for one pass.
pub type SpriteList<'a> = DrawList<SpriteDraw<'a>>;

impl<'a> DrawList<SpriteDraw<'a>> {
    /// Records a sprite on its model's layer.
    #[inline]
    pub fn push_sprite(&mut self, model: &'a ModelBinding, texture: &'a SpriteTexture) {
        self.push(model.model().depth, SpriteDraw { model, texture });
    }
}

/// Depth-layered textured sprite renderer.
///
/// Bind group layouts are created up front so bindings can be made before the
/// first frame; the pipeline is built lazily for the target's color format.
pub struct SpriteRenderer {
    config: SpriteRendererConfig,

    camera_layout: wgpu::BindGroupLayout,
    model_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    quad_vbo: wgpu::Buffer,
    quad_ibo: wgpu::Buffer,

    warned_invalid_gap: bool,
}

impl SpriteRenderer {
    pub fn new(device: &wgpu::Device, config: SpriteRendererConfig) -> Self {
        let camera_layout = uniform_layout::<CameraUniform>(device, "strata camera bgl");
        let model_layout = uniform_layout::<ModelUniform>(device, "strata model bgl");

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("strata texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let quad_vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("strata quad vbo"),
            contents: bytemuck::cast_slice(&UNIT_QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let quad_ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("strata quad ibo"),
            contents: bytemuck::cast_slice(&UNIT_QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            config,
            camera_layout,
            model_layout,
            texture_layout,
            pipeline_format: None,
            pipeline: None,
            quad_vbo,
            quad_ibo,
            warned_invalid_gap: false,
        }
    }

    pub fn create_camera(&self, device: &wgpu::Device, camera: Camera) -> CameraBinding {
        CameraBinding::new(device, &self.camera_layout, camera)
    }

    pub fn create_model(&self, device: &wgpu::Device, model: Model) -> ModelBinding {
        ModelBinding::new(device, &self.model_layout, model)
    }

    /// Uploads `image` with this renderer's sampler settings.
    pub fn create_texture(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &RgbaImage,
        label: &str,
    ) -> Result<SpriteTexture> {
        SpriteTexture::from_image(
            device,
            queue,
            &self.texture_layout,
            image,
            &self.config.sampler,
            label,
        )
    }

    /// Decodes PNG bytes and uploads them.
    pub fn create_texture_from_png(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bytes: &[u8],
        label: &str,
    ) -> Result<SpriteTexture> {
        let image = decode_image(bytes)?;
        self.create_texture(device, queue, &image, label)
    }

    /// Loads an image file and uploads it, labelled with the file name.
    pub fn load_texture(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: impl AsRef<Path>,
    ) -> Result<SpriteTexture> {
        let path = path.as_ref();
        let image = open_image(path)?;
        let label = path.display().to_string();
        self.create_texture(device, queue, &image, &label)
    }

    /// Renders `sprites` into `target` as seen from `camera`.
    ///
    /// `clear = Some(color)` clears color and depth first; `None` loads both,
    /// so several calls can share one depth buffer.
    ///
    /// Sprites whose layer is in front of the camera's reference layer
    /// (`model.depth - camera.depth + 1 < 1`) are skipped, with a one-time warning.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        camera: &CameraBinding,
        sprites: &mut SpriteList<'_>,
        clear: Option<ColorRgba>,
    ) {
        self.ensure_pipeline(ctx);

        let camera_depth = camera.camera().depth;
        let mut draws: Vec<SpriteDraw<'_>> = Vec::with_capacity(sprites.len());
        let mut skipped = 0usize;
        for item in sprites.iter_in_paint_order() {
            if sprite::layer_gap_is_valid(item.payload.model.model().depth, camera_depth) {
                draws.push(item.payload);
            } else {
                skipped += 1;
            }
        }

        if skipped > 0 && !self.warned_invalid_gap {
            log::warn!(
                "SpriteRenderer: skipped {skipped} sprite(s) in front of camera layer \
                 {camera_depth}"
            );
            self.warned_invalid_gap = true;
        }

        if draws.is_empty() && clear.is_none() {
            return;
        }

        let Some(pipeline) = self.pipeline.as_ref() else {
            return;
        };

        let (color_load, depth_load) = match clear {
            Some(c) => (
                wgpu::LoadOp::Clear(c.to_wgpu()),
                wgpu::LoadOp::Clear(self.config.clear_depth),
            ),
            None => (wgpu::LoadOp::Load, wgpu::LoadOp::Load),
        };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("strata sprite pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: color_load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: target.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: depth_load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        if draws.is_empty() {
            return;
        }

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(sprite::CAMERA_GROUP, camera.bind_group(), &[]);
        rpass.set_vertex_buffer(0, self.quad_vbo.slice(..));
        rpass.set_index_buffer(self.quad_ibo.slice(..), wgpu::IndexFormat::Uint16);

        let index_count = UNIT_QUAD_INDICES.len() as u32;
        for draw in &draws {
            rpass.set_bind_group(sprite::MODEL_GROUP, draw.model.bind_group(), &[]);
            rpass.set_bind_group(sprite::TEXTURE_GROUP, draw.texture.bind_group(), &[]);
            rpass.draw_indexed(0..index_count, 0, 0..1);
        }
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.color_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("strata sprite shader"),
            source: wgpu::ShaderSource::Wgsl(sprite::SHADER_SOURCE.into()),
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("strata sprite pipeline layout"),
            bind_group_layouts: &[&self.camera_layout, &self.model_layout, &self.texture_layout],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("strata sprite pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some(sprite::VERTEX_ENTRY),
                compilation_options: Default::default(),
                buffers: &[SpriteVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some(sprite::FRAGMENT_ENTRY),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.color_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: Some(wgpu::DepthStencilState {
                format: DepthTexture::FORMAT,
                depth_write_enabled: self.config.depth_write,
                depth_compare: self.config.depth_compare,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("SpriteRenderer: built pipeline for {:?}", ctx.color_format);

        self.pipeline_format = Some(ctx.color_format);
        self.pipeline = Some(pipeline);
    }
}

fn uniform_layout<T>(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<T>() as u64),
            },
            count: None,
        }],
    })
}
