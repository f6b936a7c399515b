use std::path::Path;

use anyhow::{Context, Result};
use image::RgbaImage;

/// Sampler settings for sprite textures.
///
/// Defaults to nearest filtering with clamp-to-edge addressing, which is what
/// `sprite::fragment_stage` reproduces on the CPU.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SamplerConfig {
    pub filter: wgpu::FilterMode,
    pub address_mode: wgpu::AddressMode,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            filter: wgpu::FilterMode::Nearest,
            address_mode: wgpu::AddressMode::ClampToEdge,
        }
    }
}

impl SamplerConfig {
    pub fn linear() -> Self {
        Self {
            filter: wgpu::FilterMode::Linear,
            ..Self::default()
        }
    }

    fn descriptor<'a>(&self, label: &'a str) -> wgpu::SamplerDescriptor<'a> {
        wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: self.address_mode,
            address_mode_v: self.address_mode,
            address_mode_w: self.address_mode,
            mag_filter: self.filter,
            min_filter: self.filter,
            ..Default::default()
        }
    }
}

/// A sprite texture and its group 2 bind group (texture view + sampler).
pub struct SpriteTexture {
    bind_group: wgpu::BindGroup,
}

impl SpriteTexture {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    pub(super) fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        image: &RgbaImage,
        sampler: &SamplerConfig,
        label: &str,
    ) -> Result<Self> {
        let (width, height) = image.dimensions();
        ensure_fits(device, width, height)
            .with_context(|| format!("cannot create texture {label:?}"))?;

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&sampler.descriptor(label));

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        log::debug!("uploaded sprite texture {label:?} ({width}x{height})");
        Ok(Self { bind_group })
    }

    pub(super) fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

/// Checks a 2D texture size against zero and the device's dimension limit.
///
/// An oversized texture is a wgpu validation error, which panics under the
/// default error handler instead of returning.
pub(super) fn ensure_fits(device: &wgpu::Device, width: u32, height: u32) -> Result<()> {
    anyhow::ensure!(width > 0 && height > 0, "zero size ({width}x{height})");
    let max = device.limits().max_texture_dimension_2d;
    anyhow::ensure!(
        width <= max && height <= max,
        "{width}x{height} exceeds the device limit of {max} per side"
    );
    Ok(())
}

/// Decodes encoded image bytes (PNG) into RGBA8.
pub(super) fn decode_image(bytes: &[u8]) -> Result<RgbaImage> {
    let img = image::load_from_memory(bytes).context("failed to decode texture image")?;
    Ok(img.to_rgba8())
}

/// Reads and decodes an image file into RGBA8.
pub(super) fn open_image(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path)
        .with_context(|| format!("failed to load texture {}", path.display()))?;
    Ok(img.to_rgba8())
}
