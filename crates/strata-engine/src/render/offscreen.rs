use anyhow::{Context, Result};
use image::RgbaImage;

use crate::device::Gpu;

use super::texture::ensure_fits;
use super::{DepthTexture, RenderCtx, RenderTarget};

/// Color + depth attachments rendered without a window, with pixel readback.
pub struct OffscreenTarget {
    color: wgpu::Texture,
    color_view: wgpu::TextureView,
    depth: DepthTexture,
    width: u32,
    height: u32,
}

impl OffscreenTarget {
    /// 8-bit sRGB so readback bytes match what a PNG of the scene would hold.
    pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Result<Self> {
        ensure_fits(device, width, height).context("cannot create offscreen target")?;

        let color = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("strata offscreen color"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::COLOR_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let color_view = color.create_view(&wgpu::TextureViewDescriptor::default());
        let depth = DepthTexture::new(device, width, height);

        Ok(Self {
            color,
            color_view,
            depth,
            width,
            height,
        })
    }

    /// Render context targeting this offscreen color format.
    pub fn ctx<'a>(&self, gpu: &'a Gpu) -> RenderCtx<'a> {
        RenderCtx::new(gpu.device(), gpu.queue(), Self::COLOR_FORMAT)
    }

    /// Wraps `encoder` with this target's attachments.
    pub fn target<'a>(&'a self, encoder: &'a mut wgpu::CommandEncoder) -> RenderTarget<'a> {
        RenderTarget::new(encoder, &self.color_view, self.depth.view())
    }

    /// Copies the color attachment back to the CPU.
    ///
    /// Blocks until the GPU has finished all submitted work.
    pub fn read_rgba(&self, gpu: &Gpu) -> Result<RgbaImage> {
        let unpadded_bpr = self.width * 4;
        let padded_bpr = padded_bytes_per_row(unpadded_bpr);

        let buffer = gpu.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some("strata readback buffer"),
            size: padded_bpr as u64 * self.height as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = gpu.create_encoder("strata readback encoder");
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.color,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bpr),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        gpu.submit(encoder);

        let slice = buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |res| {
            let _ = tx.send(res);
        });
        gpu.wait_idle()?;
        rx.recv()
            .context("readback callback dropped")?
            .context("failed to map readback buffer")?;

        let mut pixels = Vec::with_capacity((unpadded_bpr * self.height) as usize);
        {
            let mapped = slice.get_mapped_range();
            for row in mapped.chunks_exact(padded_bpr as usize) {
                pixels.extend_from_slice(&row[..unpadded_bpr as usize]);
            }
        }
        buffer.unmap();

        RgbaImage::from_raw(self.width, self.height, pixels)
            .context("readback size does not match target size")
    }
}

/// Rounds a row up to wgpu's copy alignment.
fn padded_bytes_per_row(unpadded: u32) -> u32 {
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_pad_to_copy_alignment() {
        assert_eq!(padded_bytes_per_row(4), 256);
        assert_eq!(padded_bytes_per_row(256), 256);
        assert_eq!(padded_bytes_per_row(257), 512);
        assert_eq!(padded_bytes_per_row(64 * 4), 256);
    }
}
