//! Renders a small layered sprite scene offscreen and writes it as PNG.
//!
//! Usage: `strata-snapshot [TEXTURE.png] [-o OUT.png] [--width W] [--height H]`
//!
//! Without a texture a checkerboard is generated. Three copies of the sprite
//! overlap on layers 0, 1 and 2; the layer-0 copy must end up on top.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use image::RgbaImage;

use strata_engine::coords::{ColorRgba, Mat3, Vec2};
use strata_engine::device::{Gpu, GpuInit};
use strata_engine::logging::{init_logging, LoggingConfig};
use strata_engine::render::{OffscreenTarget, SpriteList, SpriteRenderer, SpriteRendererConfig};
use strata_engine::sprite::{Camera, Model};

/// Renders three overlapping sprites on layers 0, 1 and 2 into a PNG.
#[derive(Debug, clap::Parser)]
#[command(version)]
struct Args {
    /// Sprite texture; a checkerboard is generated when omitted.
    texture: Option<PathBuf>,

    /// PNG file to write.
    #[arg(short, long, default_value = "snapshot.png")]
    output: PathBuf,

    /// Target width in pixels.
    #[arg(long, default_value_t = 320, value_parser = clap::value_parser!(u32).range(1..))]
    width: u32,

    /// Target height in pixels.
    #[arg(long, default_value_t = 240, value_parser = clap::value_parser!(u32).range(1..))]
    height: u32,
}

fn checkerboard(size: u32, cell: u32) -> RgbaImage {
    RgbaImage::from_fn(size, size, |x, y| {
        if (x / cell + y / cell) % 2 == 0 {
            image::Rgba([235, 235, 235, 255])
        } else {
            image::Rgba([40, 90, 200, 255])
        }
    })
}

fn tint(src: &RgbaImage, rgb: [u8; 3]) -> RgbaImage {
    let mut out = src.clone();
    for p in out.pixels_mut() {
        for (c, t) in p.0.iter_mut().zip(rgb) {
            *c = (u16::from(*c) * u16::from(t) / 255) as u8;
        }
    }
    out
}

fn run(args: Args) -> Result<()> {
    let gpu = Gpu::new_headless_blocking(GpuInit::default())?;
    let device = gpu.device();
    let queue = gpu.queue();

    let mut renderer = SpriteRenderer::new(device, SpriteRendererConfig::default());

    let base = match &args.texture {
        Some(path) => image::open(path)
            .with_context(|| format!("failed to load texture {}", path.display()))?
            .to_rgba8(),
        None => checkerboard(64, 8),
    };

    let textures = [
        renderer.create_texture(device, queue, &tint(&base, [255, 120, 120]), "front")?,
        renderer.create_texture(device, queue, &tint(&base, [120, 255, 120]), "middle")?,
        renderer.create_texture(device, queue, &tint(&base, [120, 120, 255]), "back")?,
    ];

    let (w, h) = (args.width as f32, args.height as f32);
    let camera = renderer.create_camera(device, Camera::orthographic(0.0, w, 0.0, h, 0));

    let side = w.min(h) * 0.5;
    let models = [
        Model::new(
            Mat3::from_scale_rotation_translation(
                Vec2::new(1.0, 1.0),
                0.2,
                Vec2::new(w * 0.4, h * 0.45),
            ),
            0,
            side,
            side,
        ),
        Model::at(Vec2::new(w * 0.5, h * 0.55), Vec2::new(side, side), 1),
        Model::at(Vec2::new(w * 0.6, h * 0.45), Vec2::new(side, side), 2),
    ]
    .map(|m| renderer.create_model(device, m));

    let mut sprites = SpriteList::new();
    for (model, texture) in models.iter().zip(&textures) {
        sprites.push_sprite(model, texture);
    }

    let target = OffscreenTarget::new(device, args.width, args.height)?;
    let ctx = target.ctx(&gpu);
    let mut encoder = gpu.create_encoder("strata snapshot encoder");
    {
        let mut rt = target.target(&mut encoder);
        let clear = ColorRgba::new(0.02, 0.02, 0.03, 1.0);
        renderer.render(&ctx, &mut rt, &camera, &mut sprites, Some(clear));
    }
    gpu.submit(encoder);

    let pixels = target.read_rgba(&gpu)?;
    pixels
        .save(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    log::info!(
        "wrote {}x{} snapshot to {}",
        args.width,
        args.height,
        args.output.display()
    );
    Ok(())
}

fn main() {
    init_logging(LoggingConfig::default());

    let args = Args::parse();
    if let Err(e) = run(args) {
        log::error!("snapshot failed: {e:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("strata-snapshot").chain(args.iter().copied()))
    }

    // ── arguments ─────────────────────────────────────────────────────────

    #[test]
    fn defaults_without_arguments() {
        let args = parse(&[]).expect("parses");
        assert_eq!(args.texture, None);
        assert_eq!(args.output, PathBuf::from("snapshot.png"));
        assert_eq!((args.width, args.height), (320, 240));
    }

    #[test]
    fn texture_output_and_size() {
        let args = parse(&["leaf.png", "-o", "out.png", "--width", "64", "--height", "32"])
            .expect("parses");
        assert_eq!(args.texture, Some(PathBuf::from("leaf.png")));
        assert_eq!(args.output, PathBuf::from("out.png"));
        assert_eq!((args.width, args.height), (64, 32));
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(parse(&["--width", "0"]).is_err());
        assert!(parse(&["--height", "0"]).is_err());
    }

    #[test]
    fn non_numeric_size_is_rejected() {
        assert!(parse(&["--width", "wide"]).is_err());
        assert!(parse(&["--height", "-3"]).is_err());
    }

    // ── images ────────────────────────────────────────────────────────────

    #[test]
    fn tint_scales_each_channel() {
        let src = RgbaImage::from_pixel(1, 1, image::Rgba([255, 200, 10, 255]));
        let out = tint(&src, [255, 120, 0]);
        // Alpha is zipped against three tint channels and stays untouched.
        assert_eq!(out.get_pixel(0, 0).0, [255, 94, 0, 255]);
    }

    #[test]
    fn checkerboard_alternates_cells() {
        let board = checkerboard(16, 8);
        assert_eq!(board.dimensions(), (16, 16));
        assert_eq!(board.get_pixel(0, 0), board.get_pixel(15, 15));
        assert_ne!(board.get_pixel(0, 0), board.get_pixel(8, 0));
        assert_eq!(board.get_pixel(7, 7), board.get_pixel(0, 0));
    }
}
