use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

use image::codecs::gif::GifDecoder;
use image::AnimationDecoder;
use image::{DynamicImage, ImageFormat, RgbaImage};
use resvg::{tiny_skia, usvg};
use thiserror::Error;

/// Longest side, in pixels, an SVG icon is rasterized to.
pub const SVG_RASTER_SIZE: u32 = 128;

#[derive(Debug, Error)]
pub enum IconLoadError {
    #[error("failed to read icon {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to decode icon {path:?}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to parse SVG icon {path:?}")]
    Svg {
        path: PathBuf,
        #[source]
        source: usvg::Error,
    },
    #[error("SVG has no drawable area: {0:?}")]
    EmptySvg(PathBuf),
    #[error("GIF has no frames: {0:?}")]
    EmptyGif(PathBuf),
}

/// Decode an icon file. Animated GIFs yield their first frame; SVGs are
/// rasterized to fit `SVG_RASTER_SIZE`.
pub fn open_image(path: &Path) -> Result<DynamicImage, IconLoadError> {
    let bytes = std::fs::read(path).map_err(|source| IconLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if is_svg(path, &bytes) {
        return rasterize_svg(path, &bytes);
    }
    let decode_err = |source: image::ImageError| IconLoadError::Decode {
        path: path.to_path_buf(),
        source,
    };
    let format = image::guess_format(&bytes).ok();

    if format == Some(ImageFormat::Gif) {
        let decoder = GifDecoder::new(Cursor::new(bytes)).map_err(decode_err)?;
        let mut frames = decoder.into_frames();
        if let Some(frame) = frames.next() {
            let frame = frame.map_err(decode_err)?;
            return Ok(DynamicImage::ImageRgba8(frame.into_buffer()));
        }
        return Err(IconLoadError::EmptyGif(path.to_path_buf()));
    }

    match format {
        Some(fmt) => image::load_from_memory_with_format(&bytes, fmt).map_err(decode_err),
        None => image::load_from_memory(&bytes).map_err(decode_err),
    }
}

fn is_svg(path: &Path, bytes: &[u8]) -> bool {
    let by_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
    if by_extension {
        return true;
    }
    let start = bytes.trim_ascii_start();
    let head = &start[..start.len().min(1024)];
    head.starts_with(b"<svg")
        || (head.starts_with(b"<?xml") && head.windows(4).any(|w| w == b"<svg"))
}

fn rasterize_svg(path: &Path, bytes: &[u8]) -> Result<DynamicImage, IconLoadError> {
    let tree = usvg::Tree::from_data(bytes, &usvg::Options::default()).map_err(|source| {
        IconLoadError::Svg {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let size = tree.size();
    let longest = size.width().max(size.height());
    if longest <= 0.0 {
        return Err(IconLoadError::EmptySvg(path.to_path_buf()));
    }
    let scale = SVG_RASTER_SIZE as f32 / longest;
    let width = (size.width() * scale).round().max(1.0) as u32;
    let height = (size.height() * scale).round().max(1.0) as u32;

    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| IconLoadError::EmptySvg(path.to_path_buf()))?;
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    // tiny-skia keeps premultiplied alpha; textures expect straight alpha.
    let mut pixels = Vec::with_capacity(pixmap.pixels().len() * 4);
    for pixel in pixmap.pixels() {
        let color = pixel.demultiply();
        pixels.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
    }
    RgbaImage::from_raw(width, height, pixels)
        .map(DynamicImage::ImageRgba8)
        .ok_or_else(|| IconLoadError::EmptySvg(path.to_path_buf()))
}
