use std::io::Cursor;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use image::codecs::gif::GifDecoder;
use image::AnimationDecoder;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};

/// An RGBA8 image ready to hand to the toolkit.
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Dimensions of the source before downscaling.
    pub natural_width: u32,
    pub natural_height: u32,
}

impl std::fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("natural_width", &self.natural_width)
            .field("natural_height", &self.natural_height)
            .finish_non_exhaustive()
    }
}

pub fn open_image(path: &Path) -> Result<DynamicImage> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read image: {:?}", path))?;
    let format = image::guess_format(&bytes).ok();

    // First frame only for animated GIFs
    if format == Some(ImageFormat::Gif) {
        let decoder = GifDecoder::new(Cursor::new(bytes))
            .with_context(|| format!("Failed to decode GIF: {:?}", path))?;
        let mut frames = decoder.into_frames();
        if let Some(frame) = frames.next() {
            let frame = frame.context("Failed to decode GIF frame")?;
            return Ok(DynamicImage::ImageRgba8(frame.into_buffer()));
        }
        return Err(anyhow!("GIF has no frames: {:?}", path));
    }

    match format {
        Some(fmt) => image::load_from_memory_with_format(&bytes, fmt)
            .with_context(|| format!("Failed to decode image: {:?}", path)),
        None => image::load_from_memory(&bytes)
            .with_context(|| format!("Failed to decode image: {:?}", path)),
    }
}

/// Decode `path` and downscale it so neither edge exceeds `max_edge`.
pub fn decode_preview(path: &Path, max_edge: u32) -> Result<DecodedImage> {
    let img = open_image(path)?;
    let (natural_width, natural_height) = img.dimensions();
    if natural_width == 0 || natural_height == 0 {
        return Err(anyhow!("Image has zero size: {:?}", path));
    }

    let max_edge = max_edge.max(1);
    let resized = if natural_width > max_edge || natural_height > max_edge {
        img.thumbnail(max_edge, max_edge)
    } else {
        img
    };
    let (width, height) = resized.dimensions();

    Ok(DecodedImage {
        rgba: resized.to_rgba8().into_raw(),
        width: width.max(1),
        height: height.max(1),
        natural_width,
        natural_height,
    })
}

pub fn read_dimensions(path: &Path) -> Result<(u32, u32)> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read image: {:?}", path))?;
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .context("Failed to guess image format")?;
    reader
        .into_dimensions()
        .with_context(|| format!("Failed to read dimensions: {:?}", path))
}
