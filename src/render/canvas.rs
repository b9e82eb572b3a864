//! Drawing surface and PNG output.

use crate::config::{CaptchaError, Result};
use base64::{Engine, engine::general_purpose::STANDARD};
use image::{ImageFormat, Rgba, RgbaImage, imageops};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use std::io::Cursor;
use std::path::Path;
use tracing::warn;

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Loads an image file as RGBA.
///
/// # Errors
///
/// Returns [`CaptchaError::Image`] carrying the underlying I/O or decode
/// error.
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|source| {
            warn!(path = %path.display(), error = %source, "Image load failed");
            CaptchaError::Image {
                path: path.display().to_string(),
                source,
            }
        })
}

/// Wraps encoded PNG bytes in a `data:` URI.
#[must_use]
pub fn to_data_uri(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}

/// RGBA drawing surface.
pub struct Canvas {
    img: RgbaImage,
}

impl Canvas {
    /// Creates a canvas filled white, or with `background` composited at the
    /// origin when given.
    ///
    /// # Errors
    ///
    /// Returns [`CaptchaError::Image`] if the background cannot be loaded.
    pub fn new(width: u32, height: u32, background: Option<&Path>) -> Result<Self> {
        let mut img = RgbaImage::from_pixel(width, height, WHITE);
        if let Some(path) = background {
            let bg = load_image(path)?;
            imageops::overlay(&mut img, &bg, 0, 0);
        }
        Ok(Self { img })
    }

    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.img.dimensions()
    }

    #[must_use]
    pub const fn image(&self) -> &RgbaImage {
        &self.img
    }

    pub fn image_mut(&mut self) -> &mut RgbaImage {
        &mut self.img
    }

    /// Alpha-composites `top` with its top-left corner at `(x, y)`.
    pub fn overlay(&mut self, top: &RgbaImage, x: i64, y: i64) {
        imageops::overlay(&mut self.img, top, x, y);
    }

    /// Fills a rectangle, ignoring empty sizes.
    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Rgba<u8>) {
        if width == 0 || height == 0 {
            return;
        }
        draw_filled_rect_mut(&mut self.img, Rect::at(x, y).of_size(width, height), color);
    }

    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgba<u8>) {
        draw_line_segment_mut(&mut self.img, from, to, color);
    }

    /// Encodes the canvas as PNG.
    ///
    /// # Errors
    ///
    /// Returns [`CaptchaError::Encode`] if the encoder rejects the image.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut png = Vec::new();
        self.img
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(CaptchaError::Encode)?;
        Ok(png)
    }
}

#[inline]
pub(crate) fn f32_to_i32(val: f32) -> i32 {
    let clamped = val.round().clamp(f32::from(i16::MIN), f32::from(i16::MAX));
    format!("{clamped:.0}").parse::<i32>().unwrap_or(0)
}

#[inline]
pub(crate) fn i32_to_f32(val: i32) -> f32 {
    f32::from(i16::try_from(val).unwrap_or(if val < 0 { i16::MIN } else { i16::MAX }))
}
