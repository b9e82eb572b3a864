//! Font loading and glyph drawing.

use crate::config::{CaptchaError, RenderOptions, Result};
use crate::render::canvas::Canvas;
use ab_glyph::{FontVec, PxScale};
use image::Rgba;
use imageproc::drawing::draw_text_mut;
use std::path::Path;

/// Fixed per-character advance used for title bands.
pub const TITLE_ADVANCE: i32 = 12;

/// A parsed font asset.
pub struct Glyphs {
    font: FontVec,
}

impl Glyphs {
    /// Reads and parses a TTF/OTF file.
    ///
    /// # Errors
    ///
    /// Returns [`CaptchaError::Font`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| CaptchaError::Font(format!("{}: {e}", path.display())))?;
        let font = FontVec::try_from_vec(bytes)
            .map_err(|e| CaptchaError::Font(format!("{}: {e}", path.display())))?;
        Ok(Self { font })
    }

    /// Loads the configured font, if any.
    ///
    /// # Errors
    ///
    /// Returns [`CaptchaError::Font`] if a configured font fails to load.
    pub fn from_options(options: &RenderOptions) -> Result<Option<Self>> {
        options.font_path.as_deref().map(Self::load).transpose()
    }

    /// Draws `text` with its top-left corner at `(x, y)`.
    pub fn draw(&self, canvas: &mut Canvas, text: &str, x: i32, y: i32, size: f32, color: Rgba<u8>) {
        draw_text_mut(
            canvas.image_mut(),
            color,
            x,
            y,
            PxScale::from(size.max(1.0)),
            &self.font,
            text,
        );
    }

    /// Draws `text` one character at a time, `advance` pixels apart.
    /// Returns the x position after the last character.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_spaced(
        &self,
        canvas: &mut Canvas,
        text: &str,
        x: i32,
        y: i32,
        size: f32,
        color: Rgba<u8>,
        advance: i32,
    ) -> i32 {
        let mut cursor = x;
        let mut buf = [0u8; 4];
        for ch in text.chars() {
            self.draw(canvas, ch.encode_utf8(&mut buf), cursor, y, size, color);
            cursor += advance;
        }
        cursor
    }
}
