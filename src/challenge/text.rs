//! Distorted-text challenge.
//!
//! The shuffled sequence is joined and drawn glyph by glyph with random
//! colour, size and baseline. `#` and `b` are drawn small and raised, and
//! pull the following glyph in closer.

use crate::challenge::sequence::SequenceBoard;
use crate::challenge::{Challenge, Solution};
use crate::config::{CaptchaError, RenderOptions, Result};
use crate::render::Glyphs;
use crate::render::canvas::{f32_to_i32, i32_to_f32};
use image::Rgba;
use rand::Rng;
use tracing::debug;

const PALETTE: [Rgba<u8>; 5] = [
    Rgba([120, 120, 50, 255]),
    Rgba([120, 126, 60, 255]),
    Rgba([120, 132, 40, 255]),
    Rgba([120, 120, 50, 255]),
    Rgba([120, 127, 14, 255]),
];

const GLYPH_ADVANCE: i32 = 14;
const COMPRESSED_ADVANCE: i32 = 8;
const START_X: i32 = 2;

fn is_marker(ch: char) -> bool {
    ch == '#' || ch == 'b'
}

/// Random styling of one drawn glyph, relative to the configured font size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphStyle {
    pub ch: char,
    pub color: usize,
    pub size_delta: i32,
    pub advance: i32,
    pub baseline: i32,
}

fn style_glyphs<R: Rng>(rng: &mut R, text: &str) -> Vec<GlyphStyle> {
    let mut styles = Vec::new();
    let mut after_marker = false;
    for ch in text.chars() {
        let marker = is_marker(ch);
        let color = rng.random_range(0..PALETTE.len());
        let mut size_delta = rng.random_range(0..=2);
        let mut advance = GLYPH_ADVANCE + rng.random_range(-2..2);
        let mut baseline = rng.random_range(12..18);

        if marker {
            size_delta = rng.random_range(-6..-2);
            baseline = rng.random_range(8..14);
        }
        if after_marker {
            advance = COMPRESSED_ADVANCE + rng.random_range(-5..0);
        }

        styles.push(GlyphStyle {
            ch,
            color,
            size_delta,
            advance,
            baseline,
        });
        after_marker = marker;
    }
    styles
}

/// Shuffled characters drawn as a noisy line of text.
pub struct TextChallenge {
    board: SequenceBoard,
    styles: Vec<GlyphStyle>,
    options: RenderOptions,
}

impl TextChallenge {
    /// Builds a challenge using the thread-local generator.
    ///
    /// # Errors
    ///
    /// Returns [`CaptchaError::InvalidConfig`] if `slot_count` differs from
    /// the number of items.
    pub fn new(title: impl Into<String>, items: &[String], slot_count: usize) -> Result<Self> {
        Self::with_rng(&mut rand::rng(), title, items, slot_count)
    }

    /// Builds a challenge from an explicit random source.
    ///
    /// # Errors
    ///
    /// Returns [`CaptchaError::InvalidConfig`] if `slot_count` differs from
    /// the number of items.
    pub fn with_rng<R: Rng>(
        rng: &mut R,
        title: impl Into<String>,
        items: &[String],
        slot_count: usize,
    ) -> Result<Self> {
        let board = SequenceBoard::new(rng, title, items, slot_count)?;
        let styles = style_glyphs(rng, &board.text().concat());
        debug!(text = ?board.text(), glyphs = styles.len(), "Text challenge built");
        Ok(Self {
            board,
            styles,
            options: RenderOptions::default(),
        })
    }

    /// Characters in displayed order.
    #[must_use]
    pub fn text(&self) -> Vec<String> {
        self.board.text()
    }

    #[must_use]
    pub fn styles(&self) -> &[GlyphStyle] {
        &self.styles
    }
}

impl Challenge for TextChallenge {
    fn solution(&self) -> Solution {
        Solution::Text(self.text())
    }

    fn render(&self) -> Result<Vec<u8>> {
        let glyphs = Glyphs::from_options(&self.options)?
            .ok_or_else(|| CaptchaError::Font("text challenge requires a font".to_string()))?;

        let (mut canvas, (origin_x, origin_y)) =
            self.board.begin(&self.options, Some(&glyphs))?;

        let mut x = origin_x + START_X;
        let base_size = self.options.font_size;
        for style in &self.styles {
            x += style.advance;
            let size = base_size + i32_to_f32(style.size_delta);
            let mut buf = [0u8; 4];
            glyphs.draw(
                &mut canvas,
                style.ch.encode_utf8(&mut buf),
                x,
                origin_y + style.baseline - f32_to_i32(size),
                size,
                PALETTE[style.color],
            );
        }

        canvas.encode_png()
    }

    fn set_options(&mut self, options: RenderOptions) {
        self.options = options;
    }

    fn options(&self) -> &RenderOptions {
        &self.options
    }
}
