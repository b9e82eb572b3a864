//! Shuffled single-row board shared by the text and music challenges.

use crate::config::{CaptchaError, RenderOptions, Result};
use crate::core::shuffle::SlotMap;
use crate::render::font::TITLE_ADVANCE;
use crate::render::{Canvas, Glyphs};
use image::Rgba;
use rand::Rng;

const TITLE_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);
const TITLE_INSET: i32 = 2;

/// A titled, shuffled sequence laid out in one row of cells.
#[derive(Debug, Clone)]
pub struct SequenceBoard {
    title: String,
    slots: SlotMap<String>,
}

impl SequenceBoard {
    /// Shuffles `items` into `slot_count` slots.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CaptchaError::InvalidConfig`] if `slot_count`
    /// differs from the number of items.
    pub fn new<R: Rng>(
        rng: &mut R,
        title: impl Into<String>,
        items: &[String],
        slot_count: usize,
    ) -> Result<Self> {
        Ok(Self {
            title: title.into(),
            slots: SlotMap::shuffle(rng, items, slot_count)?,
        })
    }

    /// Items in displayed order.
    #[must_use]
    pub fn text(&self) -> Vec<String> {
        self.slots.ordered()
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub const fn slots(&self) -> &SlotMap<String> {
        &self.slots
    }

    /// Canvas size for `options`. Oversized geometry saturates.
    #[must_use]
    pub fn canvas_size(&self, options: &RenderOptions) -> (u32, u32) {
        let count = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        let width = count
            .saturating_mul(options.cell_width + options.gap)
            .saturating_add(options.gap)
            .saturating_add(count.saturating_sub(1).saturating_mul(options.padding));
        let height = options
            .cell_height
            .saturating_add(options.gap.saturating_mul(2))
            .saturating_add(options.header_height)
            .saturating_add(options.padding.saturating_mul(2));
        (width, height)
    }

    /// Creates the canvas, draws the title band and returns the top-left
    /// corner of the content area. An empty title leaves no band.
    ///
    /// # Errors
    ///
    /// Returns [`CaptchaError::Font`] for a non-empty title without a font,
    /// and [`CaptchaError::Image`] if the background fails to load.
    pub fn begin(
        &self,
        options: &RenderOptions,
        glyphs: Option<&Glyphs>,
    ) -> Result<(Canvas, (i32, i32))> {
        let title_glyphs = if self.title.is_empty() {
            None
        } else {
            Some(glyphs.ok_or_else(|| CaptchaError::Font("title requires a font".to_string()))?)
        };

        let (width, height) = self.canvas_size(options);
        let mut canvas = Canvas::new(width, height, options.background.as_deref())?;

        let padding = to_i32(options.padding);
        let mut origin = (padding, padding);
        if let Some(glyphs) = title_glyphs {
            glyphs.draw_spaced(
                &mut canvas,
                &self.title,
                padding + TITLE_INSET,
                padding,
                options.font_size,
                TITLE_COLOR,
                TITLE_ADVANCE,
            );
            origin.1 = origin.1.saturating_add(to_i32(options.header_height));
        }

        Ok((canvas, origin))
    }
}

pub(crate) fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
