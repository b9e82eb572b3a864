//! Music-staff challenge.
//!
//! Note codes are shuffled, resolved to staff positions and drawn as small
//! coloured heads on five hand-drawn-looking lines. The solver reads the
//! notes back in displayed order.

use crate::challenge::sequence::SequenceBoard;
use crate::challenge::{Challenge, Solution};
use crate::config::{CaptchaError, RenderOptions, Result};
use crate::core::staff::{DASH_STEP, NotePlacement, StaffLayout, place_notes};
use crate::notation::{NotationTable, TrebleStaff};
use crate::render::canvas::i32_to_f32;
use crate::render::{Canvas, Glyphs, load_image};
use image::Rgba;
use rand::Rng;
use std::path::PathBuf;
use tracing::debug;

const NOTE_PALETTE: [Rgba<u8>; 5] = [
    Rgba([0x00, 0x64, 0x00, 0xff]),
    Rgba([0x00, 0x00, 0x8b, 0xff]),
    Rgba([0x55, 0x6b, 0x2f, 0xff]),
    Rgba([0x00, 0x64, 0x00, 0xff]),
    Rgba([0x00, 0x64, 0x00, 0xff]),
];
const LINE_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);
const CLEF_COLOR: Rgba<u8> = Rgba([90, 50, 160, 255]);

const NOTE_WIDTH: u32 = 5;
const NOTE_HEIGHT: u32 = 8;
const DASH_LENGTH: f32 = 2.0;
const ACCIDENTAL_SIZE: f32 = 10.0;
const CLEF_IMAGE_AT: (i64, i64) = (10, 60);
const CLEF_BLOCK_AT: (i32, i32) = (10, 40);
const CLEF_BLOCK_SIZE: (u32, u32) = (30, 55);

/// Shuffled notes drawn on a jittered staff.
pub struct MusicChallenge {
    board: SequenceBoard,
    staff: StaffLayout,
    notes: Vec<NotePlacement>,
    colors: Vec<usize>,
    lead_in: i32,
    clef: Option<PathBuf>,
    options: RenderOptions,
}

impl MusicChallenge {
    /// Builds a treble-staff challenge using the thread-local generator.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CaptchaError::InvalidConfig`] on a slot count
    /// mismatch and [`crate::CaptchaError::UnknownNote`] for unknown codes.
    pub fn new(
        title: impl Into<String>,
        codes: &[String],
        clef: Option<PathBuf>,
        slot_count: usize,
    ) -> Result<Self> {
        Self::with_rng(&mut rand::rng(), title, codes, clef, slot_count)
    }

    /// Builds a treble-staff challenge from an explicit random source.
    ///
    /// # Errors
    ///
    /// Same as [`MusicChallenge::new`].
    pub fn with_rng<R: Rng>(
        rng: &mut R,
        title: impl Into<String>,
        codes: &[String],
        clef: Option<PathBuf>,
        slot_count: usize,
    ) -> Result<Self> {
        Self::with_table(rng, &TrebleStaff, title, codes, clef, slot_count)
    }

    /// Builds a challenge against a custom notation table.
    ///
    /// # Errors
    ///
    /// Same as [`MusicChallenge::new`].
    pub fn with_table<R: Rng>(
        rng: &mut R,
        table: &dyn NotationTable,
        title: impl Into<String>,
        codes: &[String],
        clef: Option<PathBuf>,
        slot_count: usize,
    ) -> Result<Self> {
        let board = SequenceBoard::new(rng, title, codes, slot_count)?;
        let staff = StaffLayout::generate(rng);
        let notes = place_notes(rng, &staff, &board.text(), table)?;
        let colors = notes
            .iter()
            .map(|_| rng.random_range(0..NOTE_PALETTE.len()))
            .collect();
        let lead_in = rng.random_range(30..50);

        debug!(codes = ?board.text(), lead_in, "Music challenge built");

        Ok(Self {
            board,
            staff,
            notes,
            colors,
            lead_in,
            clef,
            options: RenderOptions::default(),
        })
    }

    /// Note codes in displayed order.
    #[must_use]
    pub fn text(&self) -> Vec<String> {
        self.board.text()
    }

    #[must_use]
    pub fn notes(&self) -> &[NotePlacement] {
        &self.notes
    }

    #[must_use]
    pub const fn staff(&self) -> &StaffLayout {
        &self.staff
    }

    fn draw_staff(&self, canvas: &mut Canvas, origin: (i32, i32)) {
        let left = i32_to_f32(origin.0);
        for (line, dashes) in self.staff.lines().iter().zip(self.staff.dash_jitter()) {
            let mut x = left;
            for jitter in dashes {
                let y = i32_to_f32(origin.1 + line + jitter);
                canvas.line((x, y), (x + DASH_LENGTH, y), LINE_COLOR);
                x += DASH_STEP;
            }
        }
    }

    fn draw_notes(&self, canvas: &mut Canvas, glyphs: Option<&Glyphs>, origin: (i32, i32)) {
        let left = origin.0 + self.lead_in;
        for (note, color) in self.notes.iter().zip(&self.colors) {
            if let (Some(glyphs), Some((marker, gx, gy))) = (glyphs, note.accidental_anchor()) {
                let mut buf = [0u8; 4];
                glyphs.draw(
                    canvas,
                    marker.encode_utf8(&mut buf),
                    left + gx,
                    origin.1 + gy - 10,
                    ACCIDENTAL_SIZE,
                    LINE_COLOR,
                );
            }
            canvas.fill_rect(
                left + note.x,
                origin.1 + note.y,
                NOTE_WIDTH,
                NOTE_HEIGHT,
                NOTE_PALETTE[*color],
            );
        }
    }

    fn draw_clef(&self, canvas: &mut Canvas) -> Result<()> {
        match &self.clef {
            Some(path) => {
                let clef = load_image(path)?;
                canvas.overlay(&clef, CLEF_IMAGE_AT.0, CLEF_IMAGE_AT.1);
            }
            None => canvas.fill_rect(
                CLEF_BLOCK_AT.0,
                CLEF_BLOCK_AT.1,
                CLEF_BLOCK_SIZE.0,
                CLEF_BLOCK_SIZE.1,
                CLEF_COLOR,
            ),
        }
        Ok(())
    }
}

impl Challenge for MusicChallenge {
    fn solution(&self) -> Solution {
        Solution::Text(self.text())
    }

    fn render(&self) -> Result<Vec<u8>> {
        let glyphs = Glyphs::from_options(&self.options)?;
        if glyphs.is_none() && self.notes.iter().any(|note| note.accidental.is_some()) {
            return Err(CaptchaError::Font(
                "accidental markers require a font".to_string(),
            ));
        }
        let (mut canvas, origin) = self.board.begin(&self.options, glyphs.as_ref())?;

        self.draw_staff(&mut canvas, origin);
        self.draw_notes(&mut canvas, glyphs.as_ref(), origin);
        self.draw_clef(&mut canvas)?;

        canvas.encode_png()
    }

    fn set_options(&mut self, options: RenderOptions) {
        self.options = options;
    }

    fn options(&self) -> &RenderOptions {
        &self.options
    }
}
