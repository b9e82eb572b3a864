//! Music staff geometry and note placement.
//!
//! The staff is five jittered lines. Each line and the space just above it
//! is a position, plus one space below the bottom line, giving eleven
//! vertical offsets stored bottom-up (largest pixel offset first).

use crate::config::{CaptchaError, Result};
use crate::notation::{Accidental, NotationTable};
use rand::Rng;
use tracing::debug;

pub const STAFF_LINES: usize = 5;
pub const STAFF_POSITIONS: usize = STAFF_LINES * 2 + 1;
pub const LINE_SPACING: i32 = 16;
pub const DASHES_PER_LINE: usize = 94;
pub const DASH_STEP: f32 = 2.5;

const NOTE_ADVANCE: i32 = 15;
const NOTE_RAISE: i32 = 5;
const ACCIDENTAL_RAISE: i32 = 4;
const ACCIDENTAL_GLYPH_DX: i32 = -7;
const ACCIDENTAL_GLYPH_DY: i32 = 5;

/// Jittered staff geometry, fixed once per challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffLayout {
    lines: [i32; STAFF_LINES],
    offsets: Vec<i32>,
    dash_jitter: Vec<Vec<i32>>,
}

impl StaffLayout {
    /// Draws line positions with 1-2px noise each, plus the per-dash wobble
    /// used when the lines are rendered.
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let mut lines = [0; STAFF_LINES];
        let mut offsets = Vec::with_capacity(STAFF_POSITIONS);
        let mut row = 0;
        for line in &mut lines {
            row += LINE_SPACING;
            *line = row + rng.random_range(1..=2);
            offsets.push(*line - LINE_SPACING / 2);
            offsets.push(*line);
        }
        offsets.push(lines[STAFF_LINES - 1] + LINE_SPACING / 2);
        offsets.sort_unstable_by(|a, b| b.cmp(a));

        let dash_jitter = (0..STAFF_LINES)
            .map(|_| {
                (0..DASHES_PER_LINE)
                    .map(|_| rng.random_range(0..2))
                    .collect()
            })
            .collect();

        Self {
            lines,
            offsets,
            dash_jitter,
        }
    }

    /// Vertical pixel offset of a staff position.
    #[must_use]
    pub fn offset(&self, position: usize) -> Option<i32> {
        self.offsets.get(position).copied()
    }

    /// All position offsets, bottom-up.
    #[must_use]
    pub fn offsets(&self) -> &[i32] {
        &self.offsets
    }

    /// The five line offsets, top-down.
    #[must_use]
    pub const fn lines(&self) -> &[i32; STAFF_LINES] {
        &self.lines
    }

    /// Vertical wobble of each dash, per line.
    #[must_use]
    pub fn dash_jitter(&self) -> &[Vec<i32>] {
        &self.dash_jitter
    }
}

/// Where one note head lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotePlacement {
    pub code: String,
    pub position: usize,
    pub x: i32,
    pub y: i32,
    pub accidental: Option<Accidental>,
}

impl NotePlacement {
    /// Glyph and top-left point of the accidental marker, if any.
    #[must_use]
    pub fn accidental_anchor(&self) -> Option<(char, i32, i32)> {
        self.accidental.map(|accidental| {
            (
                accidental.glyph(),
                self.x + ACCIDENTAL_GLYPH_DX,
                self.y + ACCIDENTAL_GLYPH_DY,
            )
        })
    }
}

/// Resolves every code to a staff position and pixel point, in order.
///
/// The horizontal cursor advances 15px plus 8-14px of jitter per note. A
/// note following an accidental advances only 3-7px past the base, since its
/// predecessor already carries a marker to its left.
///
/// # Errors
///
/// Returns [`CaptchaError::UnknownNote`] for a code the table cannot
/// resolve, and [`CaptchaError::InvalidConfig`] when the table yields no
/// usable staff position.
pub fn place_notes<R: Rng>(
    rng: &mut R,
    staff: &StaffLayout,
    codes: &[String],
    table: &dyn NotationTable,
) -> Result<Vec<NotePlacement>> {
    let mut placements = Vec::with_capacity(codes.len());
    let mut cursor = 0;
    let mut after_accidental = false;

    for code in codes {
        let note = table
            .note(code)
            .ok_or_else(|| CaptchaError::UnknownNote(code.clone()))?;

        let positions = table.staff_positions(&note.name);
        let position = match positions.as_slice() {
            [] => {
                return Err(CaptchaError::invalid(format!(
                    "note {} has no staff position",
                    note.name
                )));
            }
            [only] => *only,
            many => many[rng.random_range(0..many.len())],
        };
        let base = staff.offset(position).ok_or_else(|| {
            CaptchaError::invalid(format!("staff position {position} out of range"))
        })?;

        let y = if note.is_accidental() {
            base - ACCIDENTAL_RAISE
        } else {
            base - NOTE_RAISE
        };
        let jitter = if after_accidental {
            rng.random_range(3..8)
        } else {
            rng.random_range(8..15)
        };
        cursor += NOTE_ADVANCE + jitter;

        debug!(
            code = %code,
            note = %note.name,
            position,
            candidates = ?positions,
            x = cursor,
            y,
            "Note placed"
        );

        placements.push(NotePlacement {
            code: code.clone(),
            position,
            x: cursor,
            y,
            accidental: note.accidental,
        });
        after_accidental = note.is_accidental();
    }

    Ok(placements)
}
