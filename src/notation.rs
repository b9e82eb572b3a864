//! Note lookup used by the music challenge.
//!
//! A [`NotationTable`] resolves a note code to a [`Note`] and a note name to
//! the staff positions it may be drawn on. Positions count upward from the
//! space below the bottom staff line (position 0) to the space above the top
//! line (position 10).

/// Sharp or flat marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accidental {
    Sharp,
    Flat,
}

impl Accidental {
    /// Character drawn in front of the note head.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Sharp => '#',
            Self::Flat => 'b',
        }
    }

    const fn from_glyph(c: char) -> Option<Self> {
        match c {
            '#' => Some(Self::Sharp),
            'b' => Some(Self::Flat),
            _ => None,
        }
    }
}

/// A resolved note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// Display name, e.g. `C`, `F#`, `Bb`.
    pub name: String,
    /// Natural letter the note sits on.
    pub letter: char,
    pub accidental: Option<Accidental>,
}

impl Note {
    #[must_use]
    pub const fn is_accidental(&self) -> bool {
        self.accidental.is_some()
    }
}

/// Read-only note lookup.
pub trait NotationTable {
    /// Resolves a note code such as `C`, `#F` or `bB`.
    fn note(&self, code: &str) -> Option<Note>;

    /// Candidate staff positions for a note name.
    fn staff_positions(&self, name: &str) -> Vec<usize>;
}

/// Treble clef table covering D4 (below the staff) to G5 (above it).
#[derive(Debug, Clone, Copy, Default)]
pub struct TrebleStaff;

const SHARPS: &[char] = &['C', 'D', 'F', 'G', 'A'];
const FLATS: &[char] = &['D', 'E', 'G', 'A', 'B'];

impl NotationTable for TrebleStaff {
    fn note(&self, code: &str) -> Option<Note> {
        let mut chars = code.chars();
        let (accidental, letter) = match (chars.next()?, chars.next(), chars.next()) {
            (letter, None, None) => (None, letter),
            (marker, Some(letter), None) => (Some(Accidental::from_glyph(marker)?), letter),
            _ => return None,
        };

        if !('A'..='G').contains(&letter) {
            return None;
        }
        let name = match accidental {
            None => letter.to_string(),
            Some(Accidental::Sharp) if SHARPS.contains(&letter) => format!("{letter}#"),
            Some(Accidental::Flat) if FLATS.contains(&letter) => format!("{letter}b"),
            Some(_) => return None,
        };

        Some(Note {
            name,
            letter,
            accidental,
        })
    }

    fn staff_positions(&self, name: &str) -> Vec<usize> {
        match name.chars().next() {
            Some('D') => vec![0, 7],
            Some('E') => vec![1, 8],
            Some('F') => vec![2, 9],
            Some('G') => vec![3, 10],
            Some('A') => vec![4],
            Some('B') => vec![5],
            Some('C') => vec![6],
            _ => Vec::new(),
        }
    }
}
