//! Challenge builders.
//!
//! Every builder fixes its random selection when constructed and only reads
//! it afterwards, so rendering the same challenge twice yields the same
//! layout and the solution always matches what was drawn.

pub mod grid;
pub mod music;
pub mod sequence;
pub mod text;

pub use grid::{CatalogItem, GridChallenge, GridPlan, load_catalog};
pub use music::MusicChallenge;
pub use sequence::SequenceBoard;
pub use text::TextChallenge;

use crate::config::{RenderOptions, Result};
use crate::render::to_data_uri;
use std::collections::BTreeSet;

/// What a solver must submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Solution {
    /// Grid cells showing the target concept.
    Cells(Vec<usize>),
    /// Characters in displayed order.
    Text(Vec<String>),
}

impl Solution {
    /// Checks a submitted answer.
    ///
    /// Cell answers are comma or whitespace separated indices compared as a
    /// set; repeated indices are rejected. Text answers are compared with all whitespace removed.
    #[must_use]
    pub fn matches(&self, answer: &str) -> bool {
        match self {
            Self::Cells(cells) => {
                let expected: BTreeSet<usize> = cells.iter().copied().collect();
                let Some(submitted) = answer
                    .split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|part| !part.is_empty())
                    .map(|part| part.parse::<usize>().ok())
                    .collect::<Option<Vec<_>>>()
                else {
                    return false;
                };
                let distinct: BTreeSet<usize> = submitted.iter().copied().collect();
                distinct.len() == submitted.len() && distinct == expected
            }
            Self::Text(chars) => {
                let submitted: String = answer.chars().filter(|c| !c.is_whitespace()).collect();
                submitted == chars.concat()
            }
        }
    }
}

/// Common contract of the grid, text and music challenges.
pub trait Challenge {
    /// The answer fixed at construction.
    fn solution(&self) -> Solution;

    /// Renders the challenge to PNG bytes.
    ///
    /// # Errors
    ///
    /// Propagates font, image load and encode failures.
    fn render(&self) -> Result<Vec<u8>>;

    /// Replaces the layout configuration.
    fn set_options(&mut self, options: RenderOptions);

    fn options(&self) -> &RenderOptions;

    /// Renders to a `data:image/png;base64,` URI.
    ///
    /// # Errors
    ///
    /// Same as [`Challenge::render`].
    fn render_data_uri(&self) -> Result<String> {
        self.render().map(|png| to_data_uri(&png))
    }
}
