//! Configuration settings.
//!
//! Defines the main `Config` struct, the render options shared by every
//! challenge, and environment variable loading logic.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

/// Which challenge the generator produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeKind {
    /// Picture grid: find every cell showing the target concept.
    Grid,
    /// Distorted character sequence.
    Text,
    /// Note heads placed on a jittered music staff.
    Music,
}

impl ChallengeKind {
    fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "TEXT" => Self::Text,
            "MUSIC" => Self::Music,
            _ => Self::Grid,
        }
    }
}

fn get_env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn get_env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn get_env_u32_or(key: &str, default: u32) -> u32 {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn get_env_usize_or(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn get_env_f32_or(key: &str, default: f32) -> f32 {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn get_env_list(key: &str) -> Vec<String> {
    get_env_or(key, "")
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Layout configuration accepted by [`crate::Challenge::set_options`].
///
/// Nothing here is validated. Zero geometry produces zero-sized or
/// overlapping layouts, so callers are expected to supply sane values.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Height of the title band above the cells.
    pub header_height: u32,
    /// Width of one cell.
    pub cell_width: u32,
    /// Height of one cell.
    pub cell_height: u32,
    /// Gap between cells.
    pub gap: u32,
    /// Outer padding.
    pub padding: u32,
    /// Image composited under everything else. White when absent.
    pub background: Option<PathBuf>,
    /// TTF/OTF asset used for titles and glyphs.
    pub font_path: Option<PathBuf>,
    /// Base font size in pixels.
    pub font_size: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            header_height: 0,
            cell_width: 0,
            cell_height: 0,
            gap: 0,
            padding: 0,
            background: None,
            font_path: None,
            font_size: 12.0,
        }
    }
}

impl RenderOptions {
    fn from_env() -> Self {
        Self {
            header_height: get_env_u32_or("HEADER_HEIGHT", 30),
            cell_width: get_env_u32_or("CELL_WIDTH", 100),
            cell_height: get_env_u32_or("CELL_HEIGHT", 100),
            gap: get_env_u32_or("CELL_GAP", 4),
            padding: get_env_u32_or("PADDING", 8),
            background: get_env_opt("BACKGROUND_PATH").map(PathBuf::from),
            font_path: get_env_opt("FONT_PATH").map(PathBuf::from),
            font_size: get_env_f32_or("FONT_SIZE", 16.0),
        }
    }
}

/// Generator configuration loaded from environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Challenge variant to build.
    pub kind: ChallengeKind,
    /// Fixed seed for reproducible challenges.
    pub seed: Option<u64>,
    /// Where the encoded PNG is written.
    pub output_path: PathBuf,
    /// Layout applied to the built challenge.
    pub options: RenderOptions,
    /// JSON catalog of grid concepts.
    pub grid_catalog: PathBuf,
    /// Root directory holding `<path>/<filename>.png` cell images.
    pub grid_image_dir: PathBuf,
    /// Number of grid cells available.
    pub grid_capacity: usize,
    /// Number of non-target concepts mixed into the grid.
    pub grid_distractors: usize,
    /// Prompt printed before the target concept's label.
    pub grid_prompt: String,
    /// Title for the text challenge.
    pub text_title: String,
    /// Characters shuffled into the text challenge.
    pub text_chars: Vec<String>,
    /// Title for the music challenge.
    pub music_title: String,
    /// Note codes shuffled onto the staff.
    pub music_codes: Vec<String>,
    /// Optional clef image drawn at the start of the staff.
    pub music_clef: Option<PathBuf>,
    /// Logging format: "json" or "pretty".
    pub log_format: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// Every variable has a default; unparseable numbers fall back to it.
    #[must_use]
    pub fn from_env() -> Arc<Self> {
        let kind = ChallengeKind::from_str(&get_env_or("CAPTCHA_KIND", "grid"));
        let seed = get_env_opt("CAPTCHA_SEED").and_then(|s| s.parse().ok());

        Arc::new(Self {
            kind,
            seed,
            output_path: PathBuf::from(get_env_or("CAPTCHA_OUTPUT", "captcha.png")),
            options: RenderOptions::from_env(),
            grid_catalog: PathBuf::from(get_env_or("GRID_CATALOG", "catalog.json")),
            grid_image_dir: PathBuf::from(get_env_or("GRID_IMAGE_DIR", ".")),
            grid_capacity: get_env_usize_or("GRID_CAPACITY", 9),
            grid_distractors: get_env_usize_or("GRID_DISTRACTORS", 3),
            grid_prompt: get_env_or("GRID_PROMPT", crate::challenge::grid::DEFAULT_PROMPT),
            text_title: get_env_or("TEXT_TITLE", ""),
            text_chars: get_env_list("TEXT_CHARS"),
            music_title: get_env_or("MUSIC_TITLE", ""),
            music_codes: get_env_list("MUSIC_CODES"),
            music_clef: get_env_opt("MUSIC_CLEF").map(PathBuf::from),
            log_format: get_env_or("LOG_FORMAT", "json"),
        })
    }
}
