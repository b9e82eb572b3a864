//! Builds the configured challenge.

use crate::challenge::{
    Challenge, GridChallenge, MusicChallenge, TextChallenge, load_catalog,
};
use crate::config::{ChallengeKind, Config, Result};
use crate::render::DirectoryImages;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

/// Builds the challenge selected by `config`, seeded when a seed is set.
///
/// # Errors
///
/// Propagates catalog loading and challenge construction errors.
pub fn build_challenge(config: &Config) -> Result<Box<dyn Challenge>> {
    match config.seed {
        Some(seed) => build_with_rng(&mut StdRng::seed_from_u64(seed), config),
        None => build_with_rng(&mut rand::rng(), config),
    }
}

/// Builds the challenge selected by `config` from an explicit random source.
///
/// # Errors
///
/// Propagates catalog loading and challenge construction errors.
pub fn build_with_rng<R: Rng>(rng: &mut R, config: &Config) -> Result<Box<dyn Challenge>> {
    let mut challenge: Box<dyn Challenge> = match config.kind {
        ChallengeKind::Grid => {
            let catalog = load_catalog(&config.grid_catalog)?;
            let grid = GridChallenge::with_rng(
                rng,
                config.grid_capacity,
                &catalog,
                config.grid_distractors,
                DirectoryImages::new(&config.grid_image_dir),
            )?;
            Box::new(grid.with_prompt(&config.grid_prompt))
        }
        ChallengeKind::Text => Box::new(TextChallenge::with_rng(
            rng,
            &config.text_title,
            &config.text_chars,
            config.text_chars.len(),
        )?),
        ChallengeKind::Music => Box::new(MusicChallenge::with_rng(
            rng,
            &config.music_title,
            &config.music_codes,
            config.music_clef.clone(),
            config.music_codes.len(),
        )?),
    };
    challenge.set_options(config.options.clone());

    info!(kind = ?config.kind, seeded = config.seed.is_some(), "Challenge built");
    Ok(challenge)
}
