//! Configuration management.
//!
//! Loads generator settings from environment variables using dotenvy and
//! defines the render options accepted by every challenge.

mod error;
mod settings;

pub use error::{CaptchaError, Result};
pub use settings::{ChallengeKind, Config, RenderOptions};
