//! Library definitions.
//!
//! Exports the challenge builders, their layout primitives, and the
//! rendering and configuration types they share.

pub mod challenge;
pub mod config;
pub mod core;
pub mod factory;
pub mod notation;
pub mod render;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;
pub use challenge::{
    CatalogItem, Challenge, GridChallenge, GridPlan, MusicChallenge, Solution, TextChallenge,
    load_catalog,
};
pub use config::{CaptchaError, ChallengeKind, Config, RenderOptions, Result};
pub use core::picker::{pick_distinct, pick_many};
pub use core::shuffle::SlotMap;
pub use core::staff::{NotePlacement, StaffLayout, place_notes};
pub use factory::{build_challenge, build_with_rng};
pub use notation::{Accidental, NotationTable, Note, TrebleStaff};
pub use render::{DirectoryImages, ImageSource, MemoryImages};
