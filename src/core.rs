//! Randomized layout primitives.
//!
//! Distinct index picking, slot shuffling and staff note placement shared
//! by the challenge builders.

pub mod picker;
pub mod shuffle;
pub mod staff;
