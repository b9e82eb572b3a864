//! Distinct index selection.
//!
//! Every randomized choice in a challenge (target concept, distractors,
//! filename slots, grid cells, shuffle slots) goes through these helpers so
//! that no index is ever drawn twice.

use crate::config::{CaptchaError, Result};
use rand::Rng;
use std::collections::HashSet;

/// Draws an index in `[0, bound)` that is not in `used`.
///
/// The draw is uniform over the remaining candidates. `used` is not
/// modified; the caller records the returned index.
///
/// # Errors
///
/// Returns [`CaptchaError::InvalidConfig`] when every index below `bound` is
/// already used.
pub fn pick_distinct<R: Rng>(
    rng: &mut R,
    bound: usize,
    used: &HashSet<usize>,
) -> Result<usize> {
    let taken = used.iter().filter(|&&index| index < bound).count();
    if taken >= bound {
        return Err(CaptchaError::invalid(format!(
            "cannot pick a distinct index below {bound}: {taken} already used"
        )));
    }

    // Sparse sets resolve fast by rejection; dense ones walk the free list.
    if taken * 2 <= bound {
        loop {
            let index = rng.random_range(0..bound);
            if !used.contains(&index) {
                return Ok(index);
            }
        }
    }

    let nth = rng.random_range(0..bound - taken);
    (0..bound)
        .filter(|index| !used.contains(index))
        .nth(nth)
        .ok_or_else(|| CaptchaError::invalid("free index list exhausted"))
}

/// Draws `count` distinct indices in `[0, bound)`, skipping and extending
/// `used`. Indices are returned in draw order.
///
/// # Errors
///
/// Returns [`CaptchaError::InvalidConfig`] when fewer than `count` indices
/// remain free. The check happens before anything is drawn.
pub fn pick_many<R: Rng>(
    rng: &mut R,
    bound: usize,
    count: usize,
    used: &mut HashSet<usize>,
) -> Result<Vec<usize>> {
    let free = bound.saturating_sub(used.iter().filter(|&&index| index < bound).count());
    if count > free {
        return Err(CaptchaError::invalid(format!(
            "need {count} distinct indices below {bound} but only {free} are free"
        )));
    }

    let mut picked = Vec::with_capacity(count);
    for _ in 0..count {
        let index = pick_distinct(rng, bound, used)?;
        used.insert(index);
        picked.push(index);
    }
    Ok(picked)
}
