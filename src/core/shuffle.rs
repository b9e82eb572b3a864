//! Slot shuffling for ordered sequences.
//!
//! Values are taken in their original order and each one is bound to a
//! random free slot. Reading the slots in ascending order gives the public
//! (shuffled) sequence; each slot remembers where its value came from so the
//! original order can be restored.

use crate::config::{CaptchaError, Result};
use crate::core::picker::pick_distinct;
use rand::Rng;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// A value bound to a slot, tagged with its source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotEntry<T> {
    pub source: usize,
    pub value: T,
}

/// Immutable slot assignment produced by [`SlotMap::shuffle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotMap<T> {
    slots: BTreeMap<usize, SlotEntry<T>>,
}

impl<T: Clone> SlotMap<T> {
    /// Binds every value of `values` to a distinct slot in `[0, slot_count)`.
    ///
    /// Value `k` is placed for `k = 0..len` in order, each into a random slot
    /// not yet taken.
    ///
    /// # Errors
    ///
    /// Returns [`CaptchaError::InvalidConfig`] if `slot_count` differs from
    /// the number of values.
    pub fn shuffle<R: Rng>(rng: &mut R, values: &[T], slot_count: usize) -> Result<Self> {
        if slot_count != values.len() {
            return Err(CaptchaError::invalid(format!(
                "slot count {slot_count} does not match sequence length {}",
                values.len()
            )));
        }

        let mut used = HashSet::with_capacity(slot_count);
        let mut slots = BTreeMap::new();
        for (source, value) in values.iter().enumerate() {
            let slot = pick_distinct(rng, slot_count, &used)?;
            used.insert(slot);
            slots.insert(
                slot,
                SlotEntry {
                    source,
                    value: value.clone(),
                },
            );
        }

        debug!(
            slots = ?slots.iter().map(|(slot, entry)| (*slot, entry.source)).collect::<Vec<_>>(),
            "Sequence shuffled"
        );

        Ok(Self { slots })
    }

    /// Values in ascending slot order.
    #[must_use]
    pub fn ordered(&self) -> Vec<T> {
        self.slots.values().map(|entry| entry.value.clone()).collect()
    }

    /// Values in their original input order.
    #[must_use]
    pub fn restore(&self) -> Vec<T> {
        let mut entries: Vec<&SlotEntry<T>> = self.slots.values().collect();
        entries.sort_by_key(|entry| entry.source);
        entries.into_iter().map(|entry| entry.value.clone()).collect()
    }
}

impl<T> SlotMap<T> {
    /// Slot keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots.keys().copied()
    }

    #[must_use]
    pub fn get(&self, slot: usize) -> Option<&SlotEntry<T>> {
        self.slots.get(&slot)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
