//! Shared distractor pool for one plan.
//!
//! [`DistractorPool`] is an owned value: every operation consumes the pool and
//! returns the next state, so the sequence of draws (including refills) is an
//! explicit chain of transitions.
//!
//! Use counting keeps every object within [`MAX_OBJECT_USES`] slots across
//! the plan:
//!
//! - Targets are claimed once, up front, and count as one use each.
//! - Drawn distractors leave the working pool and count as one use each.
//! - A refill restores the working pool to the universe minus the objects
//!   that already reached the limit, so a claimed target can come back as a
//!   distractor once.

use std::collections::BTreeMap;

use rand::Rng;

use crate::error::{PlanError, PlanResult};
use crate::types::ObjectRef;

/// Maximum number of trial slots (target or distractor) one object may fill.
pub const MAX_OBJECT_USES: u8 = 2;

#[derive(Debug, Clone)]
pub struct DistractorPool {
    universe: Vec<ObjectRef>,
    working: Vec<ObjectRef>,
    usage: BTreeMap<ObjectRef, u8>,
    refills: u32,
}

impl DistractorPool {
    /// A full pool over `universe`.
    pub fn new(universe: Vec<ObjectRef>) -> Self {
        Self {
            working: universe.clone(),
            universe,
            usage: BTreeMap::new(),
            refills: 0,
        }
    }

    /// Remove plan targets from the working pool and count their use.
    pub fn claim_targets<'a, I>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = &'a ObjectRef>,
    {
        for target in targets {
            self.working.retain(|obj| obj != target);
            self.record_use(target);
        }
        self
    }

    /// Draw `count` distractors that are not among `source_objects`.
    ///
    /// Refills the working pool first if it cannot supply `count`
    /// candidates.
    pub fn draw_distractors<R: Rng + ?Sized>(
        mut self,
        word: &str,
        source_objects: &[ObjectRef],
        count: usize,
        rng: &mut R,
    ) -> PlanResult<(Vec<ObjectRef>, Self)> {
        let mut candidates = self.candidates(source_objects);
        if candidates.len() < count {
            self = self.refill();
            candidates = self.candidates(source_objects);
            tracing::debug!(
                word,
                refills = self.refills,
                available = candidates.len(),
                "Distractor pool refilled",
            );
        }

        if candidates.len() < count {
            return Err(PlanError::DistractorPoolExhausted {
                word: word.to_string(),
                needed: count,
                available: candidates.len(),
            });
        }

        let drawn: Vec<ObjectRef> = rand::seq::index::sample(rng, candidates.len(), count)
            .into_iter()
            .map(|i| candidates[i].clone())
            .collect();

        for obj in &drawn {
            self.working.retain(|o| o != obj);
            self.record_use(obj);
        }

        Ok((drawn, self))
    }

    /// Times the working pool has been refilled.
    pub fn refills(&self) -> u32 {
        self.refills
    }

    /// Objects currently available before any per-trial exclusion.
    pub fn available(&self) -> &[ObjectRef] {
        &self.working
    }

    /// Slots filled so far by `obj`.
    pub fn uses(&self, obj: &ObjectRef) -> u8 {
        self.usage.get(obj).copied().unwrap_or(0)
    }

    fn candidates(&self, source_objects: &[ObjectRef]) -> Vec<ObjectRef> {
        self.working
            .iter()
            .filter(|obj| !source_objects.contains(obj))
            .cloned()
            .collect()
    }

    fn refill(mut self) -> Self {
        self.working = self
            .universe
            .iter()
            .filter(|obj| self.uses(obj) < MAX_OBJECT_USES)
            .cloned()
            .collect();
        self.refills += 1;
        self
    }

    fn record_use(&mut self, obj: &ObjectRef) {
        *self.usage.entry(obj.clone()).or_insert(0) += 1;
    }
}
