//! Category partitioning: random draws without replacement from a group.
//!
//! A group is split by a fixed schedule of eight draws, one per
//! (category, pointing mode, side) combination. Each draw removes its
//! records from the pool so no record is drawn twice, and the schedule
//! exhausts a valid 32-video group exactly.

use std::collections::BTreeMap;

use rand::Rng;
use serde::Serialize;

use crate::error::{PlanError, PlanResult};
use crate::types::{Category, PointingMode, Side};
use crate::video::VideoRecord;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Records taken by every scheduled draw.
pub const DRAW_SIZE: usize = 4;

/// The fixed draw order. Pointing draws filter on side; non-pointing draws
/// use the side only to label the two halves of the non-pointing videos.
pub const DRAW_SCHEDULE: [DrawKey; 8] = [
    DrawKey::pointing(Category::Same, Side::Left),
    DrawKey::pointing(Category::Same, Side::Right),
    DrawKey::non_pointing(Category::Same, Side::Left),
    DrawKey::non_pointing(Category::Same, Side::Right),
    DrawKey::pointing(Category::Diff, Side::Left),
    DrawKey::pointing(Category::Diff, Side::Right),
    DrawKey::non_pointing(Category::Diff, Side::Left),
    DrawKey::non_pointing(Category::Diff, Side::Right),
];

// ---------------------------------------------------------------------------
// Draw key
// ---------------------------------------------------------------------------

/// Identifies one category draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct DrawKey {
    pub category: Category,
    pub mode: PointingMode,
    pub side: Side,
}

impl DrawKey {
    pub const fn pointing(category: Category, side: Side) -> Self {
        Self {
            category,
            mode: PointingMode::Pointing,
            side,
        }
    }

    pub const fn non_pointing(category: Category, side: Side) -> Self {
        Self {
            category,
            mode: PointingMode::NonPointing,
            side,
        }
    }

    /// Whether `record` is eligible for this draw.
    pub fn matches(&self, record: &VideoRecord) -> bool {
        if record.category != self.category {
            return false;
        }
        match self.mode {
            PointingMode::Pointing => record.pointed_side == Some(self.side),
            PointingMode::NonPointing => record.pointed_side.is_none(),
        }
    }
}

impl std::fmt::Display for DrawKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.category, self.mode, self.side)
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Draw `count` records matching `key` uniformly at random without
/// replacement.
///
/// Returns `(selected, remaining)` where `remaining` is `records` minus the
/// selection, in original order. The selection itself is in random order.
pub fn select_videos<R: Rng + ?Sized>(
    records: Vec<VideoRecord>,
    key: DrawKey,
    count: usize,
    rng: &mut R,
) -> PlanResult<(Vec<VideoRecord>, Vec<VideoRecord>)> {
    let eligible: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| key.matches(r))
        .map(|(i, _)| i)
        .collect();

    if eligible.len() < count {
        return Err(PlanError::InsufficientPool {
            key,
            needed: count,
            available: eligible.len(),
        });
    }

    let picked: Vec<usize> = rand::seq::index::sample(rng, eligible.len(), count)
        .into_iter()
        .map(|i| eligible[i])
        .collect();

    let mut slots: Vec<Option<VideoRecord>> = records.into_iter().map(Some).collect();
    let selected: Vec<VideoRecord> = picked
        .iter()
        .filter_map(|&i| slots[i].take())
        .collect();
    let remaining: Vec<VideoRecord> = slots.into_iter().flatten().collect();

    Ok((selected, remaining))
}

// ---------------------------------------------------------------------------
// Partition
// ---------------------------------------------------------------------------

/// The eight scheduled draws of one group.
#[derive(Debug, Clone)]
pub struct Partition {
    draws: BTreeMap<DrawKey, Vec<VideoRecord>>,
}

impl Partition {
    pub fn draw(&self, key: &DrawKey) -> Option<&[VideoRecord]> {
        self.draws.get(key).map(Vec::as_slice)
    }

    pub fn draws(&self) -> impl Iterator<Item = (&DrawKey, &[VideoRecord])> {
        self.draws.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Total number of drawn records across all draws.
    pub fn record_count(&self) -> usize {
        self.draws.values().map(Vec::len).sum()
    }
}

/// Run [`DRAW_SCHEDULE`] over a group.
///
/// Fails with [`PlanError::InvalidGroup`] if records are left over once
/// every draw has run.
pub fn partition_group<R: Rng + ?Sized>(
    records: Vec<VideoRecord>,
    rng: &mut R,
) -> PlanResult<Partition> {
    let mut remaining = records;
    let mut draws = BTreeMap::new();

    for key in DRAW_SCHEDULE {
        let (selected, rest) = select_videos(remaining, key, DRAW_SIZE, rng)?;
        draws.insert(key, selected);
        remaining = rest;
    }

    if !remaining.is_empty() {
        return Err(PlanError::InvalidGroup(format!(
            "{} videos left unselected after all category draws",
            remaining.len()
        )));
    }

    Ok(Partition { draws })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
