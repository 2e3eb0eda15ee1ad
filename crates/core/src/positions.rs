//! On-screen positions for the three objects of a trial.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Screen position. Serialized as `0` (left), `1` (middle), `2` (right),
/// the values the trial-presentation tooling reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Position {
    Left,
    Middle,
    Right,
}

impl Position {
    pub const ALL: [Position; 3] = [Self::Left, Self::Middle, Self::Right];

    pub fn index(&self) -> u8 {
        match self {
            Self::Left => 0,
            Self::Middle => 1,
            Self::Right => 2,
        }
    }
}

impl From<Position> for u8 {
    fn from(value: Position) -> Self {
        value.index()
    }
}

impl TryFrom<u8> for Position {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Left),
            1 => Ok(Self::Middle),
            2 => Ok(Self::Right),
            other => Err(format!("invalid position {other}, expected 0, 1 or 2")),
        }
    }
}

/// Positions of a trial's slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotPositions {
    /// Positions of `other1`, `other2` (and `other3` on no-target trials).
    pub others: Vec<Position>,
    pub target: Option<Position>,
}

impl SlotPositions {
    /// Every assigned position, target last.
    pub fn all(&self) -> impl Iterator<Item = Position> + '_ {
        self.others.iter().copied().chain(self.target)
    }
}

/// Assign a uniformly random permutation of the three positions.
///
/// Pops a random position for `other1`, then `other2`; the last one goes to
/// the target, or to `other3` when the trial has no target. The label's side
/// does not constrain the target's position.
pub fn assign_positions<R: Rng + ?Sized>(has_target: bool, rng: &mut R) -> SlotPositions {
    let mut candidates = Position::ALL.to_vec();
    let mut others = Vec::with_capacity(3);

    while candidates.len() > 1 {
        let i = rng.random_range(0..candidates.len());
        others.push(candidates.remove(i));
    }
    let last = candidates.remove(0);

    if has_target {
        SlotPositions {
            others,
            target: Some(last),
        }
    } else {
        others.push(last);
        SlotPositions {
            others,
            target: None,
        }
    }
}
