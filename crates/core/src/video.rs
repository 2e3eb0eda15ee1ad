//! Familiarization video records parsed from video file names.
//!
//! Naming convention: `{group}_{category}.{look}_{side}_{ref1}-{ref2}_{word}.{ext}`
//!
//! - `category` = `same` (one object shown twice) or `diff` (two objects)
//! - `side` = `left` / `right` for pointing videos, `nop` for non-pointing
//! - `ref1-ref2` = object reference numbers in on-screen order
//!
//! The side token is recorded from the pointing agent's perspective. Records
//! store the viewer's perspective, so `right` becomes [`Side::Left`] and
//! `left` becomes [`Side::Right`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, PlanResult};
use crate::types::{Category, ObjectRef, Side};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Number of familiarization videos in one group.
pub const VIDEOS_PER_GROUP: usize = 32;

/// Videos per category (`same` / `diff`) in one group.
pub const VIDEOS_PER_CATEGORY: usize = 16;

/// Pointing videos toward one side, per category.
pub const POINTING_PER_SIDE: usize = 4;

/// Non-pointing videos per category.
pub const NONPOINTING_PER_CATEGORY: usize = 8;

/// Raw side token for non-pointing videos.
pub const NON_POINTING_TOKEN: &str = "nop";

const NAME_FIELD_COUNT: usize = 5;

// ---------------------------------------------------------------------------
// Video record
// ---------------------------------------------------------------------------

/// A parsed familiarization video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    /// Lowercased source file name.
    pub name: String,
    pub group_tag: String,
    pub look_tag: String,
    pub extension: String,
    pub word: String,
    pub category: Category,
    /// Object references in on-screen order.
    pub object_refs: [ObjectRef; 2],
    /// Pointed side in viewer perspective; `None` for non-pointing videos.
    pub pointed_side: Option<Side>,
}

impl VideoRecord {
    pub fn is_pointing(&self) -> bool {
        self.pointed_side.is_some()
    }

    /// The object the agent points at.
    pub fn pointed_object(&self) -> Option<&ObjectRef> {
        let side = self.pointed_side?;
        match self.category {
            Category::Same => Some(&self.object_refs[0]),
            Category::Diff => Some(match side {
                Side::Left => &self.object_refs[0],
                Side::Right => &self.object_refs[1],
            }),
        }
    }

    /// The object shown but not pointed at. Only defined for `diff` pointing videos.
    pub fn unpointed_object(&self) -> Option<&ObjectRef> {
        let side = self.pointed_side?;
        match self.category {
            Category::Same => None,
            Category::Diff => Some(match side {
                Side::Left => &self.object_refs[1],
                Side::Right => &self.object_refs[0],
            }),
        }
    }

    /// Distinct objects shown in this video (one for `same`, two for `diff`).
    pub fn source_objects(&self) -> Vec<ObjectRef> {
        match self.category {
            Category::Same => vec![self.object_refs[0].clone()],
            Category::Diff => self.object_refs.to_vec(),
        }
    }

    /// Re-encode the record as a raw file name, flipping the side back to
    /// the pointing agent's perspective.
    pub fn to_raw_name(&self) -> String {
        let side_token = match self.pointed_side {
            Some(side) => side.opposite().as_str(),
            None => NON_POINTING_TOKEN,
        };
        format!(
            "{}_{}.{}_{}_{}-{}_{}.{}",
            self.group_tag,
            self.category,
            self.look_tag,
            side_token,
            self.object_refs[0],
            self.object_refs[1],
            self.word,
            self.extension,
        )
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a video file name into a [`VideoRecord`].
///
/// # Examples
///
/// ```
/// use lexitrial_core::types::{Category, Side};
/// use lexitrial_core::video::parse_video_record;
///
/// let record = parse_video_record("1a_same.rl_right_010-010_apple.mp4").unwrap();
/// assert_eq!(record.category, Category::Same);
/// assert_eq!(record.pointed_side, Some(Side::Left));
/// assert_eq!(record.pointed_object().unwrap().as_str(), "010");
/// ```
pub fn parse_video_record(raw_name: &str) -> PlanResult<VideoRecord> {
    let name = raw_name.to_lowercase();

    let fields: Vec<&str> = name.split('_').collect();
    if fields.len() != NAME_FIELD_COUNT {
        return Err(PlanError::malformed(
            &name,
            format!(
                "expected {NAME_FIELD_COUNT} underscore-delimited fields, found {}",
                fields.len()
            ),
        ));
    }
    let (group_tag, category_look, side_token, refs, word_ext) =
        (fields[0], fields[1], fields[2], fields[3], fields[4]);

    let (category_token, look_tag) = category_look
        .split_once('.')
        .filter(|(c, l)| !c.is_empty() && !l.contains('.'))
        .ok_or_else(|| PlanError::malformed(&name, "expected '{category}.{look}'"))?;
    let category = Category::from_str(category_token).ok_or_else(|| {
        PlanError::malformed(&name, format!("unknown category '{category_token}'"))
    })?;

    let pointed_side = match side_token {
        // Perspective flip: the agent's right is the viewer's left.
        "right" => Some(Side::Left),
        "left" => Some(Side::Right),
        NON_POINTING_TOKEN => None,
        other => {
            return Err(PlanError::malformed(
                &name,
                format!("unknown side token '{other}'"),
            ))
        }
    };

    let object_refs = parse_object_refs(&name, refs, category)?;

    let (word, extension) = word_ext
        .split_once('.')
        .filter(|(w, e)| !w.is_empty() && !e.is_empty())
        .ok_or_else(|| PlanError::malformed(&name, "expected '{word}.{ext}'"))?;

    Ok(VideoRecord {
        group_tag: group_tag.to_string(),
        look_tag: look_tag.to_string(),
        extension: extension.to_string(),
        word: word.to_string(),
        category,
        object_refs,
        pointed_side,
        name,
    })
}

fn parse_object_refs(name: &str, refs: &str, category: Category) -> PlanResult<[ObjectRef; 2]> {
    let parts: Vec<&str> = refs.split('-').collect();
    if parts.len() != 2 || parts.iter().any(|p| p.is_empty()) {
        return Err(PlanError::malformed(
            name,
            format!("expected two object refs '{{ref1}}-{{ref2}}', found '{refs}'"),
        ));
    }

    match category {
        Category::Same if parts[0] != parts[1] => Err(PlanError::malformed(
            name,
            format!("'same' video must show one object, found '{refs}'"),
        )),
        Category::Diff if parts[0] == parts[1] => Err(PlanError::malformed(
            name,
            format!("'diff' video must show two objects, found '{refs}'"),
        )),
        _ => Ok([ObjectRef::from(parts[0]), ObjectRef::from(parts[1])]),
    }
}

/// Parse every name in a group, aborting on the first malformed one.
pub fn parse_group<S: AsRef<str>>(raw_names: &[S]) -> PlanResult<Vec<VideoRecord>> {
    raw_names
        .iter()
        .map(|n| parse_video_record(n.as_ref()))
        .collect()
}

// ---------------------------------------------------------------------------
// Group shape
// ---------------------------------------------------------------------------

/// Check the fixed 32 / 16+16 / 4+4+8 structure of a group and word uniqueness.
pub fn check_group_shape(records: &[VideoRecord]) -> PlanResult<()> {
    if records.len() != VIDEOS_PER_GROUP {
        return Err(PlanError::InvalidGroup(format!(
            "expected {VIDEOS_PER_GROUP} videos, found {}",
            records.len()
        )));
    }

    for category in [Category::Same, Category::Diff] {
        let in_category: Vec<&VideoRecord> =
            records.iter().filter(|r| r.category == category).collect();
        if in_category.len() != VIDEOS_PER_CATEGORY {
            return Err(PlanError::InvalidGroup(format!(
                "expected {VIDEOS_PER_CATEGORY} '{category}' videos, found {}",
                in_category.len()
            )));
        }

        let count_side =
            |side: Option<Side>| in_category.iter().filter(|r| r.pointed_side == side).count();
        let expected = [
            (Some(Side::Left), POINTING_PER_SIDE, "pointed-left"),
            (Some(Side::Right), POINTING_PER_SIDE, "pointed-right"),
            (None, NONPOINTING_PER_CATEGORY, "non-pointing"),
        ];
        for (side, want, what) in expected {
            let found = count_side(side);
            if found != want {
                return Err(PlanError::InvalidGroup(format!(
                    "expected {want} {what} '{category}' videos, found {found}"
                )));
            }
        }
    }

    let mut seen = HashSet::new();
    for record in records {
        if !seen.insert(record.word.as_str()) {
            return Err(PlanError::InvalidGroup(format!(
                "word '{}' appears in more than one video",
                record.word
            )));
        }
    }

    Ok(())
}

/// Distinct object references across a group, in first-seen order.
pub fn object_universe(records: &[VideoRecord]) -> Vec<ObjectRef> {
    let mut seen = HashSet::new();
    records
        .iter()
        .flat_map(|r| r.object_refs.iter())
        .filter(|obj| seen.insert((*obj).clone()))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
