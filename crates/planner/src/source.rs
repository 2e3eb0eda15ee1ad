//! Group folder discovery and video name enumeration.
//!
//! A video root contains one directory per participant group, named
//! `group*` (e.g. `group1A`). Each group directory holds the 32
//! familiarization videos as `.mp4` files.

use std::path::{Path, PathBuf};

use lexitrial_core::video::{parse_group, VideoRecord, VIDEOS_PER_GROUP};

use crate::error::{PlannerError, PlannerResult};

/// Directory name prefix of group folders.
pub const GROUP_DIR_PREFIX: &str = "group";

/// Extension of familiarization video files.
pub const VIDEO_EXTENSION: &str = "mp4";

/// A group folder found under the video root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupFolder {
    pub name: String,
    pub path: PathBuf,
}

/// List `group*` directories under `root`, sorted by name.
pub fn discover_groups(root: &Path) -> PlannerResult<Vec<GroupFolder>> {
    let entries = std::fs::read_dir(root).map_err(|e| PlannerError::io(root, e))?;

    let mut groups = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PlannerError::io(root, e))?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with(GROUP_DIR_PREFIX) && path.is_dir() {
            groups.push(GroupFolder { name, path });
        }
    }
    groups.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(groups)
}

/// Lowercased `.mp4` file names in a group folder, sorted.
pub fn video_names(group: &GroupFolder) -> PlannerResult<Vec<String>> {
    let entries = std::fs::read_dir(&group.path).map_err(|e| PlannerError::io(&group.path, e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PlannerError::io(&group.path, e))?;
        let path = entry.path();
        let is_video = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(VIDEO_EXTENSION));
        if is_video && path.is_file() {
            let name = entry.file_name().to_string_lossy().to_lowercase();
            names.push(name);
        }
    }
    names.sort();

    if names.len() != VIDEOS_PER_GROUP {
        return Err(PlannerError::GroupSize {
            group: group.name.clone(),
            found: names.len(),
            expected: VIDEOS_PER_GROUP,
        });
    }
    Ok(names)
}

/// Read and parse every video of a group.
pub fn load_group(group: &GroupFolder) -> PlannerResult<Vec<VideoRecord>> {
    let names = video_names(group)?;
    let records = parse_group(&names)?;
    tracing::debug!(group = %group.name, videos = records.len(), "Group videos parsed");
    Ok(records)
}
