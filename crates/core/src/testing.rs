//! Synthetic familiarization groups for tests.
//!
//! Enabled for this crate's unit tests and, through the `test-fixtures`
//! feature, for downstream integration tests.

use crate::video::{parse_group, VideoRecord};

/// Pseudo-words, one per video.
pub const WORDS: [&str; 32] = [
    "apple", "blick", "dax", "fep", "gazzer", "kiki", "lemi", "modi", "nork", "pilk", "rif",
    "sibu", "tove", "wug", "zorb", "bosa", "chatty", "dofa", "glorp", "hepa", "jiv", "koba",
    "lorp", "mipen", "nefa", "pafe", "quib", "roke", "sefa", "toma", "vexa", "yoki",
];

/// Raw side token for the `i`-th video of a category (agent perspective).
fn side_token(i: usize) -> &'static str {
    match i {
        0..=3 => "right",
        4..=7 => "left",
        _ => "nop",
    }
}

/// A valid 32-video group with 48 distinct objects.
///
/// `same` videos use objects `010`..=`025`; `diff` videos use consecutive
/// pairs from `101`..=`132`. The first name is
/// `1a_same.rl_right_010-010_apple.mp4`.
pub fn synthetic_group_names() -> Vec<String> {
    let mut names = Vec::with_capacity(WORDS.len());
    for i in 0..16 {
        let obj = format!("{:03}", 10 + i);
        names.push(format!(
            "1a_same.rl_{}_{obj}-{obj}_{}.mp4",
            side_token(i),
            WORDS[i]
        ));
    }
    for i in 0..16 {
        names.push(format!(
            "1a_diff.lr_{}_{}-{}_{}.mp4",
            side_token(i),
            101 + 2 * i,
            102 + 2 * i,
            WORDS[16 + i]
        ));
    }
    names
}

/// Parsed form of [`synthetic_group_names`].
pub fn synthetic_group() -> Vec<VideoRecord> {
    parse_group(&synthetic_group_names()).expect("synthetic group names are well-formed")
}
