//! Bucket → medium lookup.
//!
//! Each upload bucket receives a single kind of material. The table is
//! keyed by exact bucket name; there is no pattern matching.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{TriggerError, TriggerResult};

/// Classification of the material in a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Medium {
    Audio,
    Video,
}

impl Medium {
    pub fn as_str(&self) -> &'static str {
        match self {
            Medium::Audio => "audio",
            Medium::Video => "video",
        }
    }
}

impl fmt::Display for Medium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upload buckets and the medium each one holds.
pub const FORMAT_MAP: &[(&str, Medium)] = &[
    ("rac-prod-av-upload-audio", Medium::Audio),
    ("rac-dev-av-upload-audio", Medium::Audio),
    ("rac-prod-av-upload-video", Medium::Video),
    ("rac-dev-av-upload-video", Medium::Video),
];

/// Resolve the medium for a bucket, failing with
/// [`TriggerError::UnknownBucket`] when it is not in [`FORMAT_MAP`].
pub fn medium_for_bucket(bucket: &str) -> TriggerResult<Medium> {
    FORMAT_MAP
        .iter()
        .find(|(name, _)| *name == bucket)
        .map(|(_, medium)| *medium)
        .ok_or_else(|| TriggerError::UnknownBucket(bucket.to_string()))
}
