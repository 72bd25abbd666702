use std::{fmt, ops::Deref, str::FromStr, sync::LazyLock};

use regex::Regex;

use crate::error::Error;

// Greedy prefix so the last `v=<id>` / `/<id>` occurrence wins
static VIDEO_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^.*(?:v=|/)([0-9A-Za-z_-]{11})").unwrap());

/// The 11 character token naming a YouTube video
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }

    pub fn thumbnail_url(&self) -> String {
        format!("http://img.youtube.com/vi/{}/0.jpg", self.0)
    }
}

impl Deref for VideoId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for VideoId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        extract_video_id(s)
    }
}

/// Pulls the video identifier out of a loosely formatted reference such as
/// `https://youtu.be/<id>` or `https://www.youtube.com/watch?v=<id>`.
///
/// Only the shape of the identifier is checked, not whether the video exists.
pub fn extract_video_id(reference: &str) -> Result<VideoId, Error> {
    VIDEO_ID_RE
        .captures(reference)
        .and_then(|cap| cap.get(1))
        .map(|m| VideoId(m.as_str().to_string()))
        .ok_or(Error::InvalidFormat)
}
