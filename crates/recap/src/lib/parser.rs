//! # Yt Parser
//!
//! This module provides functionality to pull caption metadata out of a YouTube
//! watch page and to parse the timed text (caption XML) those tracks point to.

use std::{borrow::Cow, ops::Deref, sync::LazyLock};

use quick_xml::{events::Event, Reader};
use regex::Regex;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

use crate::{error::Error, yt::TranscriptFragment};

static YT_PLAYER_RESPONSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    regex::Regex::new(
        r"(?s)var\s+ytInitialPlayerResponse\s*=\s*(\{.*?\});\s*(?:var\s|</script>)",
    )
    .unwrap()
});

static MARKUP_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// A caption track advertised by the player response
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    pub base_url: String,
    pub language_code: String,
    /// `Some("asr")` for auto-generated tracks
    #[serde(default)]
    pub kind: Option<String>,
}

impl CaptionTrack {
    pub fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

pub struct WatchPage(String);

impl Deref for WatchPage {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl WatchPage {
    pub fn new(doc: String) -> Self {
        WatchPage(doc)
    }

    pub fn player_response<T>(&self) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        YT_PLAYER_RESPONSE_RE
            .captures(self)
            .and_then(|cap| cap.get(1))
            .and_then(|m| serde_json::from_str(m.as_str()).ok())
            .ok_or(Error::ParseError(
                "Failed to extract ytInitialPlayerResponse from the page's script tag",
            ))
    }
}

impl From<String> for WatchPage {
    fn from(value: String) -> Self {
        WatchPage(value)
    }
}

/// Reads `playabilityStatus.status`; anything but `OK` means the video
/// cannot be played (removed, private, region locked...)
pub fn playability_status(player_response: &Value) -> Option<&str> {
    player_response["playabilityStatus"]["status"].as_str()
}

/// Lists the caption tracks of a player response. A video without captions
/// yields an empty list.
#[tracing::instrument(skip(player_response))]
pub fn parse_caption_tracks(player_response: &Value) -> Result<Vec<CaptionTrack>, Error> {
    let tracks = &player_response["captions"]["playerCaptionsTracklistRenderer"]["captionTracks"];

    if tracks.is_null() {
        return Ok(Vec::new());
    }

    Ok(serde_json::from_value(tracks.clone())?)
}

/// Picks the first track matching `languages` in order of preference.
/// For each language a manually created track beats an auto-generated one.
pub fn select_caption_track<'a>(
    tracks: &'a [CaptionTrack],
    languages: &[String],
) -> Option<&'a CaptionTrack> {
    languages.iter().find_map(|lang| {
        let mut matching = tracks.iter().filter(|t| &t.language_code == lang);
        let manual = matching.clone().find(|t| !t.is_generated());
        manual.or_else(|| matching.next())
    })
}

/// Parses `<transcript><text start=".." dur="..">..</text>..</transcript>`
/// into fragments, in document order. Elements without any text are skipped,
/// caption text itself is kept as written, surrounding whitespace included.
pub fn parse_timed_text(xml: &str) -> Result<Vec<TranscriptFragment>, Error> {
    let mut reader = Reader::from_str(xml);
    let mut fragments = Vec::new();
    let mut current: Option<(f64, f64, String)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"text" => {
                let mut start = 0.0;
                let mut duration = 0.0;
                for attr in e.attributes().flatten() {
                    let value = std::str::from_utf8(&attr.value)
                        .ok()
                        .and_then(|v| v.parse::<f64>().ok())
                        .unwrap_or_default();
                    match attr.key.as_ref() {
                        b"start" => start = value,
                        b"dur" => duration = value,
                        _ => {}
                    }
                }
                current = Some((start, duration, String::new()));
            }
            Ok(Event::Text(t)) => {
                if let Some((_, _, text)) = current.as_mut() {
                    let unescaped = t
                        .unescape()
                        .map_err(|_| Error::ParseError("Invalid escape in timed text"))?;
                    text.push_str(&unescaped);
                }
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"text" => {
                if let Some((start, duration, raw)) = current.take() {
                    if !raw.is_empty() {
                        fragments.push(TranscriptFragment {
                            text: clean_caption_text(&raw),
                            start,
                            duration,
                        });
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to parse timed text");
                return Err(Error::ParseError("Malformed timed text XML"));
            }
            _ => {}
        }
    }

    Ok(fragments)
}

/// Caption text is escaped twice (`&amp;#39;`) and may carry inline
/// formatting tags such as `<font>`.
fn clean_caption_text(raw: &str) -> String {
    let unescaped = quick_xml::escape::unescape(raw).unwrap_or(Cow::Borrowed(raw));
    MARKUP_TAG_RE.replace_all(&unescaped, "").into_owned()
}
