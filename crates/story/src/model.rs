use std::fmt;
use std::str::FromStr;

use foundation::math::Ecef;
use foundation::{HeadingPitchRoll, LatLng};
use serde::{Deserialize, Deserializer, Serialize};

/// Stable chapter identity, independent of the chapter's position in the
/// sequence. Ids need not be contiguous or sorted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ChapterId(pub i64);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid chapter id {0:?}")]
pub struct ParseChapterIdError(pub String);

impl FromStr for ChapterId {
    type Err = ParseChapterIdError;

    /// Accepts the integer forms a URL or story file may carry: `7`, ` 7 `,
    /// `+7` and integral floats such as `7.0`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(n) = trimmed.parse::<i64>() {
            return Ok(ChapterId(n));
        }
        match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() <= i64::MAX as f64 => {
                Ok(ChapterId(f as i64))
            }
            _ => Err(ParseChapterIdError(s.to_string())),
        }
    }
}

impl fmt::Display for ChapterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for ChapterId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Float(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Int(n) => Ok(ChapterId(n)),
            Raw::Float(f) => f.to_string().parse().map_err(serde::de::Error::custom),
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Destination camera pose for a fly-to.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraOptions {
    pub position: Ecef,
    #[serde(flatten)]
    pub orientation: HeadingPitchRoll,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusOptions {
    /// `None` lets the renderer pick its default radius.
    #[serde(default)]
    pub focus_radius: Option<f64>,
    #[serde(default)]
    pub show_focus: bool,
    #[serde(default)]
    pub show_location_marker: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_credit: Option<String>,
}

impl Media {
    /// Credit line shown under the media, if the story names one.
    pub fn credit(&self) -> Option<&str> {
        self.media_credit.as_deref().filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: ChapterId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "description")]
    pub content: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub date_time: Option<String>,
    #[serde(default)]
    pub coords: Option<LatLng>,
    pub camera_options: CameraOptions,
    #[serde(default)]
    pub focus_options: FocusOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<Media>,
}

/// The story-level fields shown on the intro overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntroProperties {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub date_time: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_credit: Option<String>,
    pub camera_options: CameraOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<Media>,
}

/// An immutable tour: intro properties plus chapters in navigation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub properties: IntroProperties,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

impl Story {
    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    pub fn chapter(&self, index: usize) -> Option<&Chapter> {
        self.chapters.get(index)
    }

    pub fn last_index(&self) -> Option<usize> {
        self.chapters.len().checked_sub(1)
    }

    /// Resolves a stable id to its position in the sequence.
    ///
    /// The first chapter wins if a story repeats an id.
    pub fn index_of(&self, id: ChapterId) -> Option<usize> {
        self.chapters.iter().position(|c| c.id == id)
    }
}
