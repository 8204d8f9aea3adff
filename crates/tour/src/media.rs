use story::{Media, MediaKind};
use url::Url;

/// What the media area should show for a chapter's attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaEmbed {
    Image { url: String },
    Video { video_id: String },
    /// Shown as "No media available or invalid media type".
    Unsupported,
}

impl MediaEmbed {
    pub const UNSUPPORTED_MESSAGE: &'static str = "No media available or invalid media type";

    pub fn resolve(media: &Media) -> Self {
        match media.kind {
            MediaKind::Image if !media.url.trim().is_empty() => MediaEmbed::Image {
                url: media.url.trim().to_string(),
            },
            MediaKind::Video => match youtube_video_id(&media.url) {
                Some(video_id) => MediaEmbed::Video { video_id },
                None => MediaEmbed::Unsupported,
            },
            _ => MediaEmbed::Unsupported,
        }
    }
}

const YOUTUBE_ID_LEN: usize = 11;

/// Extracts the 11-character video id from the common YouTube URL shapes:
/// `watch?v=`, `youtu.be/`, `/embed/` and `/shorts/`.
pub fn youtube_video_id(url: &str) -> Option<String> {
    let url = Url::parse(url.trim()).ok()?;
    let host = url.host_str()?;
    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());

    let candidate = if host == "youtu.be" {
        segments.next()?.to_string()
    } else if host == "youtube.com" || host.ends_with(".youtube.com") {
        match segments.next()? {
            "embed" | "shorts" => segments.next()?.to_string(),
            "watch" => url
                .query_pairs()
                .find_map(|(k, v)| (k == "v").then(|| v.into_owned()))?,
            _ => return None,
        }
    } else {
        return None;
    };

    let valid = candidate.len() == YOUTUBE_ID_LEN
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    valid.then_some(candidate)
}
