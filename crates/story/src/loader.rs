use std::fs;
use std::path::{Path, PathBuf};

use crate::model::Story;

#[derive(Debug, thiserror::Error)]
pub enum StoryLoadError {
    #[error("failed to read story {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse story json{}: {source}", at_path(.path))]
    Parse {
        /// JSON path of the offending value, `.` when the document itself is malformed.
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

fn at_path(path: &str) -> String {
    if path.is_empty() || path == "." {
        String::new()
    } else {
        format!(" at {path}")
    }
}

impl Story {
    pub fn from_json_str(payload: &str) -> Result<Self, StoryLoadError> {
        let mut deserializer = serde_json::Deserializer::from_str(payload);
        let story: Story =
            serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
                let path = error.path().to_string();
                StoryLoadError::Parse {
                    path,
                    source: error.into_inner(),
                }
            })?;
        deserializer.end().map_err(|source| StoryLoadError::Parse {
            path: ".".to_string(),
            source,
        })?;
        Ok(story)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoryLoadError> {
        let path = path.as_ref();
        let payload = fs::read_to_string(path).map_err(|source| StoryLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&payload)
    }
}
