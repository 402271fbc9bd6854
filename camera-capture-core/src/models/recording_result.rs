use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::media::Blob;

/// The one in-flight recording.
///
/// Created when the hardware confirms the recording started, dropped once
/// the recording is finalised or fails.
#[derive(Debug, Clone)]
pub struct RecordingSession {
    pub id: String,
    /// Storage-relative path handed to the recorder.
    pub path: String,
    /// Absolute path the storage reports in change notifications.
    pub file_path: String,
    pub started_at: DateTime<Utc>,
    pub max_file_size_bytes: u64,
    started: Instant,
}

impl RecordingSession {
    pub fn new(path: String, file_path: String, max_file_size_bytes: u64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            path,
            file_path,
            started_at: Utc::now(),
            max_file_size_bytes,
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Intrinsic properties of a recorded video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    /// Degrees clockwise; always one of 0, 90, 180, 270.
    pub rotation: u32,
}

/// A finished recording together with its poster frame.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedVideo {
    /// Absolute path of the video file.
    pub file: String,
    pub video: Blob,
    pub poster: Blob,
    pub metadata: VideoMetadata,
}

impl CompletedVideo {
    pub fn width(&self) -> u32 {
        self.metadata.width
    }

    pub fn height(&self) -> u32 {
        self.metadata.height
    }

    pub fn rotation(&self) -> u32 {
        self.metadata.rotation
    }
}
