use serde::{Deserialize, Serialize};

use super::capabilities::{Size, VideoProfile};
use super::recording_result::CompletedVideo;

pub const MIME_JPEG: &str = "image/jpeg";
pub const MIME_3GPP: &str = "video/3gpp";

/// An opaque media payload plus its MIME type.
#[derive(Clone, PartialEq, Eq)]
pub struct Blob {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl Blob {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    pub fn jpeg(data: Vec<u8>) -> Self {
        Self::new(MIME_JPEG, data)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl std::fmt::Debug for Blob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Blob")
            .field("mime_type", &self.mime_type)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Geolocation fix attached to photo EXIF.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub timestamp: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Jpeg,
}

/// Parameters handed to the hardware for one still capture.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaptureRequest {
    /// Device orientation in degrees.
    pub orientation: u32,
    /// Unix seconds.
    pub date_time: i64,
    pub file_format: FileFormat,
    pub position: Option<GeoPosition>,
}

/// Which preview stream to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewConfig {
    Photo(Size),
    Video(VideoProfile),
}

/// Parameters handed to the hardware to start a recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordingConfig {
    pub rotation: u32,
    pub max_file_size_bytes: u64,
}

/// A photo that has been written to picture storage.
#[derive(Debug, Clone, PartialEq)]
pub struct NewImage {
    /// Absolute path returned by the storage.
    pub path: String,
    pub blob: Blob,
}

/// Constraints carried by a pending pick request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PickData {
    pub max_file_size_bytes: Option<u64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl PickData {
    /// The requested size, only when both dimensions are present and non-zero.
    pub fn target_size(&self) -> Option<Size> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some(Size::new(w, h)),
            _ => None,
        }
    }

    pub fn target_file_size(&self) -> Option<u64> {
        self.max_file_size_bytes.filter(|&bytes| bytes > 0)
    }
}

/// What is handed back to the app that issued the pick.
#[derive(Debug, Clone, PartialEq)]
pub struct PickResult {
    pub mime_type: String,
    pub blob: Blob,
    pub poster: Option<Blob>,
}

/// Media held on screen until the user of a pick confirms or retakes it.
#[derive(Debug, Clone, PartialEq)]
pub enum HeldMedia {
    Image(Blob),
    Video(CompletedVideo),
}
