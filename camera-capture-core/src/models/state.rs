use serde::{Deserialize, Serialize};

use super::error::CameraError;

/// Photo or video capture. Switching tears down and reconfigures the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureMode {
    #[default]
    Photo,
    Video,
}

impl CaptureMode {
    pub fn toggled(&self) -> Self {
        match self {
            Self::Photo => Self::Video,
            Self::Video => Self::Photo,
        }
    }
}

/// Lifecycle of the acquired hardware handle.
///
/// ```text
/// released → acquiring → configuring → streaming → releasing → released
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Released,
    Acquiring,
    Configuring,
    Streaming,
    Releasing,
}

impl SessionState {
    pub fn is_released(&self) -> bool {
        matches!(self, Self::Released)
    }

    pub fn is_streaming(&self) -> bool {
        matches!(self, Self::Streaming)
    }
}

/// Still-photo capture state machine.
///
/// ```text
/// idle → (auto-focusing) → capturing → idle
///   ↓
/// failed → idle
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureState {
    Idle,
    AutoFocusing,
    Capturing,
    Failed(CameraError),
}

impl CaptureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Video recording state machine.
///
/// ```text
/// idle → preparing → recording → stopping → awaiting write → extracting poster → idle
///          ↓            ↓
///       failed      size limit stopping → awaiting write
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RecordState {
    Idle,
    Preparing,
    Recording,
    SizeLimitStopping,
    Stopping,
    AwaitingWriteCompletion { file_path: String },
    ExtractingPoster,
    Failed(CameraError),
}

impl RecordState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording)
    }
}

/// Focus indicator state shown around the viewfinder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusState {
    #[default]
    None,
    Focusing,
    Focused,
    Failed,
}
