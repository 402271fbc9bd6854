use thiserror::Error;

use super::storage_state::StorageState;

/// Errors that can occur while driving the camera hardware and its storage.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CameraError {
    #[error("camera acquire failed: {0}")]
    AcquireFailed(String),

    #[error("no camera hardware is acquired")]
    NotAcquired,

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("capture failed: {0}")]
    CaptureFailed(String),

    #[error("recording failed: {0}")]
    RecordingFailed(String),

    #[error("auto-focus failed")]
    FocusFailed,

    #[error("storage write failed: {0}")]
    StorageWriteFailed(String),

    #[error("storage read failed: {0}")]
    StorageReadFailed(String),

    #[error("not enough storage space: {free_bytes} bytes free, {required_bytes} required")]
    StorageSpaceExhausted { free_bytes: u64, required_bytes: u64 },

    #[error("storage unavailable: {0:?}")]
    StorageUnavailable(StorageState),

    #[error("media extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("invalid state: {0}")]
    InvalidState(String),
}

/// Localisation keys for a user-facing error message.
///
/// The UI resolves `<title_key>` and `<text_key>` and shows them as
/// `"<title>. <text>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorNotice {
    pub title_key: &'static str,
    pub text_key: &'static str,
}

impl ErrorNotice {
    const fn new(title_key: &'static str, text_key: &'static str) -> Self {
        Self { title_key, text_key }
    }
}

impl CameraError {
    /// The user-facing message for this error, if it has one.
    ///
    /// Focus failures are shown through the focus indicator, storage
    /// unavailability through the overlay, and extraction failures are
    /// silent (the corrupt file is deleted), so those return `None`.
    pub fn notice(&self) -> Option<ErrorNotice> {
        match self {
            Self::CaptureFailed(_) | Self::StorageWriteFailed(_) => {
                Some(ErrorNotice::new("error-saving-title", "error-saving-text"))
            }
            Self::RecordingFailed(_) | Self::StorageReadFailed(_) => {
                Some(ErrorNotice::new("error-recording-title", "error-recording-text"))
            }
            Self::StorageSpaceExhausted { .. } => {
                Some(ErrorNotice::new("nospace2-title", "nospace2-text"))
            }
            _ => None,
        }
    }
}
