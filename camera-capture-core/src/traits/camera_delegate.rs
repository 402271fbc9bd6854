use crate::models::capabilities::{CameraCapabilities, FlashMode};
use crate::models::error::CameraError;
use crate::models::media::{HeldMedia, NewImage};
use crate::models::recording_result::CompletedVideo;
use crate::models::state::{CaptureMode, CaptureState, FocusState, RecordState, SessionState};
use crate::models::storage_state::{Overlay, StorageState};

/// Which message to show when the recorder hits its file size limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeLimitAlert {
    /// The limit came from a pick request.
    Activity,
    /// The limit came from free storage space.
    Storage,
}

impl SizeLimitAlert {
    pub fn l10n_key(&self) -> &'static str {
        match self {
            Self::Activity => "activity-size-limit-reached",
            Self::Storage => "storage-size-limit-reached",
        }
    }
}

/// Event delegate for camera notifications.
///
/// Everything is called on the thread that drives the `Camera`, except
/// `on_video_time_update`, which fires from the recording timer thread.
/// Every method defaults to a no-op.
pub trait CameraDelegate: Send + Sync {
    fn on_session_state_changed(&self, _state: SessionState) {}

    fn on_capture_state_changed(&self, _state: &CaptureState) {}

    fn on_record_state_changed(&self, _state: &RecordState) {}

    fn on_focus_state_changed(&self, _state: FocusState) {}

    fn on_capture_mode_changed(&self, _mode: CaptureMode) {}

    /// Capture/record buttons should be enabled or disabled.
    fn on_input_enabled(&self, _enabled: bool) {}

    fn on_preview_resumed(&self) {}

    fn on_shutter(&self) {}

    /// A camera was acquired and configured.
    fn on_configured(&self, _capabilities: &CameraCapabilities, _has_front_camera: bool) {}

    /// `None` means the current camera has no usable flash.
    fn on_flash_mode_changed(&self, _mode: Option<FlashMode>) {}

    /// Elapsed recording time, formatted `mm:ss` or `h:mm:ss`.
    fn on_video_time_update(&self, _elapsed: &str) {}

    fn on_storage_state_changed(&self, _state: StorageState, _overlay: Option<Overlay>) {}

    /// A file was deleted from picture storage by someone else.
    fn on_item_deleted(&self, _path: &str) {}

    fn on_new_image(&self, _image: &NewImage) {}

    fn on_new_video(&self, _video: &CompletedVideo) {}

    /// Media is held for the user of a pending pick to confirm or retake.
    fn on_confirm_media(&self, _media: &HeldMedia) {}

    fn on_size_limit_reached(&self, _alert: SizeLimitAlert) {}

    /// A user-facing error; see `CameraError::notice`.
    fn on_error(&self, _error: &CameraError) {}
}
