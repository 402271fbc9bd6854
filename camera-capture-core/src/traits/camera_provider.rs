use std::sync::Arc;

use crate::models::capabilities::{CameraCapabilities, FlashMode, FocusMode, Size};
use crate::models::error::CameraError;
use crate::models::events::EventSink;
use crate::models::media::{Blob, CaptureRequest, PreviewConfig, RecordingConfig};
use crate::traits::media_storage::MediaStorage;

/// Entry point to the platform camera hardware.
///
/// Implemented by:
/// - `SimCameraProvider` (camera-capture-sim)
pub trait CameraProvider: Send {
    type Handle: CameraHandle;

    /// Indices of the cameras present (0 = rear, 1 = front).
    fn list_cameras(&self) -> Vec<usize>;

    /// Acquire a camera. Asynchronous hardware notifications for the
    /// returned handle (shutter, preview state, recorder state) go to
    /// `events`.
    fn acquire(&mut self, camera_index: usize, events: EventSink) -> Result<Self::Handle, CameraError>;
}

/// One acquired camera.
///
/// Callback-based platform APIs block until their completion callback
/// fires; only the notifications listed on [`CameraProvider::acquire`] are
/// delivered asynchronously.
pub trait CameraHandle: Send {
    /// Capability lists reported by this camera.
    fn capabilities(&self) -> CameraCapabilities;

    /// Release the hardware. The handle is unusable afterwards even if
    /// this fails.
    fn release(&mut self) -> Result<(), CameraError>;

    fn set_picture_size(&mut self, size: Size);

    fn set_thumbnail_size(&mut self, size: Size);

    fn set_flash_mode(&mut self, mode: FlashMode);

    fn set_focus_mode(&mut self, mode: FocusMode);

    /// Start streaming preview frames. The stream is live only once a
    /// `PreviewState::Started` notification arrives.
    fn start_preview(&mut self, config: &PreviewConfig) -> Result<(), CameraError>;

    fn stop_preview(&mut self);

    /// Resume the viewfinder after a still capture froze it.
    fn resume_preview(&mut self);

    /// Run one auto-focus cycle. `Ok(false)` means focus was not achieved.
    fn auto_focus(&mut self) -> Result<bool, CameraError>;

    fn take_picture(&mut self, request: &CaptureRequest) -> Result<Blob, CameraError>;

    /// Start recording into `storage` at the storage-relative `path`.
    fn start_recording(
        &mut self,
        config: &RecordingConfig,
        storage: Arc<dyn MediaStorage>,
        path: &str,
    ) -> Result<(), CameraError>;

    /// Stop recording. Completion of the file write is signalled separately
    /// by a storage `Modified` notification for the file.
    fn stop_recording(&mut self);
}
