use std::sync::Arc;

use crate::models::error::CameraError;
use crate::models::media::{Blob, CaptureRequest};
use crate::models::state::{CaptureState, FocusState};
use crate::session::device::DeviceSession;
use crate::traits::camera_delegate::CameraDelegate;
use crate::traits::camera_provider::CameraProvider;

/// Still-photo capture.
///
/// One capture at a time; a capture requested while another is in flight
/// is rejected without touching the hardware.
pub struct CaptureController {
    state: CaptureState,
    delegate: Option<Arc<dyn CameraDelegate>>,
}

impl Default for CaptureController {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureController {
    pub fn new() -> Self {
        Self {
            state: CaptureState::Idle,
            delegate: None,
        }
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn CameraDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    /// Take one picture.
    ///
    /// Runs auto-focus first when the device needs a manual trigger. A
    /// focus miss aborts the capture with `FocusFailed`. After a successful
    /// capture the preview is resumed unless `hold_frame` is set (a pick
    /// confirmation keeps the still frame on screen).
    pub fn capture<P: CameraProvider>(
        &mut self,
        device: &mut DeviceSession<P>,
        request: &CaptureRequest,
        hold_frame: bool,
    ) -> Result<Blob, CameraError> {
        if !self.state.is_idle() {
            return Err(CameraError::InvalidState(format!(
                "capture requested while {:?}",
                self.state
            )));
        }

        self.set_input_enabled(false);

        if device.requires_focus_trigger() {
            self.set_state(CaptureState::AutoFocusing);
            self.set_focus(FocusState::Focusing);
            let focused = device.auto_focus().unwrap_or_else(|e| {
                log::warn!("auto-focus error: {}", e);
                false
            });
            if !focused {
                self.set_focus(FocusState::Failed);
                self.set_state(CaptureState::Idle);
                self.set_input_enabled(true);
                return Err(CameraError::FocusFailed);
            }
            self.set_focus(FocusState::Focused);
        }

        self.set_state(CaptureState::Capturing);
        let result = device.take_picture(request);

        match result {
            Ok(blob) => {
                if !hold_frame {
                    self.resume_preview(device);
                }
                self.set_state(CaptureState::Idle);
                self.set_input_enabled(true);
                Ok(blob)
            }
            Err(e) => {
                log::error!("capture failed: {}", e);
                let e = match e {
                    CameraError::CaptureFailed(_) => e,
                    other => CameraError::CaptureFailed(other.to_string()),
                };
                self.set_state(CaptureState::Failed(e.clone()));
                self.resume_preview(device);
                self.set_state(CaptureState::Idle);
                self.set_input_enabled(true);
                Err(e)
            }
        }
    }

    fn resume_preview<P: CameraProvider>(&self, device: &mut DeviceSession<P>) {
        match device.resume_preview() {
            Ok(()) => {
                if let Some(ref delegate) = self.delegate {
                    delegate.on_preview_resumed();
                }
            }
            Err(e) => log::warn!("failed to resume preview: {}", e),
        }
    }

    fn set_state(&mut self, state: CaptureState) {
        self.state = state;
        if let Some(ref delegate) = self.delegate {
            delegate.on_capture_state_changed(&self.state);
        }
    }

    fn set_focus(&self, state: FocusState) {
        if let Some(ref delegate) = self.delegate {
            delegate.on_focus_state_changed(state);
        }
    }

    fn set_input_enabled(&self, enabled: bool) {
        if let Some(ref delegate) = self.delegate {
            delegate.on_input_enabled(enabled);
        }
    }
}
