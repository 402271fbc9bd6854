use std::sync::Arc;

use crate::catalog::{pick_picture_size, pick_thumbnail_size, pick_video_profile, select_optimal_preview_size};
use crate::models::capabilities::{CameraCapabilities, FlashMode, Size, VideoProfile};
use crate::models::config::{SelectionPolicy, Viewport};
use crate::models::error::CameraError;
use crate::models::events::{EventSink, PreviewState};
use crate::models::media::{Blob, CaptureRequest, PreviewConfig, RecordingConfig};
use crate::models::state::{CaptureMode, SessionState};
use crate::session::focus_flash::{select_focus_mode, FlashPolicy, FocusSupport, FRONT_CAMERA};
use crate::traits::camera_delegate::CameraDelegate;
use crate::traits::camera_provider::{CameraHandle, CameraProvider};
use crate::traits::media_storage::MediaStorage;

/// Sizes and profile chosen for the acquired camera.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    pub picture_size: Option<Size>,
    pub thumbnail_size: Option<Size>,
    pub video_profile: Option<VideoProfile>,
    pub preview_size: Option<Size>,
}

/// Owns the one acquired camera handle.
///
/// ```text
/// released → acquiring → configuring → streaming → releasing → released
/// ```
pub struct DeviceSession<P: CameraProvider> {
    provider: P,
    handle: Option<P::Handle>,
    state: SessionState,
    camera_index: usize,
    capabilities: Option<CameraCapabilities>,
    selection: Selection,
    flash: FlashPolicy,
    focus: FocusSupport,
    requires_focus_trigger: bool,
    orientation: u32,
    delegate: Option<Arc<dyn CameraDelegate>>,
}

impl<P: CameraProvider> DeviceSession<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            handle: None,
            state: SessionState::Released,
            camera_index: 0,
            capabilities: None,
            selection: Selection::default(),
            flash: FlashPolicy::new(),
            focus: FocusSupport::default(),
            requires_focus_trigger: false,
            orientation: 0,
            delegate: None,
        }
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn CameraDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_acquired(&self) -> bool {
        self.handle.is_some()
    }

    pub fn camera_index(&self) -> usize {
        self.camera_index
    }

    pub fn capabilities(&self) -> Option<&CameraCapabilities> {
        self.capabilities.as_ref()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Every still capture must run `auto_focus` first.
    pub fn requires_focus_trigger(&self) -> bool {
        self.requires_focus_trigger
    }

    pub fn list_cameras(&self) -> Vec<usize> {
        self.provider.list_cameras()
    }

    pub fn has_front_camera(&self) -> bool {
        self.provider.list_cameras().len() > 1
    }

    /// Device orientation in degrees, used for recording rotation.
    pub fn orientation(&self) -> u32 {
        self.orientation
    }

    pub fn set_orientation(&mut self, degrees: u32) {
        self.orientation = degrees % 360;
    }

    /// Acquire a camera, releasing any held handle first.
    pub fn acquire(&mut self, camera_index: usize, events: EventSink) -> Result<(), CameraError> {
        if self.handle.is_some() {
            self.release();
        }

        self.set_state(SessionState::Acquiring);
        match self.provider.acquire(camera_index, events) {
            Ok(handle) => {
                log::info!("acquired camera {}", camera_index);
                self.capabilities = Some(handle.capabilities());
                self.handle = Some(handle);
                self.camera_index = camera_index;
                self.set_state(SessionState::Configuring);
                Ok(())
            }
            Err(e) => {
                log::error!("failed to acquire camera {}: {}", camera_index, e);
                self.set_state(SessionState::Released);
                Err(e)
            }
        }
    }

    /// Run the capability selections, apply flash and focus policy, and
    /// start the preview for `mode`. The session becomes `Streaming` only
    /// when the hardware reports the preview started.
    pub fn configure(
        &mut self,
        mode: CaptureMode,
        policy: &SelectionPolicy,
        viewport: &Viewport,
    ) -> Result<(), CameraError> {
        if self.state != SessionState::Configuring {
            return Err(CameraError::InvalidState(format!(
                "cannot configure in {:?}",
                self.state
            )));
        }
        let capabilities = self.capabilities.clone().ok_or(CameraError::NotAcquired)?;

        let picture_size = pick_picture_size(&capabilities.picture_sizes, policy);
        let thumbnail_size = picture_size
            .and_then(|picture| pick_thumbnail_size(&capabilities.thumbnail_sizes, &picture, viewport));
        let video_profile = pick_video_profile(&capabilities.recorder_profiles, &policy.preferred_profiles, policy)
            .map(|profile| VideoProfile {
                rotation: self.orientation,
                ..profile
            });
        let preview_size = select_optimal_preview_size(&capabilities.preview_sizes, viewport);

        let handle = self.handle.as_mut().ok_or(CameraError::NotAcquired)?;
        if let Some(size) = picture_size {
            handle.set_picture_size(size);
        }
        if let Some(size) = thumbnail_size {
            handle.set_thumbnail_size(size);
        }

        self.selection = Selection {
            picture_size,
            thumbnail_size,
            video_profile,
            preview_size,
        };

        self.flash.update_support(self.camera_index, &capabilities);
        self.focus = FocusSupport::from_capabilities(&capabilities);
        self.apply_flash_mode(mode);
        self.set_focus_mode(mode);

        self.start_preview(mode)?;

        if let Some(ref delegate) = self.delegate {
            delegate.on_configured(&capabilities, self.has_front_camera());
        }
        Ok(())
    }

    /// (Re)start the preview stream for `mode` from the current selection.
    pub fn start_preview(&mut self, mode: CaptureMode) -> Result<(), CameraError> {
        let preview = match mode {
            CaptureMode::Photo => self
                .selection
                .preview_size
                .or(self.selection.picture_size)
                .map(PreviewConfig::Photo),
            CaptureMode::Video => self.selection.video_profile.clone().map(PreviewConfig::Video),
        }
        .ok_or_else(|| CameraError::ConfigurationFailed(format!("no preview available for {:?} mode", mode)))?;

        self.handle()?.start_preview(&preview)
    }

    /// Returns true when this notification moved the session to `Streaming`.
    pub fn on_preview_state_changed(&mut self, preview: PreviewState) -> bool {
        match preview {
            PreviewState::Started if self.state == SessionState::Configuring => {
                self.set_state(SessionState::Streaming);
                true
            }
            other => {
                log::debug!("preview {:?} in {:?}", other, self.state);
                false
            }
        }
    }

    /// Release the hardware. A no-op when nothing is held; a failed
    /// release is logged and the handle dropped anyway.
    pub fn release(&mut self) {
        let Some(mut handle) = self.handle.take() else {
            return;
        };
        self.set_state(SessionState::Releasing);
        if let Err(e) = handle.release() {
            log::warn!("camera {} release failed: {}", self.camera_index, e);
        }
        self.capabilities = None;
        self.requires_focus_trigger = false;
        self.set_state(SessionState::Released);
    }

    /// Apply the stored flash mode for `mode` when the camera supports it.
    pub fn apply_flash_mode(&mut self, mode: CaptureMode) {
        if self.flash.is_supported(self.camera_index, mode) {
            let flash = self.flash.current(self.camera_index, mode);
            if let Some(handle) = self.handle.as_mut() {
                handle.set_flash_mode(flash);
            }
        }
        self.notify_flash(mode);
    }

    pub fn toggle_flash(&mut self, mode: CaptureMode) -> Option<FlashMode> {
        self.flash.advance(self.camera_index, mode);
        self.apply_flash_mode(mode);
        self.flash_mode_name(mode)
    }

    /// `None` means the current camera has no usable flash.
    pub fn flash_mode_name(&self, mode: CaptureMode) -> Option<FlashMode> {
        self.flash.mode_name(self.camera_index, mode)
    }

    pub fn is_front_camera(&self) -> bool {
        self.camera_index == FRONT_CAMERA
    }

    pub fn set_focus_mode(&mut self, mode: CaptureMode) {
        self.requires_focus_trigger = false;
        let Some((focus_mode, trigger)) = select_focus_mode(mode, &self.focus) else {
            log::debug!("no supported focus mode for {:?}", mode);
            return;
        };
        if let Some(handle) = self.handle.as_mut() {
            handle.set_focus_mode(focus_mode);
        }
        self.requires_focus_trigger = trigger;
    }

    pub fn auto_focus(&mut self) -> Result<bool, CameraError> {
        self.handle()?.auto_focus()
    }

    pub fn take_picture(&mut self, request: &CaptureRequest) -> Result<Blob, CameraError> {
        self.handle()?.take_picture(request)
    }

    pub fn resume_preview(&mut self) -> Result<(), CameraError> {
        self.handle()?.resume_preview();
        Ok(())
    }

    pub fn stop_preview(&mut self) -> Result<(), CameraError> {
        self.handle()?.stop_preview();
        Ok(())
    }

    pub fn start_recording(
        &mut self,
        config: &RecordingConfig,
        storage: Arc<dyn MediaStorage>,
        path: &str,
    ) -> Result<(), CameraError> {
        self.handle()?.start_recording(config, storage, path)
    }

    pub fn stop_recording(&mut self) -> Result<(), CameraError> {
        self.handle()?.stop_recording();
        Ok(())
    }

    fn handle(&mut self) -> Result<&mut P::Handle, CameraError> {
        self.handle.as_mut().ok_or(CameraError::NotAcquired)
    }

    fn notify_flash(&self, mode: CaptureMode) {
        if let Some(ref delegate) = self.delegate {
            delegate.on_flash_mode_changed(self.flash_mode_name(mode));
        }
    }

    fn set_state(&mut self, state: SessionState) {
        self.state = state;
        if let Some(ref delegate) = self.delegate {
            delegate.on_session_state_changed(state);
        }
    }
}

impl<P: CameraProvider> Drop for DeviceSession<P> {
    fn drop(&mut self) {
        self.release();
    }
}
