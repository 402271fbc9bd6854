//! Simulated camera hardware.
//!
//! Every call made on a handle is appended to a shared [`CallLog`] so tests
//! can assert on ordering. Behaviour is steered through [`SimKnobs`].

use std::sync::Arc;

use parking_lot::Mutex;

use camera_capture_core::models::capabilities::{
    CameraCapabilities, FlashMode, FocusMode, RecorderProfile, Size, VideoProfile,
};
use camera_capture_core::models::error::CameraError;
use camera_capture_core::models::events::{DeviceEvent, EventSink, PreviewState};
use camera_capture_core::models::media::{Blob, CaptureRequest, PreviewConfig, RecordingConfig, MIME_3GPP};
use camera_capture_core::traits::camera_provider::{CameraHandle, CameraProvider};
use camera_capture_core::traits::media_storage::MediaStorage;

use crate::sim_decoder::{encode_video, MAGIC};

/// One call made on the simulated hardware.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    Acquire(usize),
    Release,
    SetPictureSize(Size),
    SetThumbnailSize(Size),
    SetFlashMode(FlashMode),
    SetFocusMode(FocusMode),
    StartPreview(PreviewConfig),
    StopPreview,
    ResumePreview,
    AutoFocus,
    TakePicture(CaptureRequest),
    StartRecording { path: String, config: RecordingConfig },
    StopRecording,
}

/// Shared, append-only record of hardware calls.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<DeviceCall>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, call: DeviceCall) {
        log::trace!("sim camera: {:?}", call);
        self.calls.lock().push(call);
    }

    pub fn calls(&self) -> Vec<DeviceCall> {
        self.calls.lock().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    pub fn count(&self, pred: impl Fn(&DeviceCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|c| pred(c)).count()
    }

    /// Index of the first call matching `pred`.
    pub fn position(&self, pred: impl Fn(&DeviceCall) -> bool) -> Option<usize> {
        self.calls.lock().iter().position(|c| pred(c))
    }
}

/// Failure and timing switches for the simulated hardware.
#[derive(Debug, Clone, Default)]
pub struct SimKnobs {
    pub fail_acquire: bool,
    pub fail_release: bool,
    /// `auto_focus` reports focus not achieved.
    pub focus_fails: bool,
    pub fail_picture: bool,
    pub fail_record: bool,
    /// Flush a truncated, undecodable container on stop, as a recording
    /// stopped before any samples were written would.
    pub short_recording: bool,
    /// Do not report the preview started; tests emit it themselves.
    pub hold_preview_start: bool,
}

/// Capabilities of a typical rear camera. Photos need an explicit
/// auto-focus cycle; video focuses continuously.
pub fn rear_camera() -> CameraCapabilities {
    CameraCapabilities {
        picture_sizes: vec![
            Size::new(2048, 1536),
            Size::new(1600, 1200),
            Size::new(1024, 768),
            Size::new(640, 480),
        ],
        thumbnail_sizes: vec![Size::new(160, 120), Size::new(320, 240)],
        preview_sizes: vec![Size::new(1280, 720), Size::new(640, 480), Size::new(320, 240)],
        recorder_profiles: vec![
            RecorderProfile::new("720p", 1280, 720),
            RecorderProfile::new("cif", 352, 288),
            RecorderProfile::new("qcif", 176, 144),
        ],
        flash_modes: ["off", "auto", "on", "torch"].iter().map(|s| s.to_string()).collect(),
        focus_modes: vec!["auto".into(), "continuous-video".into()],
    }
}

/// Capabilities of a typical front camera: no flash, fixed focus.
pub fn front_camera() -> CameraCapabilities {
    CameraCapabilities {
        picture_sizes: vec![Size::new(640, 480)],
        thumbnail_sizes: vec![Size::new(160, 120)],
        preview_sizes: vec![Size::new(640, 480)],
        recorder_profiles: vec![RecorderProfile::new("qcif", 176, 144)],
        flash_modes: Vec::new(),
        focus_modes: Vec::new(),
    }
}

pub struct SimCameraProvider {
    cameras: Vec<CameraCapabilities>,
    calls: CallLog,
    knobs: Arc<Mutex<SimKnobs>>,
}

impl SimCameraProvider {
    pub fn new(cameras: Vec<CameraCapabilities>) -> Self {
        Self {
            cameras,
            calls: CallLog::new(),
            knobs: Arc::default(),
        }
    }

    /// A rear and a front camera.
    pub fn with_default_cameras() -> Self {
        Self::new(vec![rear_camera(), front_camera()])
    }

    pub fn calls(&self) -> CallLog {
        self.calls.clone()
    }

    pub fn knobs(&self) -> Arc<Mutex<SimKnobs>> {
        Arc::clone(&self.knobs)
    }
}

impl CameraProvider for SimCameraProvider {
    type Handle = SimCameraHandle;

    fn list_cameras(&self) -> Vec<usize> {
        (0..self.cameras.len()).collect()
    }

    fn acquire(&mut self, camera_index: usize, events: EventSink) -> Result<SimCameraHandle, CameraError> {
        self.calls.push(DeviceCall::Acquire(camera_index));
        if self.knobs.lock().fail_acquire {
            return Err(CameraError::AcquireFailed("camera in use".into()));
        }
        let capabilities = self
            .cameras
            .get(camera_index)
            .cloned()
            .ok_or_else(|| CameraError::AcquireFailed(format!("no camera {}", camera_index)))?;

        Ok(SimCameraHandle {
            capabilities,
            calls: self.calls.clone(),
            knobs: Arc::clone(&self.knobs),
            events,
            video_profile: None,
            recording: None,
        })
    }
}

struct ActiveRecording {
    storage: Arc<dyn MediaStorage>,
    path: String,
    config: RecordingConfig,
}

pub struct SimCameraHandle {
    capabilities: CameraCapabilities,
    calls: CallLog,
    knobs: Arc<Mutex<SimKnobs>>,
    events: EventSink,
    video_profile: Option<VideoProfile>,
    recording: Option<ActiveRecording>,
}

impl SimCameraHandle {
    fn recorded_video(&self, config: &RecordingConfig) -> Vec<u8> {
        if self.knobs.lock().short_recording {
            return MAGIC.to_vec();
        }
        let (width, height) = self
            .video_profile
            .as_ref()
            .map_or((352, 288), |p| (p.width, p.height));
        let payload = config.max_file_size_bytes.min(4096) as usize;
        encode_video(width, height, config.rotation as u16, payload)
    }
}

impl CameraHandle for SimCameraHandle {
    fn capabilities(&self) -> CameraCapabilities {
        self.capabilities.clone()
    }

    fn release(&mut self) -> Result<(), CameraError> {
        self.calls.push(DeviceCall::Release);
        if self.knobs.lock().fail_release {
            return Err(CameraError::InvalidState("release callback reported failure".into()));
        }
        Ok(())
    }

    fn set_picture_size(&mut self, size: Size) {
        self.calls.push(DeviceCall::SetPictureSize(size));
    }

    fn set_thumbnail_size(&mut self, size: Size) {
        self.calls.push(DeviceCall::SetThumbnailSize(size));
    }

    fn set_flash_mode(&mut self, mode: FlashMode) {
        self.calls.push(DeviceCall::SetFlashMode(mode));
    }

    fn set_focus_mode(&mut self, mode: FocusMode) {
        self.calls.push(DeviceCall::SetFocusMode(mode));
    }

    fn start_preview(&mut self, config: &PreviewConfig) -> Result<(), CameraError> {
        self.calls.push(DeviceCall::StartPreview(config.clone()));
        if let PreviewConfig::Video(profile) = config {
            self.video_profile = Some(profile.clone());
        }
        if !self.knobs.lock().hold_preview_start {
            self.events
                .emit_device(DeviceEvent::PreviewStateChanged(PreviewState::Started));
        }
        Ok(())
    }

    fn stop_preview(&mut self) {
        self.calls.push(DeviceCall::StopPreview);
        self.events
            .emit_device(DeviceEvent::PreviewStateChanged(PreviewState::Stopped));
    }

    fn resume_preview(&mut self) {
        self.calls.push(DeviceCall::ResumePreview);
    }

    fn auto_focus(&mut self) -> Result<bool, CameraError> {
        self.calls.push(DeviceCall::AutoFocus);
        Ok(!self.knobs.lock().focus_fails)
    }

    fn take_picture(&mut self, request: &CaptureRequest) -> Result<Blob, CameraError> {
        self.calls.push(DeviceCall::TakePicture(request.clone()));
        if self.knobs.lock().fail_picture {
            return Err(CameraError::CaptureFailed("sensor timeout".into()));
        }
        self.events.emit_device(DeviceEvent::Shutter);
        Ok(Blob::jpeg(vec![0xff, 0xd8, 0x00, 0x01, 0xff, 0xd9]))
    }

    fn start_recording(
        &mut self,
        config: &RecordingConfig,
        storage: Arc<dyn MediaStorage>,
        path: &str,
    ) -> Result<(), CameraError> {
        self.calls.push(DeviceCall::StartRecording {
            path: path.to_string(),
            config: *config,
        });
        if self.knobs.lock().fail_record {
            return Err(CameraError::RecordingFailed("encoder unavailable".into()));
        }
        self.recording = Some(ActiveRecording {
            storage,
            path: path.to_string(),
            config: *config,
        });
        Ok(())
    }

    fn stop_recording(&mut self) {
        self.calls.push(DeviceCall::StopRecording);
        let Some(recording) = self.recording.take() else {
            return;
        };
        let blob = Blob::new(MIME_3GPP, self.recorded_video(&recording.config));
        if let Err(e) = recording.storage.add_named(&blob, &recording.path) {
            log::error!("sim recorder failed to flush {}: {}", recording.path, e);
        }
    }
}
