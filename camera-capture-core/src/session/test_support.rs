//! Scripted hardware, storage and delegate doubles for unit tests.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::capabilities::{CameraCapabilities, FlashMode, FocusMode, RecorderProfile, Size};
use crate::models::error::CameraError;
use crate::models::events::{DeviceEvent, EventSink, PreviewState};
use crate::models::media::{Blob, CaptureRequest, PreviewConfig, RecordingConfig};
use crate::models::state::{CaptureState, FocusState, RecordState};
use crate::models::storage_state::StorageAvailability;
use crate::traits::camera_delegate::{CameraDelegate, SizeLimitAlert};
use crate::traits::camera_provider::{CameraHandle, CameraProvider};
use crate::traits::media_storage::MediaStorage;

pub type Calls = Arc<Mutex<Vec<String>>>;

pub fn capabilities() -> CameraCapabilities {
    CameraCapabilities {
        picture_sizes: vec![Size::new(1600, 1200), Size::new(640, 480)],
        thumbnail_sizes: vec![Size::new(320, 240)],
        preview_sizes: vec![Size::new(640, 480), Size::new(320, 240)],
        recorder_profiles: vec![
            RecorderProfile::new("cif", 352, 288),
            RecorderProfile::new("qcif", 176, 144),
        ],
        flash_modes: ["off", "auto", "on", "torch"].iter().map(|s| s.to_string()).collect(),
        focus_modes: vec!["auto".into()],
    }
}

#[derive(Clone, Default)]
pub struct Knobs {
    pub fail_acquire: bool,
    pub fail_release: bool,
    pub focus_fails: bool,
    pub fail_picture: bool,
    pub fail_record: bool,
}

pub struct MockProvider {
    pub cameras: Vec<CameraCapabilities>,
    pub calls: Calls,
    pub knobs: Arc<Mutex<Knobs>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            cameras: vec![capabilities(), capabilities()],
            calls: Calls::default(),
            knobs: Arc::default(),
        }
    }
}

impl CameraProvider for MockProvider {
    type Handle = MockHandle;

    fn list_cameras(&self) -> Vec<usize> {
        (0..self.cameras.len()).collect()
    }

    fn acquire(&mut self, camera_index: usize, events: EventSink) -> Result<MockHandle, CameraError> {
        self.calls.lock().push(format!("acquire {}", camera_index));
        if self.knobs.lock().fail_acquire {
            return Err(CameraError::AcquireFailed("busy".into()));
        }
        let capabilities = self
            .cameras
            .get(camera_index)
            .cloned()
            .ok_or_else(|| CameraError::AcquireFailed(format!("no camera {}", camera_index)))?;
        Ok(MockHandle {
            capabilities,
            calls: self.calls.clone(),
            knobs: self.knobs.clone(),
            events,
        })
    }
}

pub struct MockHandle {
    capabilities: CameraCapabilities,
    calls: Calls,
    knobs: Arc<Mutex<Knobs>>,
    events: EventSink,
}

impl MockHandle {
    fn log(&self, call: String) {
        self.calls.lock().push(call);
    }
}

impl CameraHandle for MockHandle {
    fn capabilities(&self) -> CameraCapabilities {
        self.capabilities.clone()
    }

    fn release(&mut self) -> Result<(), CameraError> {
        self.log("release".into());
        if self.knobs.lock().fail_release {
            return Err(CameraError::InvalidState("release failed".into()));
        }
        Ok(())
    }

    fn set_picture_size(&mut self, size: Size) {
        self.log(format!("picture {}x{}", size.width, size.height));
    }

    fn set_thumbnail_size(&mut self, size: Size) {
        self.log(format!("thumbnail {}x{}", size.width, size.height));
    }

    fn set_flash_mode(&mut self, mode: FlashMode) {
        self.log(format!("flash {}", mode.as_str()));
    }

    fn set_focus_mode(&mut self, mode: FocusMode) {
        self.log(format!("focus {}", mode.as_str()));
    }

    fn start_preview(&mut self, config: &PreviewConfig) -> Result<(), CameraError> {
        self.log(match config {
            PreviewConfig::Photo(size) => format!("preview photo {}x{}", size.width, size.height),
            PreviewConfig::Video(profile) => format!("preview video {}", profile.profile_name),
        });
        self.events
            .emit_device(DeviceEvent::PreviewStateChanged(PreviewState::Started));
        Ok(())
    }

    fn stop_preview(&mut self) {
        self.log("stop preview".into());
    }

    fn resume_preview(&mut self) {
        self.log("resume preview".into());
    }

    fn auto_focus(&mut self) -> Result<bool, CameraError> {
        self.log("auto focus".into());
        Ok(!self.knobs.lock().focus_fails)
    }

    fn take_picture(&mut self, request: &CaptureRequest) -> Result<Blob, CameraError> {
        self.log(format!("take picture {}", request.position.is_some()));
        if self.knobs.lock().fail_picture {
            return Err(CameraError::CaptureFailed("sensor".into()));
        }
        self.events.emit_device(DeviceEvent::Shutter);
        Ok(Blob::jpeg(vec![0xff, 0xd8, 0xff]))
    }

    fn start_recording(
        &mut self,
        config: &RecordingConfig,
        _storage: Arc<dyn MediaStorage>,
        path: &str,
    ) -> Result<(), CameraError> {
        self.log(format!("start recording {} {}", path, config.max_file_size_bytes));
        if self.knobs.lock().fail_record {
            return Err(CameraError::RecordingFailed("encoder".into()));
        }
        Ok(())
    }

    fn stop_recording(&mut self) {
        self.log("stop recording".into());
    }
}

/// In-memory storage rooted at `/sdcard/`.
pub struct MapStorage {
    pub files: Mutex<HashMap<String, Blob>>,
    pub free: Mutex<u64>,
    pub availability: Mutex<StorageAvailability>,
}

impl MapStorage {
    pub const ROOT: &'static str = "/sdcard/";

    pub fn new(free: u64) -> Self {
        Self {
            files: Mutex::default(),
            free: Mutex::new(free),
            availability: Mutex::new(StorageAvailability::Available),
        }
    }

    fn absolute(path: &str) -> String {
        if path.starts_with(Self::ROOT) {
            path.to_string()
        } else {
            format!("{}{}", Self::ROOT, path)
        }
    }
}

impl MediaStorage for MapStorage {
    fn add_named(&self, blob: &Blob, path: &str) -> Result<String, CameraError> {
        let absolute = Self::absolute(path);
        let mut files = self.files.lock();
        if files.contains_key(&absolute) {
            return Err(CameraError::StorageWriteFailed(format!("{} exists", absolute)));
        }
        files.insert(absolute.clone(), blob.clone());
        Ok(absolute)
    }

    fn get(&self, path: &str) -> Result<Blob, CameraError> {
        self.files
            .lock()
            .get(&Self::absolute(path))
            .cloned()
            .ok_or_else(|| CameraError::StorageReadFailed(path.into()))
    }

    fn delete(&self, path: &str) -> Result<(), CameraError> {
        self.files.lock().remove(&Self::absolute(path));
        Ok(())
    }

    fn free_space(&self) -> Result<u64, CameraError> {
        Ok(*self.free.lock())
    }

    fn available(&self) -> Result<StorageAvailability, CameraError> {
        Ok(*self.availability.lock())
    }
}

/// Records every delegate notification as a short string.
#[derive(Default)]
pub struct EventLog {
    pub entries: Mutex<Vec<String>>,
}

impl EventLog {
    pub fn contains(&self, entry: &str) -> bool {
        self.entries.lock().iter().any(|e| e == entry)
    }

    pub fn count(&self, entry: &str) -> usize {
        self.entries.lock().iter().filter(|e| *e == entry).count()
    }

    fn push(&self, entry: String) {
        self.entries.lock().push(entry);
    }
}

impl CameraDelegate for EventLog {
    fn on_capture_state_changed(&self, state: &CaptureState) {
        self.push(format!("capture {:?}", state));
    }

    fn on_record_state_changed(&self, state: &RecordState) {
        self.push(format!("record {:?}", state));
    }

    fn on_focus_state_changed(&self, state: FocusState) {
        self.push(format!("focus {:?}", state));
    }

    fn on_input_enabled(&self, enabled: bool) {
        self.push(format!("input {}", enabled));
    }

    fn on_preview_resumed(&self) {
        self.push("preview resumed".into());
    }

    fn on_size_limit_reached(&self, alert: SizeLimitAlert) {
        self.push(format!("alert {}", alert.l10n_key()));
    }

    fn on_error(&self, error: &CameraError) {
        self.push(format!("error {}", error));
    }
}
