//! Shared rig for end-to-end camera tests.
//!
//! [`Rig`] wires a `Camera` to the simulated hardware and two in-memory
//! volumes, both watched on the camera's event queue, and records every
//! delegate callback in a [`Journal`].
#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;

use camera_capture_core::{
    Camera, CameraCapabilities, CameraConfiguration, CameraDelegate, CameraError, CaptureState,
    CompletedVideo, FocusState, HeldMedia, NewImage, Overlay, PickResponder, PickResult, RecordState,
    SessionState, SizeLimitAlert, StorageArea, StorageState,
};
use camera_capture_sim::{CallLog, DeviceCall, MemoryStorage, SimCameraProvider, SimKnobs, SimVideoDecoder};

pub const MB: u64 = 1024 * 1024;

// ============================================================================
// Delegate
// ============================================================================

/// Every delegate callback, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Session(SessionState),
    Capture(CaptureState),
    Record(RecordState),
    Focus(FocusState),
    Input(bool),
    PreviewResumed,
    Shutter,
    Storage(StorageState, Option<Overlay>),
    ItemDeleted(String),
    NewImage(String),
    NewVideo(String),
    ConfirmMedia,
    SizeLimit(SizeLimitAlert),
    Error(CameraError),
}

#[derive(Default)]
pub struct Journal {
    entries: Mutex<Vec<Entry>>,
    videos: Mutex<Vec<CompletedVideo>>,
}

impl Journal {
    pub fn entries(&self) -> Vec<Entry> {
        self.entries.lock().clone()
    }

    pub fn count(&self, pred: impl Fn(&Entry) -> bool) -> usize {
        self.entries.lock().iter().filter(|e| pred(e)).count()
    }

    pub fn contains(&self, entry: &Entry) -> bool {
        self.entries.lock().contains(entry)
    }

    pub fn videos(&self) -> Vec<CompletedVideo> {
        self.videos.lock().clone()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    fn push(&self, entry: Entry) {
        self.entries.lock().push(entry);
    }
}

impl CameraDelegate for Journal {
    fn on_session_state_changed(&self, state: SessionState) {
        self.push(Entry::Session(state));
    }

    fn on_capture_state_changed(&self, state: &CaptureState) {
        self.push(Entry::Capture(state.clone()));
    }

    fn on_record_state_changed(&self, state: &RecordState) {
        self.push(Entry::Record(state.clone()));
    }

    fn on_focus_state_changed(&self, state: FocusState) {
        self.push(Entry::Focus(state));
    }

    fn on_input_enabled(&self, enabled: bool) {
        self.push(Entry::Input(enabled));
    }

    fn on_preview_resumed(&self) {
        self.push(Entry::PreviewResumed);
    }

    fn on_shutter(&self) {
        self.push(Entry::Shutter);
    }

    fn on_storage_state_changed(&self, state: StorageState, overlay: Option<Overlay>) {
        self.push(Entry::Storage(state, overlay));
    }

    fn on_item_deleted(&self, path: &str) {
        self.push(Entry::ItemDeleted(path.to_string()));
    }

    fn on_new_image(&self, image: &NewImage) {
        self.push(Entry::NewImage(image.path.clone()));
    }

    fn on_new_video(&self, video: &CompletedVideo) {
        self.videos.lock().push(video.clone());
        self.push(Entry::NewVideo(video.file.clone()));
    }

    fn on_confirm_media(&self, _media: &HeldMedia) {
        self.push(Entry::ConfirmMedia);
    }

    fn on_size_limit_reached(&self, alert: SizeLimitAlert) {
        self.push(Entry::SizeLimit(alert));
    }

    fn on_error(&self, error: &CameraError) {
        self.push(Entry::Error(error.clone()));
    }
}

// ============================================================================
// Pick responder
// ============================================================================

#[derive(Clone, Default)]
pub struct Replies {
    replies: Arc<Mutex<Vec<Result<PickResult, String>>>>,
}

impl Replies {
    pub fn take(&self) -> Vec<Result<PickResult, String>> {
        std::mem::take(&mut *self.replies.lock())
    }
}

impl PickResponder for Replies {
    fn post_result(&self, result: PickResult) {
        self.replies.lock().push(Ok(result));
    }

    fn post_error(&self, message: &str) {
        self.replies.lock().push(Err(message.to_string()));
    }
}

// ============================================================================
// Rig
// ============================================================================

pub struct Rig {
    pub camera: Camera<SimCameraProvider>,
    pub calls: CallLog,
    pub knobs: Arc<Mutex<SimKnobs>>,
    pub pictures: Arc<MemoryStorage>,
    pub videos: Arc<MemoryStorage>,
    pub journal: Arc<Journal>,
}

pub struct RigBuilder {
    cameras: Vec<CameraCapabilities>,
    config: CameraConfiguration,
    picture_free: u64,
    video_free: u64,
}

impl Default for RigBuilder {
    fn default() -> Self {
        Self {
            cameras: vec![camera_capture_sim::rear_camera(), camera_capture_sim::front_camera()],
            config: CameraConfiguration::default(),
            picture_free: 256 * MB,
            video_free: 256 * MB,
        }
    }
}

impl RigBuilder {
    pub fn cameras(mut self, cameras: Vec<CameraCapabilities>) -> Self {
        self.cameras = cameras;
        self
    }

    pub fn config(mut self, config: CameraConfiguration) -> Self {
        self.config = config;
        self
    }

    pub fn picture_free(mut self, bytes: u64) -> Self {
        self.picture_free = bytes;
        self
    }

    pub fn video_free(mut self, bytes: u64) -> Self {
        self.video_free = bytes;
        self
    }

    /// Build the rig without loading the camera.
    pub fn build(self) -> Rig {
        let provider = SimCameraProvider::new(self.cameras);
        let calls = provider.calls();
        let knobs = provider.knobs();
        let pictures = Arc::new(MemoryStorage::new(self.picture_free));
        let videos = Arc::new(MemoryStorage::new(self.video_free));

        let mut camera = Camera::new(
            provider,
            pictures.clone(),
            videos.clone(),
            Box::new(SimVideoDecoder::new()),
            self.config,
        )
        .expect("valid configuration");
        pictures.watch(StorageArea::Pictures, camera.event_sink());
        videos.watch(StorageArea::Videos, camera.event_sink());

        let journal = Arc::new(Journal::default());
        camera.set_delegate(journal.clone());

        Rig {
            camera,
            calls,
            knobs,
            pictures,
            videos,
            journal,
        }
    }

    /// Build, load and drain events until the preview is streaming.
    pub fn loaded(self) -> Rig {
        let mut rig = self.build();
        rig.camera.load().expect("camera loads");
        rig.pump();
        assert_eq!(rig.camera.session_state(), SessionState::Streaming);
        rig
    }
}

impl Rig {
    pub fn builder() -> RigBuilder {
        RigBuilder::default()
    }

    pub fn pump(&mut self) -> usize {
        self.camera.pump_events()
    }

    /// Index of the first hardware call matching `pred`.
    pub fn call_index(&self, pred: impl Fn(&DeviceCall) -> bool) -> Option<usize> {
        self.calls.position(pred)
    }
}
