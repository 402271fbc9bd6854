use std::sync::Arc;

use chrono::Utc;

use crate::models::capabilities::FlashMode;
use crate::models::config::CameraConfiguration;
use crate::models::error::CameraError;
use crate::models::events::{CameraEvent, DeviceEvent, EventSink, StorageArea, StorageChange};
use crate::models::media::{
    Blob, CaptureRequest, FileFormat, GeoPosition, HeldMedia, NewImage, PickResult, MIME_3GPP, MIME_JPEG,
};
use crate::models::state::{CaptureMode, CaptureState, RecordState, SessionState};
use crate::models::storage_state::{Overlay, StorageState};
use crate::session::capture::CaptureController;
use crate::session::device::{DeviceSession, Selection};
use crate::session::record::RecordController;
use crate::storage::dcf::{DcfKind, DcfNamer, DcfPosition};
use crate::storage::gate::StorageGate;
use crate::storage::poster::PosterExtractor;
use crate::traits::camera_delegate::CameraDelegate;
use crate::traits::camera_provider::CameraProvider;
use crate::traits::media_storage::MediaStorage;
use crate::traits::pick_responder::PendingPick;
use crate::traits::video_decoder::VideoDecoder;

const PICK_CANCELLED: &str = "pick cancelled";

/// Application-level camera.
///
/// Owns the device session, both controllers, the storage gate and the
/// event queue. Hardware and storage notifications are queued on the
/// `EventSink` and handled by `pump_events` on the caller's thread.
///
/// ```text
/// [CameraProvider] ──events──┐
/// [MediaStorage]   ──events──┼→ EventSink → pump_events → dispatch
///                            │        ├→ DeviceSession (preview state)
///                            │        ├→ RecordController (recorder, video storage)
///                            │        └→ StorageGate (picture storage)
/// ```
pub struct Camera<P: CameraProvider> {
    config: CameraConfiguration,
    device: DeviceSession<P>,
    capture: CaptureController,
    record: RecordController,
    gate: StorageGate,
    picture_storage: Arc<dyn MediaStorage>,
    video_storage: Arc<dyn MediaStorage>,
    extractor: PosterExtractor,
    namer: DcfNamer,
    events: EventSink,
    mode: CaptureMode,
    camera_index: usize,
    pending_pick: Option<PendingPick>,
    held_media: Option<HeldMedia>,
    position: Option<GeoPosition>,
    delegate: Option<Arc<dyn CameraDelegate>>,
}

impl<P: CameraProvider> Camera<P> {
    pub fn new(
        provider: P,
        picture_storage: Arc<dyn MediaStorage>,
        video_storage: Arc<dyn MediaStorage>,
        decoder: Box<dyn VideoDecoder>,
        config: CameraConfiguration,
    ) -> Result<Self, CameraError> {
        config.validate().map_err(CameraError::ConfigurationFailed)?;

        let extractor = PosterExtractor::new(
            Arc::clone(&video_storage),
            Arc::clone(&picture_storage),
            decoder,
        );

        Ok(Self {
            device: DeviceSession::new(provider),
            capture: CaptureController::new(),
            record: RecordController::new(&config),
            gate: StorageGate::new(config.image_header_slack),
            picture_storage,
            video_storage,
            extractor,
            namer: DcfNamer::new(config.dcf_directory_suffix.clone()),
            events: EventSink::new(),
            mode: config.initial_mode,
            camera_index: config.initial_camera,
            pending_pick: None,
            held_media: None,
            position: None,
            delegate: None,
            config,
        })
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn CameraDelegate>) {
        self.device.set_delegate(Arc::clone(&delegate));
        self.capture.set_delegate(Arc::clone(&delegate));
        self.record.set_delegate(Arc::clone(&delegate));
        self.gate.set_delegate(Arc::clone(&delegate));
        self.delegate = Some(delegate);
    }

    pub fn config(&self) -> &CameraConfiguration {
        &self.config
    }

    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    pub fn camera_index(&self) -> usize {
        self.camera_index
    }

    pub fn device(&self) -> &DeviceSession<P> {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut DeviceSession<P> {
        &mut self.device
    }

    pub fn session_state(&self) -> SessionState {
        self.device.state()
    }

    pub fn selection(&self) -> &Selection {
        self.device.selection()
    }

    pub fn capture_state(&self) -> &CaptureState {
        self.capture.state()
    }

    pub fn record_state(&self) -> &RecordState {
        self.record.state()
    }

    pub fn record_controller(&self) -> &RecordController {
        &self.record
    }

    pub fn storage_state(&self) -> StorageState {
        self.gate.state()
    }

    pub fn overlay(&self) -> Option<Overlay> {
        self.gate.overlay()
    }

    pub fn held_media(&self) -> Option<&HeldMedia> {
        self.held_media.as_ref()
    }

    pub fn has_pending_pick(&self) -> bool {
        self.pending_pick.is_some()
    }

    /// Restore a persisted DCF counter position.
    pub fn seed_dcf(&mut self, position: DcfPosition) {
        self.namer.seed(position);
    }

    pub fn dcf_position(&self) -> DcfPosition {
        self.namer.position()
    }

    /// Producer side of the event queue, for backends and storages.
    pub fn event_sink(&self) -> EventSink {
        self.events.clone()
    }

    /// Acquire and configure the current camera for the current mode.
    pub fn load(&mut self) -> Result<(), CameraError> {
        if let Err(e) = self.load_device() {
            self.report(&e);
            return Err(e);
        }
        self.check_storage_space();
        Ok(())
    }

    fn load_device(&mut self) -> Result<(), CameraError> {
        self.device.acquire(self.camera_index, self.events.clone())?;

        let policy = self
            .config
            .selection_policy(self.pending_pick.as_ref().map(|pick| &pick.data));
        if let Err(e) = self.device.configure(self.mode, &policy, &self.config.viewport) {
            self.device.release();
            return Err(e);
        }

        if let Some(size) = self.device.selection().picture_size {
            self.gate.set_picture_size(size);
        }
        Ok(())
    }

    /// Stop everything and release the hardware. A recording in progress
    /// is stopped first; its file is still finalised when the storage
    /// reports it written.
    pub fn teardown(&mut self) {
        self.cancel_pick();
        self.record.abort(&mut self.device);
        if self.device.is_acquired() {
            if let Err(e) = self.device.stop_preview() {
                log::warn!("failed to stop preview: {}", e);
            }
        }
        self.device.release();
    }

    /// Release and reload the device, keeping the pick and held media.
    fn reload(&mut self) -> Result<(), CameraError> {
        if !self.device.is_acquired() {
            return Ok(());
        }
        if let Err(e) = self.device.stop_preview() {
            log::warn!("failed to stop preview: {}", e);
        }
        self.device.release();
        self.load()
    }

    pub fn set_capture_mode(&mut self, mode: CaptureMode) -> Result<CaptureMode, CameraError> {
        if mode == self.mode {
            return Ok(mode);
        }
        if self.record.is_recording() {
            return Err(CameraError::InvalidState("cannot switch mode while recording".into()));
        }
        self.mode = mode;
        if let Some(ref delegate) = self.delegate {
            delegate.on_capture_mode_changed(mode);
        }
        self.reload()?;
        Ok(mode)
    }

    pub fn toggle_mode(&mut self) -> Result<CaptureMode, CameraError> {
        self.set_capture_mode(self.mode.toggled())
    }

    /// Switch between the rear and front camera.
    pub fn toggle_camera(&mut self) -> Result<usize, CameraError> {
        if self.record.is_recording() {
            return Err(CameraError::InvalidState("cannot switch camera while recording".into()));
        }
        if !self.device.has_front_camera() {
            return Err(CameraError::InvalidState("no second camera".into()));
        }
        self.camera_index = 1 - self.camera_index.min(1);
        self.reload()?;
        Ok(self.camera_index)
    }

    pub fn toggle_flash(&mut self) -> Option<FlashMode> {
        self.device.toggle_flash(self.mode)
    }

    /// `None` means no flash.
    pub fn flash_mode_name(&self) -> Option<FlashMode> {
        self.device.flash_mode_name(self.mode)
    }

    pub fn set_orientation(&mut self, degrees: u32) {
        self.device.set_orientation(degrees);
    }

    pub fn update_position(&mut self, position: GeoPosition) {
        self.position = Some(position);
    }

    pub fn clear_position(&mut self) {
        self.position = None;
    }

    /// The capture button: a photo in photo mode, start or stop recording
    /// in video mode.
    pub fn capture(&mut self) -> Result<(), CameraError> {
        match self.mode {
            CaptureMode::Photo => self.take_picture(),
            CaptureMode::Video if self.record.is_recording() => self.stop_recording(),
            CaptureMode::Video => self.start_recording(),
        }
    }

    pub fn take_picture(&mut self) -> Result<(), CameraError> {
        if !self.capture.state().is_idle() {
            return Err(CameraError::InvalidState("capture already in progress".into()));
        }
        self.admit()?;

        // No location leaks to the app that issued a pick.
        let position = match self.pending_pick {
            Some(_) => None,
            None => self.position,
        };
        let request = CaptureRequest {
            orientation: self.device.orientation(),
            date_time: Utc::now().timestamp(),
            file_format: FileFormat::Jpeg,
            position,
        };

        let hold_frame = self.pending_pick.is_some();
        let blob = self
            .capture
            .capture(&mut self.device, &request, hold_frame)
            .map_err(|e| self.reported(e))?;

        if hold_frame {
            let held = HeldMedia::Image(blob.clone());
            if let Some(ref delegate) = self.delegate {
                delegate.on_confirm_media(&held);
            }
            self.held_media = Some(held);
        }

        self.save_image(blob).map_err(|e| self.reported(e))
    }

    fn save_image(&mut self, blob: Blob) -> Result<(), CameraError> {
        let name = self
            .namer
            .next_free(DcfKind::Image, self.picture_storage.as_ref())?;
        let path = self
            .picture_storage
            .add_named(&blob, &name.path())
            .map_err(|e| match e {
                CameraError::StorageWriteFailed(_) => e,
                other => CameraError::StorageWriteFailed(other.to_string()),
            })?;
        log::info!("saved picture {}", path);

        if let Some(ref delegate) = self.delegate {
            delegate.on_new_image(&NewImage { path, blob });
        }
        self.check_storage_space();
        Ok(())
    }

    pub fn start_recording(&mut self) -> Result<(), CameraError> {
        if !self.record.can_start() {
            return Err(CameraError::InvalidState(format!(
                "recording requested while {:?}",
                self.record.state()
            )));
        }
        self.admit()?;

        let name = self
            .namer
            .next_free(DcfKind::Video, self.video_storage.as_ref())
            .map_err(|e| self.reported(e))?;
        let pick_limit = self
            .pending_pick
            .as_ref()
            .and_then(|pick| pick.data.target_file_size());
        self.record
            .start(&mut self.device, &self.video_storage, &name, pick_limit)
            .map_err(|e| self.reported(e))
    }

    pub fn stop_recording(&mut self) -> Result<(), CameraError> {
        self.record.stop(&mut self.device)
    }

    /// Register an external pick request. Replaces (and cancels) any
    /// earlier one and reloads the device so selections honour it.
    pub fn set_pending_pick(&mut self, pick: PendingPick) -> Result<(), CameraError> {
        self.cancel_pick();
        self.pending_pick = Some(pick);
        if self.record.state().is_idle() {
            self.reload()?;
        }
        Ok(())
    }

    pub fn cancel_pick(&mut self) {
        self.held_media = None;
        if let Some(pick) = self.pending_pick.take() {
            pick.responder.post_error(PICK_CANCELLED);
        }
    }

    /// Hand the held media back to the app that issued the pick.
    pub fn select_pressed(&mut self) -> Result<(), CameraError> {
        if self.pending_pick.is_none() {
            return Err(CameraError::InvalidState("no pending pick".into()));
        }
        let held = self
            .held_media
            .take()
            .ok_or_else(|| CameraError::InvalidState("no media awaiting confirmation".into()))?;
        let pick = self
            .pending_pick
            .take()
            .ok_or_else(|| CameraError::InvalidState("no pending pick".into()))?;

        let result = match held {
            HeldMedia::Image(blob) => PickResult {
                mime_type: MIME_JPEG.into(),
                blob,
                poster: None,
            },
            HeldMedia::Video(video) => PickResult {
                mime_type: MIME_3GPP.into(),
                blob: video.video,
                poster: Some(video.poster),
            },
        };
        pick.responder.post_result(result);
        Ok(())
    }

    /// Drop the held media and bring the viewfinder back.
    pub fn retake_pressed(&mut self) -> Result<(), CameraError> {
        self.held_media = None;
        match self.mode {
            CaptureMode::Photo => {
                self.device.resume_preview()?;
                if let Some(ref delegate) = self.delegate {
                    delegate.on_preview_resumed();
                }
            }
            CaptureMode::Video => self.device.start_preview(CaptureMode::Video)?,
        }
        Ok(())
    }

    /// Drain the event queue in arrival order. Returns the number of
    /// events handled.
    pub fn pump_events(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.events.pop() {
            self.dispatch(event);
            handled += 1;
        }
        handled
    }

    pub fn dispatch(&mut self, event: CameraEvent) {
        match event {
            CameraEvent::Device(DeviceEvent::Shutter) => {
                if let Some(ref delegate) = self.delegate {
                    delegate.on_shutter();
                }
            }
            CameraEvent::Device(DeviceEvent::PreviewStateChanged(state)) => {
                self.device.on_preview_state_changed(state);
            }
            CameraEvent::Device(DeviceEvent::RecorderStateChanged(status)) => {
                let pick_pending = self.pending_pick.is_some();
                self.record
                    .on_recorder_status(&mut self.device, &status, pick_pending);
            }
            CameraEvent::Storage {
                area: StorageArea::Pictures,
                change,
            } => {
                if let Err(e) = self.gate.handle_change(&change, self.picture_storage.as_ref()) {
                    log::warn!("storage check failed: {}", e);
                }
            }
            CameraEvent::Storage {
                area: StorageArea::Videos,
                change,
            } => self.on_video_storage_change(&change),
        }
    }

    fn on_video_storage_change(&mut self, change: &StorageChange) {
        let Some(result) = self.record.on_storage_change(change, &self.extractor) else {
            return;
        };
        let video = match result {
            Ok(video) => video,
            // Already logged; a recording with no samples is not worth a notice.
            Err(CameraError::ExtractionFailed(_)) => return,
            Err(e) => {
                self.report(&e);
                return;
            }
        };

        match self.delegate {
            Some(ref delegate) if self.pending_pick.is_some() => {
                let held = HeldMedia::Video(video);
                delegate.on_confirm_media(&held);
                self.held_media = Some(held);
            }
            Some(ref delegate) => delegate.on_new_video(&video),
            None if self.pending_pick.is_some() => self.held_media = Some(HeldMedia::Video(video)),
            None => {}
        }
    }

    /// Re-evaluate picture storage. Errors are logged and leave the state
    /// as it was.
    pub fn check_storage_space(&mut self) -> StorageState {
        match self.gate.check(self.picture_storage.as_ref()) {
            Ok(state) => state,
            Err(e) => {
                log::warn!("storage check failed: {}", e);
                self.gate.state()
            }
        }
    }

    fn admit(&mut self) -> Result<(), CameraError> {
        self.check_storage_space();
        self.gate.admit().map_err(|e| self.reported(e))
    }

    fn report(&self, error: &CameraError) {
        if matches!(error, CameraError::InvalidState(_)) {
            return;
        }
        if let Some(ref delegate) = self.delegate {
            delegate.on_error(error);
        }
    }

    fn reported(&self, error: CameraError) -> CameraError {
        self.report(&error);
        error
    }
}
