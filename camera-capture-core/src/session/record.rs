use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::models::config::CameraConfiguration;
use crate::models::error::CameraError;
use crate::models::events::{RecorderStatus, StorageChange, StorageChangeReason};
use crate::models::media::{Blob, RecordingConfig, MIME_3GPP};
use crate::models::recording_result::{CompletedVideo, RecordingSession};
use crate::models::state::RecordState;
use crate::session::device::DeviceSession;
use crate::storage::dcf::DcfName;
use crate::storage::poster::PosterExtractor;
use crate::traits::camera_delegate::{CameraDelegate, SizeLimitAlert};
use crate::traits::camera_provider::CameraProvider;
use crate::traits::media_storage::MediaStorage;

const TIMER_TICK: Duration = Duration::from_secs(1);

/// Format elapsed seconds as `mm:ss`, or `h:mm:ss` from one hour on.
pub fn format_timer(seconds: u64) -> String {
    let minutes = seconds / 60;
    let secs = seconds % 60;
    if minutes < 60 {
        format!("{:02}:{:02}", minutes, secs)
    } else {
        format!("{}:{:02}:{:02}", minutes / 60, minutes % 60, secs)
    }
}

/// Background thread reporting elapsed recording time once a second.
struct VideoTimer {
    stop: mpsc::Sender<()>,
    handle: thread::JoinHandle<()>,
}

impl VideoTimer {
    fn start(delegate: Option<Arc<dyn CameraDelegate>>, started: Instant) -> std::io::Result<Self> {
        let (stop, stopped) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name("video-timer".into())
            .spawn(move || loop {
                if let Some(ref d) = delegate {
                    d.on_video_time_update(&format_timer(started.elapsed().as_secs()));
                }
                match stopped.recv_timeout(TIMER_TICK) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    _ => break,
                }
            })?;
        Ok(Self { stop, handle })
    }

    fn stop(self) {
        let _ = self.stop.send(());
        let _ = self.handle.join();
    }
}

/// Video recording.
///
/// Completion of a recording is not signalled by the stop call: the file
/// is only final once the video storage reports it `Modified`. That
/// notification is matched by exact absolute path. A new recording may
/// start while an earlier file is still awaited; each awaited path is
/// finalised on its own notification.
pub struct RecordController {
    state: RecordState,
    session: Option<RecordingSession>,
    awaiting: Vec<String>,
    size_limit_alerted: bool,
    timer: Option<VideoTimer>,
    space_min: u64,
    space_padding: u64,
    min_duration: Duration,
    delegate: Option<Arc<dyn CameraDelegate>>,
}

impl RecordController {
    pub fn new(config: &CameraConfiguration) -> Self {
        Self {
            state: RecordState::Idle,
            session: None,
            awaiting: Vec::new(),
            size_limit_alerted: false,
            timer: None,
            space_min: config.record_space_min,
            space_padding: config.record_space_padding,
            min_duration: config.min_recording_time(),
            delegate: None,
        }
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn CameraDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn state(&self) -> &RecordState {
        &self.state
    }

    pub fn session(&self) -> Option<&RecordingSession> {
        self.session.as_ref()
    }

    /// Absolute paths whose `Modified` notification is still awaited,
    /// oldest first.
    pub fn awaiting_paths(&self) -> &[String] {
        &self.awaiting
    }

    /// Whether `start` would be accepted in the current state.
    pub fn can_start(&self) -> bool {
        matches!(
            self.state,
            RecordState::Idle | RecordState::AwaitingWriteCompletion { .. }
        )
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.state, RecordState::Recording | RecordState::SizeLimitStopping)
    }

    /// Start recording into `storage` under `name`.
    ///
    /// `pick_limit` is the file size ceiling of a pending pick, if any.
    pub fn start<P: CameraProvider>(
        &mut self,
        device: &mut DeviceSession<P>,
        storage: &Arc<dyn MediaStorage>,
        name: &DcfName,
        pick_limit: Option<u64>,
    ) -> Result<(), CameraError> {
        if !self.can_start() {
            return Err(CameraError::InvalidState(format!(
                "recording requested while {:?}",
                self.state
            )));
        }
        if let RecordState::AwaitingWriteCompletion { ref file_path } = self.state {
            log::info!("starting a new recording while {} is still being written", file_path);
        }

        self.size_limit_alerted = false;
        self.set_state(RecordState::Preparing);

        match self.prepare(device, storage, name, pick_limit) {
            Ok(session) => {
                log::info!(
                    "recording {} started, limit {} bytes",
                    session.file_path,
                    session.max_file_size_bytes
                );
                match VideoTimer::start(self.delegate.clone(), Instant::now()) {
                    Ok(timer) => self.timer = Some(timer),
                    Err(e) => log::error!("failed to spawn video timer: {}", e),
                }
                self.session = Some(session);
                self.set_state(RecordState::Recording);
                Ok(())
            }
            Err(e) => {
                log::error!("failed to start recording: {}", e);
                self.set_state(RecordState::Failed(e.clone()));
                self.set_state(RecordState::Idle);
                Err(e)
            }
        }
    }

    fn prepare<P: CameraProvider>(
        &self,
        device: &mut DeviceSession<P>,
        storage: &Arc<dyn MediaStorage>,
        name: &DcfName,
        pick_limit: Option<u64>,
    ) -> Result<RecordingSession, CameraError> {
        // The recorder does not create directories.
        let placeholder = name.placeholder_path();
        let absolute = storage.add_named(&Blob::new(MIME_3GPP, Vec::new()), &placeholder)?;
        let root = absolute
            .strip_suffix(placeholder.as_str())
            .ok_or_else(|| {
                CameraError::StorageWriteFailed(format!("unexpected placeholder path {}", absolute))
            })?
            .to_string();
        if let Err(e) = storage.delete(&absolute) {
            log::warn!("failed to delete placeholder {}: {}", absolute, e);
        }

        let free = storage.free_space()?;
        let mut max_file_size_bytes = free.saturating_sub(self.space_padding);
        if free < self.space_min || max_file_size_bytes == 0 {
            return Err(CameraError::StorageSpaceExhausted {
                free_bytes: free,
                required_bytes: self.space_min.max(self.space_padding.saturating_add(1)),
            });
        }

        if let Some(limit) = pick_limit.filter(|&limit| limit > 0) {
            max_file_size_bytes = max_file_size_bytes.min(limit);
        }

        let path = name.path();
        let config = RecordingConfig {
            rotation: device.orientation(),
            max_file_size_bytes,
        };
        device
            .start_recording(&config, Arc::clone(storage), &path)
            .map_err(|e| match e {
                CameraError::RecordingFailed(_) | CameraError::NotAcquired => e,
                other => CameraError::RecordingFailed(other.to_string()),
            })?;

        let file_path = format!("{}{}", root, path);
        Ok(RecordingSession::new(path, file_path, max_file_size_bytes))
    }

    /// Stop recording and wait for the storage to report the file written.
    pub fn stop<P: CameraProvider>(&mut self, device: &mut DeviceSession<P>) -> Result<(), CameraError> {
        if !self.is_recording() {
            return Err(CameraError::InvalidState(format!(
                "stop requested while {:?}",
                self.state
            )));
        }
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| CameraError::InvalidState("recording without a session".into()))?;
        let file_path = session.file_path.clone();
        let elapsed = session.elapsed();

        if self.state.is_recording() {
            self.set_state(RecordState::Stopping);
        }
        if let Err(e) = device.stop_recording() {
            log::warn!("failed to stop recorder: {}", e);
        }
        if let Some(timer) = self.timer.take() {
            timer.stop();
        }

        if elapsed < self.min_duration {
            log::warn!(
                "recording stopped after {:?}; the file may have no samples",
                elapsed
            );
        }

        self.awaiting.push(file_path.clone());
        self.set_state(RecordState::AwaitingWriteCompletion { file_path });
        Ok(())
    }

    /// Stop the recorder ahead of a device release. Any awaited write
    /// completion stays armed so the recording is still finalised.
    pub fn abort<P: CameraProvider>(&mut self, device: &mut DeviceSession<P>) {
        if self.is_recording() {
            if let Err(e) = self.stop(device) {
                log::warn!("failed to stop recording on teardown: {}", e);
            }
        }
    }

    /// Handle a recorder status message. The size limit stops the
    /// recording and raises exactly one alert per recording.
    pub fn on_recorder_status<P: CameraProvider>(
        &mut self,
        device: &mut DeviceSession<P>,
        status: &RecorderStatus,
        pick_pending: bool,
    ) {
        match status {
            RecorderStatus::FileSizeLimitReached => {
                if !self.state.is_recording() || self.size_limit_alerted {
                    log::debug!("ignoring size limit in {:?}", self.state);
                    return;
                }
                self.size_limit_alerted = true;
                self.set_state(RecordState::SizeLimitStopping);
                if let Err(e) = self.stop(device) {
                    log::error!("failed to stop at size limit: {}", e);
                }
                let alert = if pick_pending {
                    SizeLimitAlert::Activity
                } else {
                    SizeLimitAlert::Storage
                };
                if let Some(ref delegate) = self.delegate {
                    delegate.on_size_limit_reached(alert);
                }
            }
            RecorderStatus::Other(msg) => log::debug!("recorder state: {}", msg),
        }
    }

    /// Handle a video-storage change. Returns the extraction result once
    /// an awaited file is reported written, or `StorageWriteFailed` when
    /// the volume goes away with writes outstanding. Every other
    /// notification, including repeats for the same file, yields `None`.
    pub fn on_storage_change(
        &mut self,
        change: &StorageChange,
        extractor: &PosterExtractor,
    ) -> Option<Result<CompletedVideo, CameraError>> {
        match change.reason {
            StorageChangeReason::Modified => self.on_file_written(&change.path, extractor),
            StorageChangeReason::Unavailable | StorageChangeReason::Shared => {
                self.on_volume_lost(change.reason)
            }
            _ => None,
        }
    }

    fn on_file_written(
        &mut self,
        path: &str,
        extractor: &PosterExtractor,
    ) -> Option<Result<CompletedVideo, CameraError>> {
        let index = self.awaiting.iter().position(|p| p == path)?;
        self.awaiting.remove(index);

        // An earlier file finishing while a newer recording runs leaves
        // the state machine alone.
        let current = matches!(
            self.state,
            RecordState::AwaitingWriteCompletion { ref file_path } if file_path == path
        );
        if current {
            self.set_state(RecordState::ExtractingPoster);
        }

        let result = extractor.extract(path);
        if let Err(ref e) = result {
            log::warn!("no video produced for {}: {}", path, e);
        }

        if current {
            self.session = None;
            self.set_state(RecordState::Idle);
        }
        Some(result)
    }

    fn on_volume_lost(&mut self, reason: StorageChangeReason) -> Option<Result<CompletedVideo, CameraError>> {
        if self.awaiting.is_empty() {
            return None;
        }
        let lost = std::mem::take(&mut self.awaiting);
        log::error!("video volume {:?} before {:?} were written", reason, lost);
        let error = CameraError::StorageWriteFailed(format!(
            "video volume {:?} before {} was written",
            reason,
            lost.join(", ")
        ));

        if matches!(self.state, RecordState::AwaitingWriteCompletion { .. }) {
            self.session = None;
            self.set_state(RecordState::Failed(error.clone()));
            self.set_state(RecordState::Idle);
        }
        Some(Err(error))
    }

    fn set_state(&mut self, state: RecordState) {
        self.state = state;
        if let Some(ref delegate) = self.delegate {
            delegate.on_record_state_changed(&self.state);
        }
    }
}

impl Drop for RecordController {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.stop();
        }
    }
}
