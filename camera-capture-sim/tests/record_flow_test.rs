//! Video recording end to end: space checks, completion by storage
//! notification, size limits, teardown.

mod helpers;

use camera_capture_core::{
    Blob, CameraConfiguration, CameraError, CaptureMode, CameraEvent, DeviceEvent, RecordState, RecorderStatus,
    SizeLimitAlert, StorageArea, StorageAvailability, StorageChange, StorageChangeReason,
};
use camera_capture_core::models::media::MIME_3GPP;
use camera_capture_sim::DeviceCall;
use helpers::{Entry, Rig, RigBuilder, MB};

const VIDEO: &str = "/sdcard/DCIM/100MZLLA/VID_0001.3gp";
const POSTER: &str = "/sdcard/DCIM/100MZLLA/VID_0001.jpg";

fn video_rig(video_free: u64) -> RigBuilder {
    let config = CameraConfiguration {
        record_space_min: 5 * MB,
        record_space_padding: MB,
        initial_mode: CaptureMode::Video,
        ..Default::default()
    };
    Rig::builder().config(config).video_free(video_free)
}

fn recorded_limit(rig: &Rig) -> Option<u64> {
    rig.calls.calls().into_iter().find_map(|c| match c {
        DeviceCall::StartRecording { config, .. } => Some(config.max_file_size_bytes),
        _ => None,
    })
}

#[test]
fn limit_is_free_space_minus_padding() {
    let mut rig = video_rig(10 * MB).loaded();
    rig.camera.capture().unwrap();

    assert_eq!(recorded_limit(&rig), Some(9 * MB));
    assert_eq!(rig.camera.record_state(), &RecordState::Recording);
    let session = rig.camera.record_controller().session().unwrap();
    assert_eq!(session.file_path, VIDEO);
    assert_eq!(session.path, "DCIM/100MZLLA/VID_0001.3gp");

    // The directory placeholder is gone again.
    rig.pump();
    assert!(rig.videos.is_empty());
    rig.camera.teardown();
}

#[test]
fn too_little_space_never_reaches_hardware() {
    let mut rig = video_rig(4 * MB).loaded();

    let err = rig.camera.capture().unwrap_err();
    assert_eq!(
        err,
        CameraError::StorageSpaceExhausted {
            free_bytes: 4 * MB,
            required_bytes: 5 * MB,
        }
    );
    assert_eq!(rig.calls.count(|c| matches!(c, DeviceCall::StartRecording { .. })), 0);
    assert!(rig.camera.record_state().is_idle());
    assert!(rig
        .journal
        .contains(&Entry::Record(RecordState::Failed(err.clone()))));
    assert!(rig.journal.contains(&Entry::Error(err)));
}

#[test]
fn completes_when_storage_reports_the_file() {
    let mut rig = video_rig(64 * MB).loaded();
    rig.camera.set_orientation(90);
    rig.camera.capture().unwrap();
    rig.camera.capture().unwrap();
    assert!(matches!(
        rig.camera.record_state(),
        RecordState::AwaitingWriteCompletion { file_path } if file_path == VIDEO
    ));

    rig.pump();
    assert!(rig.camera.record_state().is_idle());
    assert!(rig.pictures.contains(POSTER));

    let videos = rig.journal.videos();
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].file, VIDEO);
    assert_eq!((videos[0].width(), videos[0].height()), (352, 288));
    assert_eq!(videos[0].rotation(), 90);
}

#[test]
fn ignores_other_paths_and_repeats() {
    let mut rig = video_rig(64 * MB).loaded();
    rig.camera.capture().unwrap();
    rig.pump();
    rig.camera.stop_recording().unwrap();

    // Stop the recorder's own notifications from reaching the camera.
    while rig.camera.event_sink().pop().is_some() {}

    let sink = rig.camera.event_sink();
    sink.emit_storage(
        StorageArea::Videos,
        StorageChange::new(StorageChangeReason::Modified, "/sdcard/DCIM/100MZLLA/VID_0002.3gp"),
    );
    sink.emit_storage(
        StorageArea::Videos,
        StorageChange::new(StorageChangeReason::Created, VIDEO),
    );
    rig.pump();
    assert!(matches!(
        rig.camera.record_state(),
        RecordState::AwaitingWriteCompletion { .. }
    ));

    for _ in 0..2 {
        sink.emit_storage(
            StorageArea::Videos,
            StorageChange::new(StorageChangeReason::Modified, VIDEO),
        );
    }
    rig.pump();
    assert!(rig.camera.record_state().is_idle());
    assert_eq!(rig.journal.count(|e| matches!(e, Entry::NewVideo(_))), 1);
}

#[test]
fn size_limit_stops_once_with_one_alert() {
    let mut rig = video_rig(64 * MB).loaded();
    rig.camera.capture().unwrap();

    let limit = CameraEvent::Device(DeviceEvent::RecorderStateChanged(RecorderStatus::FileSizeLimitReached));
    rig.camera.event_sink().emit(limit.clone());
    rig.camera.event_sink().emit(limit.clone());
    rig.pump();

    assert_eq!(rig.journal.count(|e| matches!(e, Entry::SizeLimit(_))), 1);
    assert!(rig.journal.contains(&Entry::SizeLimit(SizeLimitAlert::Storage)));
    assert!(rig.journal.contains(&Entry::Record(RecordState::SizeLimitStopping)));
    assert_eq!(rig.calls.count(|c| *c == DeviceCall::StopRecording), 1);
    assert!(rig.camera.record_state().is_idle());
    assert_eq!(rig.journal.count(|e| matches!(e, Entry::NewVideo(_))), 1);

    rig.camera.event_sink().emit(limit);
    rig.pump();
    assert_eq!(rig.journal.count(|e| matches!(e, Entry::SizeLimit(_))), 1);
}

#[test]
fn stop_while_idle_is_rejected_quietly() {
    let mut rig = video_rig(64 * MB).loaded();
    assert!(matches!(rig.camera.stop_recording(), Err(CameraError::InvalidState(_))));
    assert_eq!(rig.calls.count(|c| *c == DeviceCall::StopRecording), 0);
    assert_eq!(rig.journal.count(|e| matches!(e, Entry::Error(_))), 0);
}

#[test]
fn undecodable_recording_is_deleted() {
    let mut rig = video_rig(64 * MB).loaded();
    rig.knobs.lock().short_recording = true;
    rig.camera.capture().unwrap();
    rig.camera.capture().unwrap();
    rig.pump();

    assert!(rig.camera.record_state().is_idle());
    assert!(!rig.videos.contains(VIDEO));
    assert!(!rig.pictures.contains(POSTER));
    assert_eq!(rig.journal.count(|e| matches!(e, Entry::NewVideo(_))), 0);
}

#[test]
fn recorder_start_failure_returns_to_idle() {
    let mut rig = video_rig(64 * MB).loaded();
    rig.knobs.lock().fail_record = true;

    assert!(matches!(rig.camera.capture(), Err(CameraError::RecordingFailed(_))));
    assert!(rig.camera.record_state().is_idle());
    assert!(rig.camera.record_controller().session().is_none());

    rig.knobs.lock().fail_record = false;
    rig.camera.capture().unwrap();
    assert!(rig.camera.record_state().is_recording());
    rig.camera.teardown();
}

#[test]
fn teardown_while_recording_still_finalises() {
    let mut rig = video_rig(64 * MB).loaded();
    rig.camera.capture().unwrap();
    rig.calls.clear();

    rig.camera.teardown();
    assert_eq!(
        rig.calls.calls(),
        vec![DeviceCall::StopRecording, DeviceCall::StopPreview, DeviceCall::Release]
    );

    rig.pump();
    assert!(rig.camera.record_state().is_idle());
    assert_eq!(rig.journal.count(|e| matches!(e, Entry::NewVideo(_))), 1);
}

#[test]
fn card_pulled_before_flush_fails_back_to_idle() {
    let mut rig = video_rig(64 * MB).loaded();
    rig.camera.capture().unwrap();

    rig.videos.set_availability(StorageAvailability::Unavailable);
    rig.camera.capture().unwrap();
    rig.pump();

    assert!(rig.camera.record_state().is_idle());
    assert!(rig.camera.record_controller().awaiting_paths().is_empty());
    assert_eq!(
        rig.journal
            .count(|e| matches!(e, Entry::Error(CameraError::StorageWriteFailed(_)))),
        1
    );
    assert_eq!(rig.journal.count(|e| matches!(e, Entry::NewVideo(_))), 0);

    rig.videos.set_availability(StorageAvailability::Available);
    rig.pump();
    rig.camera.teardown();
    rig.camera.load().unwrap();
    rig.pump();

    rig.camera.capture().unwrap();
    assert!(rig.camera.record_state().is_recording());
    rig.camera.capture().unwrap();
    rig.pump();
    assert!(rig.camera.record_state().is_idle());
    assert_eq!(rig.journal.videos()[0].file, "/sdcard/DCIM/100MZLLA/VID_0002.3gp");
}

#[test]
fn lost_write_notification_does_not_block_the_next_recording() {
    let mut rig = video_rig(64 * MB).loaded();
    rig.camera.capture().unwrap();
    rig.camera.capture().unwrap();

    // The flush notifications never reach the camera.
    while rig.camera.event_sink().pop().is_some() {}
    assert!(matches!(
        rig.camera.record_state(),
        RecordState::AwaitingWriteCompletion { .. }
    ));
    rig.camera.teardown();
    rig.camera.load().unwrap();
    rig.pump();

    rig.camera.capture().unwrap();
    assert!(rig.camera.record_state().is_recording());
    assert_eq!(rig.camera.record_controller().awaiting_paths(), [VIDEO]);
    rig.camera.teardown();
}

#[test]
fn next_recording_starts_while_previous_is_flushing() {
    let mut rig = video_rig(64 * MB).loaded();
    rig.camera.capture().unwrap();
    rig.camera.capture().unwrap();
    rig.camera.capture().unwrap();
    assert!(rig.camera.record_state().is_recording());

    // The first file finalises under the second recording.
    rig.pump();
    assert!(rig.camera.record_state().is_recording());
    let videos = rig.journal.videos();
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].file, VIDEO);
    assert!(rig.pictures.contains(POSTER));

    rig.camera.capture().unwrap();
    rig.pump();
    assert!(rig.camera.record_state().is_idle());
    let videos = rig.journal.videos();
    assert_eq!(videos.len(), 2);
    assert_eq!(videos[1].file, "/sdcard/DCIM/100MZLLA/VID_0002.3gp");
}

#[test]
fn existing_video_name_is_skipped() {
    let mut rig = video_rig(64 * MB).build();
    rig.videos.write("DCIM/100MZLLA/VID_0001.3gp", Blob::new(MIME_3GPP, vec![1]));
    rig.camera.load().unwrap();
    rig.pump();

    rig.camera.capture().unwrap();
    rig.camera.capture().unwrap();
    rig.pump();

    assert!(rig.camera.record_state().is_idle());
    assert!(rig.journal.entries().iter().all(|e| !matches!(e, Entry::Error(_))));
    let videos = rig.journal.videos();
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].file, "/sdcard/DCIM/100MZLLA/VID_0002.3gp");
}

#[test]
fn mode_switch_refused_while_recording() {
    let mut rig = video_rig(64 * MB).loaded();
    rig.camera.capture().unwrap();

    assert!(matches!(rig.camera.toggle_mode(), Err(CameraError::InvalidState(_))));
    assert!(matches!(rig.camera.toggle_camera(), Err(CameraError::InvalidState(_))));
    assert_eq!(rig.camera.mode(), CaptureMode::Video);
    rig.camera.teardown();
}
