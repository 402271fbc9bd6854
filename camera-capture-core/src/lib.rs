//! # camera-capture-core
//!
//! Platform-agnostic capture control for a camera app.
//!
//! Picks picture, thumbnail, preview and recording sizes from what the
//! hardware reports, drives the photo and video state machines, and gates
//! captures on storage availability. Platform backends implement
//! `CameraProvider`/`CameraHandle`, `MediaStorage` and `VideoDecoder` and
//! plug into the generic `Camera`.
//!
//! ## Architecture
//!
//! ```text
//! camera-capture-core (this crate)
//! ├── traits/    ← CameraProvider, CameraHandle, MediaStorage, VideoDecoder, PickResponder, CameraDelegate
//! ├── models/    ← CameraError, state enums, CameraConfiguration, capabilities, events, media types
//! ├── catalog/   ← picture / thumbnail / video profile / preview size selection
//! ├── session/   ← DeviceSession, focus & flash policy, CaptureController, RecordController, Camera
//! └── storage/   ← StorageGate, DCF naming, PosterExtractor
//! ```

pub mod catalog;
pub mod models;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use catalog::{pick_picture_size, pick_thumbnail_size, pick_video_profile, select_optimal_preview_size};
pub use models::capabilities::{CameraCapabilities, FlashMode, FocusMode, RecorderProfile, Size, VideoProfile};
pub use models::config::{CameraConfiguration, SelectionPolicy, Viewport};
pub use models::error::{CameraError, ErrorNotice};
pub use models::events::{
    CameraEvent, DeviceEvent, EventSink, PreviewState, RecorderStatus, StorageArea, StorageChange,
    StorageChangeReason,
};
pub use models::media::{
    Blob, CaptureRequest, GeoPosition, HeldMedia, NewImage, PickData, PickResult, PreviewConfig, RecordingConfig,
};
pub use models::recording_result::{CompletedVideo, RecordingSession, VideoMetadata};
pub use models::state::{CaptureMode, CaptureState, FocusState, RecordState, SessionState};
pub use models::storage_state::{Overlay, StorageAvailability, StorageState};
pub use session::camera::Camera;
pub use session::device::{DeviceSession, Selection};
pub use session::record::format_timer;
pub use storage::dcf::{DcfKind, DcfName, DcfNamer, DcfPosition};
pub use storage::gate::StorageGate;
pub use storage::poster::PosterExtractor;
pub use traits::camera_delegate::{CameraDelegate, SizeLimitAlert};
pub use traits::camera_provider::{CameraHandle, CameraProvider};
pub use traits::media_storage::MediaStorage;
pub use traits::pick_responder::{PendingPick, PickResponder};
pub use traits::video_decoder::VideoDecoder;
