//! # camera-capture-sim
//!
//! In-memory backend for camera-capture-core.
//!
//! Provides:
//! - `SimCameraProvider` / `SimCameraHandle`: scripted camera hardware that logs every call
//! - `MemoryStorage`: a device storage volume with change notifications
//! - `SimVideoDecoder`: decoder for the toy container the simulated recorder writes
//!
//! ## Usage
//! ```ignore
//! use std::sync::Arc;
//! use camera_capture_core::{Camera, CameraConfiguration, StorageArea};
//! use camera_capture_sim::{MemoryStorage, SimCameraProvider, SimVideoDecoder};
//!
//! let pictures = Arc::new(MemoryStorage::new(64 << 20));
//! let videos = Arc::new(MemoryStorage::new(64 << 20));
//! let mut camera = Camera::new(
//!     SimCameraProvider::with_default_cameras(),
//!     pictures.clone(),
//!     videos.clone(),
//!     Box::new(SimVideoDecoder::new()),
//!     CameraConfiguration::default(),
//! )?;
//! pictures.watch(StorageArea::Pictures, camera.event_sink());
//! videos.watch(StorageArea::Videos, camera.event_sink());
//! camera.load();
//! camera.pump_events();
//! ```

pub mod memory_storage;
pub mod sim_camera;
pub mod sim_decoder;

pub use memory_storage::MemoryStorage;
pub use sim_camera::{front_camera, rear_camera, CallLog, DeviceCall, SimCameraHandle, SimCameraProvider, SimKnobs};
pub use sim_decoder::{encode_video, SimVideoDecoder};
