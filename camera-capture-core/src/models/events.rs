use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

/// Preview stream state reported by the hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewState {
    /// The sensor is actually outputting frames.
    Started,
    Stopped,
}

/// Recorder status message reported by the hardware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderStatus {
    FileSizeLimitReached,
    Other(String),
}

impl RecorderStatus {
    pub fn from_message(msg: &str) -> Self {
        match msg {
            "FileSizeLimitReached" => Self::FileSizeLimitReached,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Asynchronous notifications from the camera hardware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
    Shutter,
    PreviewStateChanged(PreviewState),
    RecorderStateChanged(RecorderStatus),
}

/// Which storage volume a change notification came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageArea {
    Pictures,
    Videos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageChangeReason {
    Available,
    Unavailable,
    Shared,
    Created,
    Modified,
    Deleted,
}

/// A storage change notification. `path` is absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageChange {
    pub reason: StorageChangeReason,
    pub path: String,
}

impl StorageChange {
    pub fn new(reason: StorageChangeReason, path: impl Into<String>) -> Self {
        Self {
            reason,
            path: path.into(),
        }
    }
}

/// Every notification the camera core consumes, on one typed bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraEvent {
    Device(DeviceEvent),
    Storage {
        area: StorageArea,
        change: StorageChange,
    },
}

/// Cloneable producer side of the camera event queue.
///
/// Backends may emit from any thread; the owner of the queue drains it on
/// its own thread, so handlers never run concurrently.
#[derive(Clone, Default)]
pub struct EventSink {
    queue: Arc<Mutex<VecDeque<CameraEvent>>>,
}

impl EventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&self, event: CameraEvent) {
        self.queue.lock().push_back(event);
    }

    pub fn emit_device(&self, event: DeviceEvent) {
        self.emit(CameraEvent::Device(event));
    }

    pub fn emit_storage(&self, area: StorageArea, change: StorageChange) {
        self.emit(CameraEvent::Storage { area, change });
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }

    /// Pop the oldest event. The lock is released before returning so
    /// handlers may emit new events.
    pub fn pop(&self) -> Option<CameraEvent> {
        self.queue.lock().pop_front()
    }
}

impl std::fmt::Debug for EventSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSink").field("pending", &self.len()).finish()
    }
}
