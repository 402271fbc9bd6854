//! In-memory device storage volume.
//!
//! Files live in a map keyed by absolute path under [`ROOT`]. Change
//! notifications go to the `EventSink` registered with [`MemoryStorage::watch`].
//! A non-empty `add_named` reports `Created` followed by `Modified`, the way
//! a volume reports a file being created and then flushed.

use std::collections::BTreeMap;

use parking_lot::Mutex;

use camera_capture_core::models::error::CameraError;
use camera_capture_core::models::events::{EventSink, StorageArea, StorageChange, StorageChangeReason};
use camera_capture_core::models::media::Blob;
use camera_capture_core::models::storage_state::StorageAvailability;
use camera_capture_core::traits::media_storage::MediaStorage;

pub const ROOT: &str = "/sdcard/";

struct Volume {
    files: BTreeMap<String, Blob>,
    free_bytes: u64,
    availability: StorageAvailability,
    watcher: Option<(StorageArea, EventSink)>,
}

pub struct MemoryStorage {
    volume: Mutex<Volume>,
}

impl MemoryStorage {
    pub fn new(free_bytes: u64) -> Self {
        Self {
            volume: Mutex::new(Volume {
                files: BTreeMap::new(),
                free_bytes,
                availability: StorageAvailability::Available,
                watcher: None,
            }),
        }
    }

    /// Deliver change notifications for this volume to `events`.
    pub fn watch(&self, area: StorageArea, events: EventSink) {
        self.volume.lock().watcher = Some((area, events));
    }

    pub fn set_free_space(&self, free_bytes: u64) {
        self.volume.lock().free_bytes = free_bytes;
    }

    /// Change availability and notify like a card insert, removal or USB
    /// share would.
    pub fn set_availability(&self, availability: StorageAvailability) {
        let reason = match availability {
            StorageAvailability::Available => StorageChangeReason::Available,
            StorageAvailability::Unavailable => StorageChangeReason::Unavailable,
            StorageAvailability::Shared => StorageChangeReason::Shared,
        };
        let mut volume = self.volume.lock();
        volume.availability = availability;
        notify(&volume, reason, "");
    }

    /// Overwrite (or create) a file, as the recorder does when flushing.
    /// Emits `Modified`.
    pub fn write(&self, path: &str, blob: Blob) -> String {
        let absolute = absolute(path);
        let mut volume = self.volume.lock();
        volume.files.insert(absolute.clone(), blob);
        notify(&volume, StorageChangeReason::Modified, &absolute);
        absolute
    }

    pub fn contains(&self, path: &str) -> bool {
        self.volume.lock().files.contains_key(&absolute(path))
    }

    /// Absolute paths of every stored file, sorted.
    pub fn paths(&self) -> Vec<String> {
        self.volume.lock().files.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.volume.lock().files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volume.lock().files.is_empty()
    }
}

fn absolute(path: &str) -> String {
    if path.starts_with(ROOT) {
        path.to_string()
    } else {
        format!("{}{}", ROOT, path.trim_start_matches('/'))
    }
}

fn notify(volume: &Volume, reason: StorageChangeReason, path: &str) {
    if let Some((area, ref events)) = volume.watcher {
        events.emit_storage(area, StorageChange::new(reason, path));
    }
}

impl MediaStorage for MemoryStorage {
    fn add_named(&self, blob: &Blob, path: &str) -> Result<String, CameraError> {
        let absolute = absolute(path);
        let mut volume = self.volume.lock();
        if volume.availability != StorageAvailability::Available {
            return Err(CameraError::StorageWriteFailed(format!(
                "volume {:?}",
                volume.availability
            )));
        }
        if volume.files.contains_key(&absolute) {
            return Err(CameraError::StorageWriteFailed(format!("{} already exists", absolute)));
        }
        volume.files.insert(absolute.clone(), blob.clone());
        log::debug!("stored {} ({} bytes)", absolute, blob.len());
        notify(&volume, StorageChangeReason::Created, &absolute);
        if !blob.is_empty() {
            notify(&volume, StorageChangeReason::Modified, &absolute);
        }
        Ok(absolute)
    }

    fn get(&self, path: &str) -> Result<Blob, CameraError> {
        self.volume
            .lock()
            .files
            .get(&absolute(path))
            .cloned()
            .ok_or_else(|| CameraError::StorageReadFailed(format!("{} not found", path)))
    }

    fn exists(&self, path: &str) -> bool {
        self.contains(path)
    }

    fn delete(&self, path: &str) -> Result<(), CameraError> {
        let absolute = absolute(path);
        let mut volume = self.volume.lock();
        if volume.files.remove(&absolute).is_none() {
            return Err(CameraError::StorageWriteFailed(format!("{} not found", absolute)));
        }
        notify(&volume, StorageChangeReason::Deleted, &absolute);
        Ok(())
    }

    fn free_space(&self) -> Result<u64, CameraError> {
        Ok(self.volume.lock().free_bytes)
    }

    fn available(&self) -> Result<StorageAvailability, CameraError> {
        Ok(self.volume.lock().availability)
    }
}
