use crate::models::error::CameraError;
use crate::models::media::Blob;
use crate::models::storage_state::StorageAvailability;

/// A device storage volume (one instance for pictures, one for videos).
///
/// Paths may be storage-relative or absolute as returned by `add_named`.
/// Change notifications are delivered through the camera event queue as
/// `CameraEvent::Storage` with absolute paths.
pub trait MediaStorage: Send + Sync {
    /// Store `blob` under `path`, returning the absolute path.
    /// Fails if the file already exists.
    fn add_named(&self, blob: &Blob, path: &str) -> Result<String, CameraError>;

    fn get(&self, path: &str) -> Result<Blob, CameraError>;

    fn exists(&self, path: &str) -> bool {
        self.get(path).is_ok()
    }

    fn delete(&self, path: &str) -> Result<(), CameraError>;

    /// Free bytes on the volume.
    fn free_space(&self) -> Result<u64, CameraError>;

    fn available(&self) -> Result<StorageAvailability, CameraError>;
}
