use std::sync::Arc;

use crate::models::capabilities::Size;
use crate::models::error::CameraError;
use crate::models::events::{StorageChange, StorageChangeReason};
use crate::models::storage_state::{Overlay, StorageAvailability, StorageState};
use crate::traits::camera_delegate::CameraDelegate;
use crate::traits::media_storage::MediaStorage;

/// Tracks whether picture storage can take another capture.
///
/// Re-evaluated on every capture attempt and every storage change
/// notification. The overlay shown to the user is a pure function of the
/// state (`Overlay::for_state`).
pub struct StorageGate {
    state: StorageState,
    picture_size: Option<Size>,
    header_slack: u64,
    delegate: Option<Arc<dyn CameraDelegate>>,
}

impl StorageGate {
    pub fn new(header_slack: u64) -> Self {
        Self {
            state: StorageState::Uninitialized,
            picture_size: None,
            header_slack,
            delegate: None,
        }
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn CameraDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn state(&self) -> StorageState {
        self.state
    }

    pub fn overlay(&self) -> Option<Overlay> {
        Overlay::for_state(self.state)
    }

    /// The picture size drives the low-capacity threshold.
    pub fn set_picture_size(&mut self, size: Size) {
        self.picture_size = Some(size);
    }

    /// Bytes needed for one more picture: 4 bytes per pixel plus header room.
    pub fn required_bytes(&self) -> Option<u64> {
        self.picture_size
            .map(|size| size.pixel_count() * 4 + self.header_slack)
    }

    /// Refuse captures while an overlay is up.
    pub fn admit(&self) -> Result<(), CameraError> {
        if self.state.blocks_capture() {
            return Err(CameraError::StorageUnavailable(self.state));
        }
        Ok(())
    }

    /// Recompute the state from the storage.
    ///
    /// The first call asks whether the volume is there at all; later
    /// availability changes arrive as notifications. With the volume
    /// available, free space is compared against one picture's worth.
    pub fn check(&mut self, storage: &dyn MediaStorage) -> Result<StorageState, CameraError> {
        if self.state == StorageState::Uninitialized {
            let availability = storage.available()?;
            self.apply_availability(availability);
        }

        if matches!(self.state, StorageState::Available | StorageState::LowCapacity) {
            if let Some(required) = self.required_bytes() {
                let free = storage.free_space()?;
                log::debug!("{} bytes free, {} required per picture", free, required);
                if free < required {
                    self.set_state(StorageState::LowCapacity);
                } else {
                    self.set_state(StorageState::Available);
                }
            }
        }

        Ok(self.state)
    }

    /// Apply a picture-storage change notification, then re-check.
    pub fn handle_change(
        &mut self,
        change: &StorageChange,
        storage: &dyn MediaStorage,
    ) -> Result<StorageState, CameraError> {
        match change.reason {
            StorageChangeReason::Available => self.apply_availability(StorageAvailability::Available),
            StorageChangeReason::Unavailable => self.apply_availability(StorageAvailability::Unavailable),
            StorageChangeReason::Shared => self.apply_availability(StorageAvailability::Shared),
            StorageChangeReason::Deleted => {
                if let Some(ref delegate) = self.delegate {
                    delegate.on_item_deleted(&change.path);
                }
            }
            StorageChangeReason::Created | StorageChangeReason::Modified => {}
        }
        self.check(storage)
    }

    fn apply_availability(&mut self, availability: StorageAvailability) {
        let state = match availability {
            StorageAvailability::Available => StorageState::Available,
            StorageAvailability::Unavailable => StorageState::NoCard,
            StorageAvailability::Shared => StorageState::Unmounted,
        };
        self.set_state(state);
    }

    fn set_state(&mut self, state: StorageState) {
        if self.state == state {
            return;
        }
        log::info!("storage state {:?} -> {:?}", self.state, state);
        self.state = state;
        if let Some(ref delegate) = self.delegate {
            delegate.on_storage_state_changed(state, Overlay::for_state(state));
        }
    }
}
