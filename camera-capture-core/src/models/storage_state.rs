use serde::{Deserialize, Serialize};

/// Where the picture storage stands with respect to taking new media.
///
/// State transitions:
/// ```text
/// uninitialized → available | no card
/// available ⇄ low capacity
/// available ⇄ unmounted
/// available ⇄ no card
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageState {
    Uninitialized,
    Available,
    NoCard,
    Unmounted,
    LowCapacity,
}

impl StorageState {
    /// Whether captures must be refused in this state.
    pub fn blocks_capture(&self) -> bool {
        matches!(self, Self::NoCard | Self::Unmounted | Self::LowCapacity)
    }
}

/// Result of a storage availability query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageAvailability {
    Available,
    Unavailable,
    /// Mounted by another device (e.g. USB mass storage).
    Shared,
}

/// Full-screen storage overlay shown over the viewfinder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Overlay {
    NoCard,
    Shared,
    NoSpace,
}

impl Overlay {
    /// Overlay to show for a storage state. Pure function of the state.
    pub fn for_state(state: StorageState) -> Option<Overlay> {
        match state {
            StorageState::Uninitialized | StorageState::Available => None,
            StorageState::NoCard => Some(Overlay::NoCard),
            StorageState::Unmounted => Some(Overlay::Shared),
            StorageState::LowCapacity => Some(Overlay::NoSpace),
        }
    }

    /// Localisation key prefix (`<key>-title`, `<key>-text`).
    pub fn l10n_key(&self) -> &'static str {
        match self {
            Overlay::NoCard => "nocard2",
            Overlay::Shared => "pluggedin",
            Overlay::NoSpace => "nospace2",
        }
    }
}
