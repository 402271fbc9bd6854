use serde::{Deserialize, Serialize};

/// A `width × height` pair as reported by the hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// `width / height`. Zero-height sizes report an aspect ratio of 0.
    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0 {
            return 0.0;
        }
        self.width as f64 / self.height as f64
    }

    /// Whether both dimensions are at least those of `other`.
    pub fn covers(&self, other: &Size) -> bool {
        self.width >= other.width && self.height >= other.height
    }
}

/// A named recording profile offered by the hardware as a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecorderProfile {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

impl RecorderProfile {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
        }
    }
}

/// The recording profile chosen for video mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoProfile {
    pub profile_name: String,
    pub width: u32,
    pub height: u32,
    /// Degrees; overwritten with the device orientation before use.
    pub rotation: u32,
}

impl VideoProfile {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Flash modes understood by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashMode {
    Off,
    Auto,
    On,
    Torch,
}

impl FlashMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashMode::Off => "off",
            FlashMode::Auto => "auto",
            FlashMode::On => "on",
            FlashMode::Torch => "torch",
        }
    }
}

/// Focus modes understood by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FocusMode {
    /// Focus is driven by an explicit `auto_focus` call before each capture.
    #[serde(rename = "auto")]
    Auto,
    #[serde(rename = "continuous-picture")]
    ContinuousPicture,
    #[serde(rename = "continuous-video")]
    ContinuousVideo,
}

impl FocusMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FocusMode::Auto => "auto",
            FocusMode::ContinuousPicture => "continuous-picture",
            FocusMode::ContinuousVideo => "continuous-video",
        }
    }
}

/// Everything an acquired camera reports as supported.
///
/// Read once per acquisition and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CameraCapabilities {
    pub picture_sizes: Vec<Size>,
    pub thumbnail_sizes: Vec<Size>,
    pub preview_sizes: Vec<Size>,
    /// In the order the hardware enumerates them.
    pub recorder_profiles: Vec<RecorderProfile>,
    pub flash_modes: Vec<String>,
    pub focus_modes: Vec<String>,
}

impl CameraCapabilities {
    pub fn supports_flash(&self, mode: FlashMode) -> bool {
        self.flash_modes.iter().any(|m| m == mode.as_str())
    }

    pub fn supports_focus(&self, mode: FocusMode) -> bool {
        self.focus_modes.iter().any(|m| m == mode.as_str())
    }

    pub fn recorder_profile(&self, name: &str) -> Option<&RecorderProfile> {
        self.recorder_profiles.iter().find(|p| p.name == name)
    }
}
