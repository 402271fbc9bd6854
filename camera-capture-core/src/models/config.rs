use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::capabilities::Size;
use super::error::CameraError;
use super::media::PickData;
use super::state::CaptureMode;

/// Five megapixels, the build-time default for both pixel ceilings.
pub const DEFAULT_MAX_PIXEL_SIZE: u64 = 5 * 1024 * 1024;

/// Physical-pixel size of the screen the viewfinder fills.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width_px: f64,
    pub height_px: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width_px: 320.0,
            height_px: 480.0,
        }
    }
}

/// Configuration for the camera core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfiguration {
    /// Largest image the gallery will display, in pixels.
    pub max_image_pixel_size: u64,

    /// Largest snapshot the camera may take, in pixels.
    pub max_snapshot_pixel_size: u64,

    /// JPEG size in bytes of a picture at the pixel ceiling, used to estimate
    /// file sizes linearly (default: 300 KiB).
    pub estimated_jpeg_file_size: u64,

    /// Free bytes required before a recording may start (default: 2 MiB).
    pub record_space_min: u64,

    /// Bytes kept free while recording (default: 1 MiB).
    pub record_space_padding: u64,

    /// Added to `width * height * 4` when checking room for one more picture.
    pub image_header_slack: u64,

    /// Recordings shorter than this may lack decodable samples.
    pub min_recording_time_ms: u64,

    pub viewport: Viewport,

    /// Recording profile names in priority order.
    pub preferred_recording_sizes: Vec<String>,

    pub initial_mode: CaptureMode,

    /// 0 = rear, 1 = front.
    pub initial_camera: usize,

    /// Suffix of DCF directory names (`100MZLLA`).
    pub dcf_directory_suffix: String,
}

impl CameraConfiguration {
    /// Parse a JSON document and validate it. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, CameraError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| CameraError::ConfigurationFailed(format!("invalid configuration: {}", e)))?;
        config.validate().map_err(CameraError::ConfigurationFailed)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_pixel_count() == 0 {
            return Err("pixel ceiling must be positive".into());
        }
        if self.record_space_padding >= self.record_space_min {
            return Err(format!(
                "record space padding ({}) must be below the minimum reserve ({})",
                self.record_space_padding, self.record_space_min
            ));
        }
        if self.initial_camera > 1 {
            return Err(format!("unsupported camera index: {}", self.initial_camera));
        }
        if self.viewport.width_px <= 0.0 || self.viewport.height_px <= 0.0 {
            return Err("viewport must be positive".into());
        }
        Ok(())
    }

    /// The stricter of the two pixel ceilings.
    pub fn max_pixel_count(&self) -> u64 {
        self.max_image_pixel_size.min(self.max_snapshot_pixel_size)
    }

    pub fn min_recording_time(&self) -> Duration {
        Duration::from_millis(self.min_recording_time_ms)
    }

    /// Selection constraints, narrowed by a pending pick when there is one.
    pub fn selection_policy(&self, pick: Option<&PickData>) -> SelectionPolicy {
        let policy = SelectionPolicy {
            target_size: None,
            target_file_size: None,
            preferred_profiles: self.preferred_recording_sizes.clone(),
            max_pixel_count: self.max_pixel_count(),
            estimated_jpeg_file_size: self.estimated_jpeg_file_size,
        };
        match pick {
            Some(data) => policy.with_pick(data),
            None => policy,
        }
    }
}

impl Default for CameraConfiguration {
    fn default() -> Self {
        Self {
            max_image_pixel_size: DEFAULT_MAX_PIXEL_SIZE,
            max_snapshot_pixel_size: DEFAULT_MAX_PIXEL_SIZE,
            estimated_jpeg_file_size: 300 * 1024,
            record_space_min: 2 * 1024 * 1024,
            record_space_padding: 1024 * 1024,
            image_header_slack: 4096,
            min_recording_time_ms: 500,
            viewport: Viewport::default(),
            preferred_recording_sizes: Vec::new(),
            initial_mode: CaptureMode::Photo,
            initial_camera: 0,
            dcf_directory_suffix: "MZLLA".into(),
        }
    }
}

/// Constraints for one size/profile selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionPolicy {
    pub target_size: Option<Size>,
    pub target_file_size: Option<u64>,
    pub preferred_profiles: Vec<String>,
    pub max_pixel_count: u64,
    pub estimated_jpeg_file_size: u64,
}

impl SelectionPolicy {
    pub fn with_pick(mut self, pick: &PickData) -> Self {
        self.target_size = pick.target_size();
        self.target_file_size = pick.target_file_size();
        self
    }
}
