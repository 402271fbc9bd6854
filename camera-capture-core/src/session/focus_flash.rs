use crate::models::capabilities::{CameraCapabilities, FlashMode, FocusMode};
use crate::models::state::CaptureMode;

pub const PHOTO_FLASH_MODES: [FlashMode; 3] = [FlashMode::Off, FlashMode::Auto, FlashMode::On];
pub const VIDEO_FLASH_MODES: [FlashMode; 2] = [FlashMode::Off, FlashMode::Torch];

/// The front camera never has a flash.
pub const FRONT_CAMERA: usize = 1;

fn camera_slot(camera_index: usize) -> usize {
    camera_index.min(1)
}

/// Flash-mode table for one capture mode, with per-camera state.
#[derive(Debug, Clone)]
struct FlashTable {
    modes: &'static [FlashMode],
    default_index: usize,
    supported: [bool; 2],
    current: [Option<usize>; 2],
}

impl FlashTable {
    fn new(modes: &'static [FlashMode], default_index: usize) -> Self {
        Self {
            modes,
            default_index,
            supported: [false; 2],
            current: [None; 2],
        }
    }

    fn current_index(&self, slot: usize) -> usize {
        self.current[slot].unwrap_or(self.default_index)
    }
}

/// Flash state for both capture modes and both cameras.
///
/// Selected indices persist across acquisitions; support is recomputed
/// every time a camera is configured.
#[derive(Debug, Clone)]
pub struct FlashPolicy {
    photo: FlashTable,
    video: FlashTable,
}

impl Default for FlashPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl FlashPolicy {
    pub fn new() -> Self {
        Self {
            photo: FlashTable::new(&PHOTO_FLASH_MODES, 1),
            video: FlashTable::new(&VIDEO_FLASH_MODES, 0),
        }
    }

    fn table(&self, mode: CaptureMode) -> &FlashTable {
        match mode {
            CaptureMode::Photo => &self.photo,
            CaptureMode::Video => &self.video,
        }
    }

    fn table_mut(&mut self, mode: CaptureMode) -> &mut FlashTable {
        match mode {
            CaptureMode::Photo => &mut self.photo,
            CaptureMode::Video => &mut self.video,
        }
    }

    /// A table is supported when the camera reports every mode in it.
    pub fn update_support(&mut self, camera_index: usize, capabilities: &CameraCapabilities) {
        let slot = camera_slot(camera_index);
        for table in [&mut self.photo, &mut self.video] {
            table.supported[slot] = table
                .modes
                .iter()
                .all(|&mode| capabilities.supports_flash(mode));
        }
    }

    pub fn is_supported(&self, camera_index: usize, mode: CaptureMode) -> bool {
        self.table(mode).supported[camera_slot(camera_index)]
    }

    /// Stored mode for the camera, materialising the default on first use.
    pub fn current(&mut self, camera_index: usize, mode: CaptureMode) -> FlashMode {
        let slot = camera_slot(camera_index);
        let table = self.table_mut(mode);
        let index = table.current_index(slot);
        table.current[slot] = Some(index);
        table.modes[index]
    }

    /// Step to the next mode of the table, wrapping around.
    pub fn advance(&mut self, camera_index: usize, mode: CaptureMode) -> FlashMode {
        let slot = camera_slot(camera_index);
        let table = self.table_mut(mode);
        let next = (table.current_index(slot) + 1) % table.modes.len();
        table.current[slot] = Some(next);
        table.modes[next]
    }

    /// The mode to show the user. `None` means no flash: always for the
    /// front camera, and for a camera that does not support the table.
    pub fn mode_name(&self, camera_index: usize, mode: CaptureMode) -> Option<FlashMode> {
        if camera_index == FRONT_CAMERA || !self.is_supported(camera_index, mode) {
            return None;
        }
        let table = self.table(mode);
        Some(table.modes[table.current_index(camera_slot(camera_index))])
    }
}

/// Which focus modes the acquired camera reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FocusSupport {
    pub manual: bool,
    pub continuous_picture: bool,
    pub continuous_video: bool,
}

impl FocusSupport {
    pub fn from_capabilities(capabilities: &CameraCapabilities) -> Self {
        Self {
            manual: capabilities.supports_focus(FocusMode::Auto),
            continuous_picture: capabilities.supports_focus(FocusMode::ContinuousPicture),
            continuous_video: capabilities.supports_focus(FocusMode::ContinuousVideo),
        }
    }
}

/// Focus mode to apply for a capture mode, and whether every still capture
/// must first run an explicit auto-focus cycle.
///
/// Continuous focus for the active mode wins, then manual auto-focus.
/// `None` leaves the hardware default and captures go untriggered.
pub fn select_focus_mode(mode: CaptureMode, support: &FocusSupport) -> Option<(FocusMode, bool)> {
    match mode {
        CaptureMode::Photo if support.continuous_picture => {
            return Some((FocusMode::ContinuousPicture, false))
        }
        CaptureMode::Video if support.continuous_video => {
            return Some((FocusMode::ContinuousVideo, false))
        }
        _ => {}
    }
    if support.manual {
        return Some((FocusMode::Auto, true));
    }
    None
}
