use crate::models::capabilities::Size;
use crate::models::config::Viewport;

const ASPECT_RATIO_TOLERANCE: f64 = 0.05;

/// Pick the EXIF thumbnail size for a chosen picture size.
///
/// Only sizes whose aspect ratio is within 0.05 of the picture's are
/// considered. Of those, the smallest that fills the viewport in either
/// orientation wins, otherwise the largest. Returns `None` when no size
/// matches the aspect ratio; the hardware default then applies.
pub fn pick_thumbnail_size(sizes: &[Size], picture_size: &Size, viewport: &Viewport) -> Option<Size> {
    let picture_ratio = picture_size.aspect_ratio();

    let mut matching: Vec<Size> = sizes
        .iter()
        .copied()
        .filter(|s| (s.aspect_ratio() - picture_ratio).abs() < ASPECT_RATIO_TOLERANCE)
        .collect();

    if matching.is_empty() {
        log::error!(
            "no thumbnail size matches the aspect ratio of the picture size {}x{}",
            picture_size.width,
            picture_size.height
        );
        return None;
    }

    matching.sort_by_key(|s| s.pixel_count());

    matching
        .iter()
        .copied()
        .find(|s| fills_screen(s, viewport))
        .or_else(|| matching.last().copied())
}

/// Whether an image of this size covers the viewport held either way up.
fn fills_screen(size: &Size, viewport: &Viewport) -> bool {
    let w = size.width as f64;
    let h = size.height as f64;
    let portrait = w >= viewport.width_px || h >= viewport.height_px;
    let landscape = w >= viewport.height_px || h >= viewport.width_px;
    portrait && landscape
}
