use crate::models::capabilities::Size;
use crate::models::config::Viewport;

const ASPECT_RATIO_TOLERANCE: f64 = 0.1;

/// Pick the photo-mode preview size for the viewport.
///
/// Sizes and viewport are compared landscape-normalised. Among sizes whose
/// aspect ratio is within 0.1 of the viewport's, the one whose short side is
/// closest to the viewport's short side wins; if no size matches the ratio,
/// the ratio is ignored. Returns `None` only for an empty list.
pub fn select_optimal_preview_size(sizes: &[Size], viewport: &Viewport) -> Option<Size> {
    let long = viewport.width_px.max(viewport.height_px);
    let short = viewport.width_px.min(viewport.height_px);
    if short <= 0.0 {
        return sizes.first().copied();
    }
    let target_ratio = long / short;

    let ratio_matches =
        |s: &Size| (landscape_ratio(s) - target_ratio).abs() <= ASPECT_RATIO_TOLERANCE;

    closest_short_side(sizes.iter().filter(|s| ratio_matches(s)), short)
        .or_else(|| closest_short_side(sizes.iter(), short))
}

fn landscape_ratio(size: &Size) -> f64 {
    let long = size.width.max(size.height) as f64;
    let short = size.width.min(size.height) as f64;
    if short == 0.0 {
        return 0.0;
    }
    long / short
}

fn closest_short_side<'a>(sizes: impl Iterator<Item = &'a Size>, target: f64) -> Option<Size> {
    sizes.fold(None, |best: Option<(Size, f64)>, s| {
        let diff = (s.width.min(s.height) as f64 - target).abs();
        match best {
            Some((_, best_diff)) if best_diff <= diff => best,
            _ => Some((*s, diff)),
        }
    })
    .map(|(size, _)| size)
}
