use crate::models::capabilities::Size;
use crate::models::config::SelectionPolicy;

/// Pick the picture size for still captures.
///
/// Sizes above the pixel ceiling are dropped, then (with a target file
/// size) sizes whose estimated JPEG size exceeds it. With a target size the
/// smallest remaining size covering it wins, falling back to the largest
/// remaining size; without one the largest remaining size wins. If nothing
/// remains, the first reported size is used.
///
/// Returns `None` only for an empty list.
pub fn pick_picture_size(sizes: &[Size], policy: &SelectionPolicy) -> Option<Size> {
    let first = *sizes.first()?;

    let candidates: Vec<Size> = sizes
        .iter()
        .copied()
        .filter(|s| s.pixel_count() > 0 && s.pixel_count() <= policy.max_pixel_count)
        .filter(|s| fits_target_file_size(s, policy))
        .collect();

    let picked = match policy.target_size {
        Some(target) => {
            smallest(candidates.iter().filter(|s| s.covers(&target))).or_else(|| largest(candidates.iter()))
        }
        None => largest(candidates.iter()),
    };

    let size = picked.unwrap_or(first);
    log::debug!("picture size picked: {}x{}", size.width, size.height);
    Some(size)
}

/// Linear estimate of the JPEG size of a picture, relative to the reference
/// size of a picture at the pixel ceiling.
pub fn estimated_file_size(size: &Size, policy: &SelectionPolicy) -> f64 {
    if policy.max_pixel_count == 0 {
        return 0.0;
    }
    size.pixel_count() as f64 * policy.estimated_jpeg_file_size as f64 / policy.max_pixel_count as f64
}

fn fits_target_file_size(size: &Size, policy: &SelectionPolicy) -> bool {
    match policy.target_file_size {
        Some(target) if target > 0 => estimated_file_size(size, policy) <= target as f64,
        _ => true,
    }
}

// First of the smallest; `min_by_key` already keeps the first minimum.
fn smallest<'a>(sizes: impl Iterator<Item = &'a Size>) -> Option<Size> {
    sizes.min_by_key(|s| s.pixel_count()).copied()
}

// First of the largest; `max_by_key` would keep the last maximum.
fn largest<'a>(sizes: impl Iterator<Item = &'a Size>) -> Option<Size> {
    sizes.fold(None, |acc: Option<Size>, s| match acc {
        Some(best) if best.pixel_count() >= s.pixel_count() => Some(best),
        _ => Some(*s),
    })
}
