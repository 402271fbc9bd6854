use crate::models::capabilities::{RecorderProfile, VideoProfile};
use crate::models::config::SelectionPolicy;

/// Low-resolution profile preferred when the caller limits the file size.
pub const LOW_RES_PROFILE: &str = "qcif";

/// Profile used when no preferred profile is available.
pub const DEFAULT_PROFILE: &str = "cif";

/// Pick the recording profile.
///
/// Resolution order: `qcif` when a target file size is set, then the first
/// preferred name the hardware offers, then `cif`, then the first profile
/// reported. The returned rotation is 0; callers overwrite it with the
/// device orientation.
///
/// Returns `None` only for an empty profile list.
pub fn pick_video_profile(
    profiles: &[RecorderProfile],
    preferred: &[String],
    policy: &SelectionPolicy,
) -> Option<VideoProfile> {
    let find = |name: &str| profiles.iter().find(|p| p.name == name);

    let constrained = policy.target_file_size.map_or(false, |bytes| bytes > 0);

    let profile = constrained
        .then(|| find(LOW_RES_PROFILE))
        .flatten()
        .or_else(|| preferred.iter().find_map(|name| find(name.as_str())))
        .or_else(|| find(DEFAULT_PROFILE))
        .or_else(|| profiles.first())?;

    let picked = VideoProfile {
        profile_name: profile.name.clone(),
        width: profile.width,
        height: profile.height,
        rotation: 0,
    };
    log::debug!("video profile picked: {:?}", picked);
    Some(picked)
}
