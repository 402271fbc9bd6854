//! Pure selection functions over a device's capability lists.
//!
//! Every selector has a guaranteed fallback so a non-empty capability list
//! always yields a usable value.

pub mod picture;
pub mod preview;
pub mod thumbnail;
pub mod video;

pub use picture::pick_picture_size;
pub use preview::select_optimal_preview_size;
pub use thumbnail::pick_thumbnail_size;
pub use video::pick_video_profile;
