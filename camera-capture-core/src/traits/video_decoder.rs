use crate::models::error::CameraError;
use crate::models::media::Blob;
use crate::models::recording_result::VideoMetadata;

/// Platform video decode service used for poster frames.
pub trait VideoDecoder: Send + Sync {
    /// Read the intrinsic size and rotation of a video container.
    ///
    /// Fails for files that are not valid containers or carry no decodable
    /// media track.
    fn read_metadata(&self, video: &Blob) -> Result<VideoMetadata, CameraError>;

    /// Decode one frame, unrotated and at full size, encoded as JPEG.
    fn render_poster(&self, video: &Blob) -> Result<Blob, CameraError>;
}
