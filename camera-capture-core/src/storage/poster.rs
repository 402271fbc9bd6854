use std::sync::Arc;

use crate::models::error::CameraError;
use crate::models::recording_result::{CompletedVideo, VideoMetadata};
use crate::traits::media_storage::MediaStorage;
use crate::traits::video_decoder::VideoDecoder;

/// Poster file path for a video file path.
pub fn poster_path(video_path: &str) -> String {
    video_path.replacen(".3gp", ".jpg", 1)
}

/// Builds the poster frame for a finished recording and saves it next to
/// the pictures, where the gallery expects it.
pub struct PosterExtractor {
    video_storage: Arc<dyn MediaStorage>,
    picture_storage: Arc<dyn MediaStorage>,
    decoder: Box<dyn VideoDecoder>,
}

impl PosterExtractor {
    pub fn new(
        video_storage: Arc<dyn MediaStorage>,
        picture_storage: Arc<dyn MediaStorage>,
        decoder: Box<dyn VideoDecoder>,
    ) -> Self {
        Self {
            video_storage,
            picture_storage,
            decoder,
        }
    }

    /// Extract the poster for the video at the absolute `file_path`.
    ///
    /// A file that cannot be parsed or decoded is a recording without
    /// samples; it is deleted and `ExtractionFailed` returned.
    pub fn extract(&self, file_path: &str) -> Result<CompletedVideo, CameraError> {
        let video = self.video_storage.get(file_path)?;

        let metadata_read = self.decoder.read_metadata(&video);
        let poster = metadata_read
            .clone()
            .and_then(|_| self.decoder.render_poster(&video));

        let (metadata, poster) = match (metadata_read, poster) {
            (Ok(metadata), Ok(poster)) => (metadata, poster),
            (Err(e), _) | (_, Err(e)) => {
                log::warn!("not a video file {}, deleting it: {}", file_path, e);
                if let Err(e) = self.video_storage.delete(file_path) {
                    log::error!("failed to delete corrupt video {}: {}", file_path, e);
                }
                return Err(CameraError::ExtractionFailed(e.to_string()));
            }
        };

        let metadata = VideoMetadata {
            rotation: normalize_rotation(metadata.rotation),
            ..metadata
        };

        let poster_file = poster_path(file_path);
        if let Err(e) = self.picture_storage.add_named(&poster, &poster_file) {
            log::error!("failed to save poster {}: {}", poster_file, e);
        }

        Ok(CompletedVideo {
            file: file_path.to_string(),
            video,
            poster,
            metadata,
        })
    }
}

fn normalize_rotation(rotation: u32) -> u32 {
    match rotation {
        0 | 90 | 180 | 270 => rotation,
        other => {
            log::warn!("unexpected rotation: {}", other);
            0
        }
    }
}
