//! Decoder for the toy video container written by `SimCameraHandle`.
//!
//! Layout: `b"SIMV"`, width (u32 LE), height (u32 LE), rotation (u16 LE),
//! then opaque payload.

use camera_capture_core::models::error::CameraError;
use camera_capture_core::models::media::Blob;
use camera_capture_core::models::recording_result::VideoMetadata;
use camera_capture_core::traits::video_decoder::VideoDecoder;

pub const MAGIC: &[u8; 4] = b"SIMV";
const HEADER_LEN: usize = 14;

/// Encode a toy container with `payload_len` bytes of frame data.
pub fn encode_video(width: u32, height: u32, rotation: u16, payload_len: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(HEADER_LEN + payload_len);
    data.extend_from_slice(MAGIC);
    data.extend_from_slice(&width.to_le_bytes());
    data.extend_from_slice(&height.to_le_bytes());
    data.extend_from_slice(&rotation.to_le_bytes());
    data.extend(std::iter::repeat(0x5a).take(payload_len));
    data
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SimVideoDecoder;

impl SimVideoDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl VideoDecoder for SimVideoDecoder {
    fn read_metadata(&self, video: &Blob) -> Result<VideoMetadata, CameraError> {
        let data = &video.data;
        if data.len() < HEADER_LEN || &data[..4] != MAGIC {
            return Err(CameraError::ExtractionFailed(format!(
                "not a video container ({} bytes)",
                data.len()
            )));
        }
        let width = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
        let height = u32::from_le_bytes([data[8], data[9], data[10], data[11]]);
        let rotation = u16::from_le_bytes([data[12], data[13]]);
        if width == 0 || height == 0 {
            return Err(CameraError::ExtractionFailed("no video track".into()));
        }
        Ok(VideoMetadata {
            width,
            height,
            rotation: rotation as u32,
        })
    }

    fn render_poster(&self, video: &Blob) -> Result<Blob, CameraError> {
        let meta = self.read_metadata(video)?;
        let mut jpeg = vec![0xff, 0xd8];
        jpeg.extend_from_slice(&meta.width.to_be_bytes());
        jpeg.extend_from_slice(&meta.height.to_be_bytes());
        jpeg.extend_from_slice(&[0xff, 0xd9]);
        Ok(Blob::jpeg(jpeg))
    }
}
