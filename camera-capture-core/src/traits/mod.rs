pub mod camera_delegate;
pub mod camera_provider;
pub mod media_storage;
pub mod pick_responder;
pub mod video_decoder;
