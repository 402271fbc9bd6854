pub mod capabilities;
pub mod config;
pub mod error;
pub mod events;
pub mod media;
pub mod recording_result;
pub mod state;
pub mod storage_state;
