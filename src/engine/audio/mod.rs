// Audio: decoded clips, the key -> clip cache, and playback
//
// Decoding and output go through rodio. Everything above the backend trait is
// device-independent so it can run (and be tested) without a sound card.

mod backend;
mod cache;
pub(crate) mod clip;
pub(crate) mod player;

pub use backend::{AudioBackend, RodioBackend, Voice};
pub use cache::AudioCache;
pub use clip::AudioClip;
pub use player::{PlayOutcome, SoundPlayer};

/// Audio errors
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("Could not decode audio data: {0}")]
    Decode(String),

    #[error("Audio backend initialization failed: {0}")]
    BackendInitFailed(String),

    #[error("Playback failed: {0}")]
    PlaybackFailed(String),

    #[error("Sound already cached under key '{0}'")]
    AlreadyCached(String),
}
