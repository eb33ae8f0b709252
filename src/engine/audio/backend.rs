// Audio output backends

use super::{AudioClip, AudioError};
use rodio::{OutputStream, OutputStreamHandle, Sink};

/// A single playing (or finished) instance of a clip
pub trait Voice {
    /// True while the voice still has audio left to play and is not paused
    fn is_playing(&self) -> bool;

    /// Stop playback immediately
    fn stop(&self);
}

/// Something that can start clips on an audio device
pub trait AudioBackend {
    /// Start playing `clip` once at `volume` (1.0 = unchanged)
    fn start(&self, clip: &AudioClip, volume: f32) -> Result<Box<dyn Voice>, AudioError>;
}

/// Rodio-based backend using the default output device
pub struct RodioBackend {
    /// Audio output stream (must be kept alive)
    _stream: OutputStream,
    /// Output stream handle for creating sinks
    handle: OutputStreamHandle,
}

impl RodioBackend {
    /// Open the default output device
    pub fn try_default() -> Result<Self, AudioError> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| AudioError::BackendInitFailed(e.to_string()))?;

        log::info!("Audio output initialized");
        Ok(Self {
            _stream: stream,
            handle,
        })
    }
}

impl AudioBackend for RodioBackend {
    fn start(&self, clip: &AudioClip, volume: f32) -> Result<Box<dyn Voice>, AudioError> {
        let sink = Sink::try_new(&self.handle)
            .map_err(|e| AudioError::PlaybackFailed(format!("Failed to create sink: {}", e)))?;
        sink.set_volume(volume);
        sink.append(clip.to_source());

        Ok(Box::new(RodioVoice { sink }))
    }
}

struct RodioVoice {
    sink: Sink,
}

impl Voice for RodioVoice {
    fn is_playing(&self) -> bool {
        !self.sink.is_paused() && !self.sink.empty()
    }

    fn stop(&self) {
        self.sink.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rodio_backend_plays_when_device_present() {
        // No audio device in CI: only exercise playback when one opens.
        let Ok(backend) = RodioBackend::try_default() else {
            return;
        };

        let clip = AudioClip::from_samples(1, 8000, vec![0; 8000]);
        let voice = backend.start(&clip, 0.5).unwrap();
        assert!(voice.is_playing());
        voice.stop();
    }
}
