// One-voice-per-owner sound playback

use super::{AudioBackend, AudioClip, Voice};
use std::collections::HashMap;
use std::hash::Hash;

/// Result of asking a [`SoundPlayer`] to play a clip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Playback started
    Started,
    /// The owner's previous playback is still running; nothing was started
    AlreadyPlaying,
    /// No audio device is available
    NoOutput,
    /// The backend refused to start playback (already logged)
    Failed,
}

/// Plays clips on behalf of owners (scene objects), at most one voice each
pub struct SoundPlayer<K> {
    backend: Option<Box<dyn AudioBackend>>,
    voices: HashMap<K, Box<dyn Voice>>,
    volume: f32,
}

impl<K: Eq + Hash + Copy + std::fmt::Debug> SoundPlayer<K> {
    /// Create a player; `backend` is `None` when no device could be opened
    pub fn new(backend: Option<Box<dyn AudioBackend>>, volume: f32) -> Self {
        Self {
            backend,
            voices: HashMap::new(),
            volume,
        }
    }

    /// Start `clip` for `owner` unless that owner is already playing
    pub fn play_once(&mut self, owner: K, clip: &AudioClip) -> PlayOutcome {
        if self.is_playing(owner) {
            return PlayOutcome::AlreadyPlaying;
        }

        let Some(backend) = &self.backend else {
            return PlayOutcome::NoOutput;
        };

        match backend.start(clip, self.volume) {
            Ok(voice) => {
                self.voices.insert(owner, voice);
                PlayOutcome::Started
            }
            Err(e) => {
                log::error!("Could not play sound for {:?}: {}", owner, e);
                PlayOutcome::Failed
            }
        }
    }

    /// True while `owner`'s last voice is still playing
    pub fn is_playing(&self, owner: K) -> bool {
        self.voices
            .get(&owner)
            .map(|voice| voice.is_playing())
            .unwrap_or(false)
    }

    /// Drop voices that have finished
    pub fn update(&mut self) {
        self.voices.retain(|_, voice| voice.is_playing());
    }

    /// Stop every voice
    pub fn stop_all(&mut self) {
        for (_, voice) in self.voices.drain() {
            voice.stop();
        }
    }

    /// Number of voices currently tracked
    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    pub fn has_output(&self) -> bool {
        self.backend.is_some()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::engine::audio::AudioError;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Backend whose voices play until the shared flag is cleared
    #[derive(Default, Clone)]
    pub(crate) struct FakeBackend {
        pub(crate) playing: Rc<Cell<bool>>,
        pub(crate) started: Rc<Cell<u32>>,
        pub(crate) fail: bool,
    }

    struct FakeVoice {
        playing: Rc<Cell<bool>>,
    }

    impl Voice for FakeVoice {
        fn is_playing(&self) -> bool {
            self.playing.get()
        }

        fn stop(&self) {
            self.playing.set(false);
        }
    }

    impl AudioBackend for FakeBackend {
        fn start(&self, _clip: &AudioClip, _volume: f32) -> Result<Box<dyn Voice>, AudioError> {
            if self.fail {
                return Err(AudioError::PlaybackFailed("fake".into()));
            }
            self.playing.set(true);
            self.started.set(self.started.get() + 1);
            Ok(Box::new(FakeVoice {
                playing: self.playing.clone(),
            }))
        }
    }

    fn clip() -> AudioClip {
        AudioClip::from_samples(1, 8000, vec![0; 8])
    }

    #[test]
    fn test_no_output_is_reported() {
        let mut player: SoundPlayer<u32> = SoundPlayer::new(None, 0.5);
        assert!(!player.has_output());
        assert_eq!(player.play_once(1, &clip()), PlayOutcome::NoOutput);
    }

    #[test]
    fn test_does_not_restart_while_playing() {
        let backend = FakeBackend::default();
        let mut player = SoundPlayer::new(Some(Box::new(backend.clone())), 0.5);

        assert_eq!(player.play_once(1, &clip()), PlayOutcome::Started);
        assert_eq!(player.play_once(1, &clip()), PlayOutcome::AlreadyPlaying);
        assert_eq!(backend.started.get(), 1);

        // Finished playback can be started again
        backend.playing.set(false);
        assert_eq!(player.play_once(1, &clip()), PlayOutcome::Started);
        assert_eq!(backend.started.get(), 2);
    }

    #[test]
    fn test_update_drops_finished_voices() {
        let backend = FakeBackend::default();
        let mut player = SoundPlayer::new(Some(Box::new(backend.clone())), 0.5);

        player.play_once(7, &clip());
        assert_eq!(player.active_voices(), 1);

        backend.playing.set(false);
        player.update();
        assert_eq!(player.active_voices(), 0);
    }

    #[test]
    fn test_stop_all() {
        let backend = FakeBackend::default();
        let mut player = SoundPlayer::new(Some(Box::new(backend.clone())), 0.5);
        player.play_once(1, &clip());
        player.stop_all();
        assert!(!player.is_playing(1));
        assert!(!backend.playing.get());
    }

    #[test]
    fn test_backend_failure() {
        let backend = FakeBackend {
            fail: true,
            ..Default::default()
        };
        let mut player = SoundPlayer::new(Some(Box::new(backend)), 0.5);
        assert_eq!(player.play_once(1, &clip()), PlayOutcome::Failed);
        assert_eq!(player.active_voices(), 0);
    }
}
