// Resource key -> decoded clip mapping

use super::{AudioClip, AudioError};
use std::collections::HashMap;

/// Preloaded audio clips addressed by resource key
///
/// Each key is written once, when its load completes, and never evicted.
#[derive(Debug, Default)]
pub struct AudioCache {
    clips: HashMap<String, AudioClip>,
}

impl AudioCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a clip under `key`; a key can only be filled once
    pub fn insert(&mut self, key: impl Into<String>, clip: AudioClip) -> Result<(), AudioError> {
        let key = key.into();
        if self.clips.contains_key(&key) {
            return Err(AudioError::AlreadyCached(key));
        }
        self.clips.insert(key, clip);
        Ok(())
    }

    /// Look up a clip; `None` until its load has completed (or if it failed)
    pub fn get(&self, key: &str) -> Option<&AudioClip> {
        self.clips.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.clips.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip() -> AudioClip {
        AudioClip::from_samples(1, 8000, vec![0; 80])
    }

    #[test]
    fn test_lookup_before_insert_is_none() {
        let cache = AudioCache::new();
        assert!(cache.get("santa").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_insert_then_get() {
        let mut cache = AudioCache::new();
        cache.insert("santa", clip()).unwrap();
        assert!(cache.contains("santa"));
        assert_eq!(cache.get("santa").unwrap().sample_rate(), 8000);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_insert_is_write_once() {
        let mut cache = AudioCache::new();
        cache.insert("elf", clip()).unwrap();

        let replacement = AudioClip::from_samples(2, 44100, vec![0; 10]);
        let err = cache.insert("elf", replacement).unwrap_err();
        assert!(matches!(err, AudioError::AlreadyCached(key) if key == "elf"));
        assert_eq!(cache.get("elf").unwrap().channels(), 1);
    }
}
