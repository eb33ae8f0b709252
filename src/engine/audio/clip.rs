// Decoded audio buffers

use super::AudioError;
use rodio::Source;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

/// A fully decoded, interleaved 16-bit audio buffer
///
/// Cloning is cheap: the samples are shared.
#[derive(Debug, Clone)]
pub struct AudioClip {
    channels: u16,
    sample_rate: u32,
    samples: Arc<[i16]>,
}

impl AudioClip {
    /// Decode an encoded audio file (WAV, OGG Vorbis, MP3 or FLAC)
    pub fn decode(bytes: Vec<u8>) -> Result<Self, AudioError> {
        let decoder =
            rodio::Decoder::new(Cursor::new(bytes)).map_err(|e| AudioError::Decode(e.to_string()))?;

        let channels = decoder.channels();
        let sample_rate = decoder.sample_rate();
        if channels == 0 || sample_rate == 0 {
            return Err(AudioError::Decode(format!(
                "invalid stream layout ({} channels at {} Hz)",
                channels, sample_rate
            )));
        }

        let samples: Vec<i16> = decoder.collect();
        Ok(Self::from_samples(channels, sample_rate, samples))
    }

    /// Wrap already-decoded interleaved samples
    pub fn from_samples(channels: u16, sample_rate: u32, samples: Vec<i16>) -> Self {
        Self {
            channels,
            sample_rate,
            samples: samples.into(),
        }
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Playback length of the clip
    pub fn duration(&self) -> Duration {
        let frames = self.samples.len() as u64 / u64::from(self.channels.max(1));
        Duration::from_secs_f64(frames as f64 / f64::from(self.sample_rate.max(1)))
    }

    /// A fresh rodio source that plays this clip from the start
    pub(crate) fn to_source(&self) -> rodio::buffer::SamplesBuffer<i16> {
        rodio::buffer::SamplesBuffer::new(self.channels, self.sample_rate, self.samples.to_vec())
    }
}
