// Decoded, rate-converted PCM ready for the mixer

use std::path::Path;
use std::time::Duration;

use crate::audio::decoder::{decode_file, DecodedAudio};
use crate::audio::resample::resample_interleaved;
use crate::error::PlaybackRejected;

/// Interleaved PCM at the engine's sample rate
#[derive(Debug, Clone)]
pub struct LoopTrack {
    samples: Vec<f32>,
    channels: usize,
    sample_rate: u32,
}

impl LoopTrack {
    pub fn new(samples: Vec<f32>, channels: usize, sample_rate: u32) -> Self {
        let channels = channels.max(1);
        let mut samples = samples;
        samples.truncate(samples.len() - samples.len() % channels);
        Self {
            samples,
            channels,
            sample_rate,
        }
    }

    /// Decode `path` and convert it to `sample_rate`
    pub fn load(path: &Path, sample_rate: u32) -> Result<Self, PlaybackRejected> {
        let decoded = decode_file(path)?;
        Self::from_decoded(path, decoded, sample_rate)
    }

    fn from_decoded(
        path: &Path,
        decoded: DecodedAudio,
        sample_rate: u32,
    ) -> Result<Self, PlaybackRejected> {
        let samples = resample_interleaved(
            &decoded.samples,
            decoded.channels,
            decoded.sample_rate,
            sample_rate,
        )
        .map_err(|reason| PlaybackRejected::Undecodable {
            path: path.to_path_buf(),
            reason,
        })?;

        tracing::debug!(
            "Loaded {:?}: {} frames, {} ch, {} Hz -> {} Hz",
            path,
            decoded.frames(),
            decoded.channels,
            decoded.sample_rate,
            sample_rate
        );

        Ok(Self::new(samples, decoded.channels, sample_rate))
    }

    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn duration(&self) -> Duration {
        frames_to_duration(self.frames(), self.sample_rate)
    }

    /// Sample for output channel `out_ch` at `frame`.
    /// Mono tracks feed every output channel; wider tracks wrap.
    #[inline]
    pub fn sample(&self, frame: usize, out_ch: usize) -> f32 {
        self.samples[frame * self.channels + out_ch % self.channels]
    }
}

pub fn frames_to_duration(frames: usize, sample_rate: u32) -> Duration {
    if sample_rate == 0 {
        return Duration::ZERO;
    }
    Duration::from_secs_f64(frames as f64 / sample_rate as f64)
}

pub fn duration_to_frames(position: Duration, sample_rate: u32) -> usize {
    (position.as_secs_f64() * sample_rate as f64).round() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mono_feeds_every_output_channel() {
        let track = LoopTrack::new(vec![0.1, 0.2, 0.3], 1, 48000);
        assert_eq!(track.frames(), 3);
        assert_eq!(track.sample(1, 0), 0.2);
        assert_eq!(track.sample(1, 1), 0.2);
    }

    #[test]
    fn stereo_maps_channels_in_order() {
        let track = LoopTrack::new(vec![0.1, -0.1, 0.2, -0.2], 2, 48000);
        assert_eq!(track.frames(), 2);
        assert_eq!(track.sample(1, 0), 0.2);
        assert_eq!(track.sample(1, 1), -0.2);
    }

    #[test]
    fn trailing_partial_frame_is_dropped() {
        let track = LoopTrack::new(vec![0.1, -0.1, 0.2], 2, 48000);
        assert_eq!(track.frames(), 1);
    }

    #[test]
    fn frame_and_duration_conversions_agree() {
        let track = LoopTrack::new(vec![0.0; 24000], 1, 48000);
        assert_eq!(track.duration(), Duration::from_millis(500));
        assert_eq!(duration_to_frames(Duration::from_millis(250), 48000), 12000);
        assert_eq!(frames_to_duration(0, 0), Duration::ZERO);
    }
}
