// Audio engine: one mixer, optional device output, and the handle factory

use std::path::Path;
use std::sync::Arc;

use crate::audio::mixer::Mixer;
#[cfg(feature = "output")]
use crate::audio::output::AudioOutput;
use crate::audio::player::TrackPlayer;
use crate::audio::HandleFactory;
use crate::settings::OutputSettings;

pub struct AudioEngine {
    mixer: Arc<Mixer>,
    #[cfg(feature = "output")]
    output: Option<AudioOutput>,
}

impl AudioEngine {
    /// Open the default output device, or fall back to a silent detached engine
    pub fn start(fallback: &OutputSettings) -> Self {
        #[cfg(feature = "output")]
        {
            match AudioOutput::open() {
                Ok((output, mixer)) => {
                    return Self {
                        mixer,
                        output: Some(output),
                    }
                }
                Err(e) => {
                    tracing::warn!("No audio output, running silent: {}", e);
                }
            }
        }

        #[cfg(not(feature = "output"))]
        tracing::warn!("Built without the `output` feature, running silent");

        Self::detached(fallback.sample_rate, fallback.channels)
    }

    /// An engine nobody pulls from unless [`AudioEngine::render`] is called
    pub fn detached(sample_rate: u32, channels: usize) -> Self {
        Self {
            mixer: Arc::new(Mixer::new(sample_rate, channels)),
            #[cfg(feature = "output")]
            output: None,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.mixer.sample_rate()
    }

    pub fn channels(&self) -> usize {
        self.mixer.channels()
    }

    /// Whether rendered audio reaches a device
    pub fn is_audible(&self) -> bool {
        #[cfg(feature = "output")]
        {
            self.output.is_some()
        }
        #[cfg(not(feature = "output"))]
        {
            false
        }
    }

    /// Pull the next block of interleaved output by hand
    pub fn render(&self, out: &mut [f32]) {
        self.mixer.render(out);
    }
}

impl HandleFactory for AudioEngine {
    type Handle = TrackPlayer;

    fn create(&self, source: &Path) -> TrackPlayer {
        TrackPlayer::new(source, self.mixer.add_voice(), self.mixer.sample_rate())
    }
}
