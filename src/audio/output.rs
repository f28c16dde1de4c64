// Audio output using cpal
// Pulls blocks from the mixer on the device callback

use std::sync::mpsc;
use std::sync::Arc;
use std::thread::JoinHandle;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Stream, StreamConfig};

use crate::audio::mixer::Mixer;
use crate::error::{Result, SoundboardError};

/// A running output stream.
///
/// cpal streams cannot leave the thread that built them, so the stream lives
/// on its own thread until this value is dropped.
pub struct AudioOutput {
    shutdown: Option<mpsc::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl AudioOutput {
    /// Open the default output device and start feeding it from a new mixer
    pub fn open() -> Result<(Self, Arc<Mixer>)> {
        let (ready_tx, ready_rx) = mpsc::channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let thread = std::thread::Builder::new()
            .name("moodboard-output".to_string())
            .spawn(move || {
                let stream = match Self::start_stream() {
                    Ok((stream, mixer, name)) => {
                        let _ = ready_tx.send(Ok((mixer, name)));
                        stream
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };

                // Parks until the sender is used or dropped
                let _ = shutdown_rx.recv();
                if let Err(e) = stream.pause() {
                    tracing::warn!("Failed to pause output stream: {}", e);
                }
            })?;

        let (mixer, device_name) = ready_rx
            .recv()
            .map_err(|_| SoundboardError::Output("output thread exited early".to_string()))??;

        tracing::info!(
            "Audio output on {:?}: {} Hz, {} ch",
            device_name,
            mixer.sample_rate(),
            mixer.channels()
        );

        Ok((
            Self {
                shutdown: Some(shutdown_tx),
                thread: Some(thread),
            },
            mixer,
        ))
    }

    fn start_stream() -> Result<(Stream, Arc<Mixer>, String)> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or_else(|| SoundboardError::Output("no output device available".to_string()))?;
        let name = device.name().unwrap_or_else(|_| "unknown".to_string());

        let config = device
            .default_output_config()
            .map_err(|e| SoundboardError::Output(format!("failed to get default output config: {}", e)))?;

        let mixer = Arc::new(Mixer::new(config.sample_rate().0, config.channels() as usize));

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => {
                Self::build_stream::<f32>(&device, &config.into(), Arc::clone(&mixer))?
            }
            cpal::SampleFormat::I16 => {
                Self::build_stream::<i16>(&device, &config.into(), Arc::clone(&mixer))?
            }
            cpal::SampleFormat::U16 => {
                Self::build_stream::<u16>(&device, &config.into(), Arc::clone(&mixer))?
            }
            format => {
                return Err(SoundboardError::Output(format!(
                    "unsupported sample format: {:?}",
                    format
                )))
            }
        };

        stream
            .play()
            .map_err(|e| SoundboardError::Output(format!("failed to start stream: {}", e)))?;

        Ok((stream, mixer, name))
    }

    fn build_stream<T: cpal::SizedSample + cpal::FromSample<f32>>(
        device: &cpal::Device,
        config: &StreamConfig,
        mixer: Arc<Mixer>,
    ) -> Result<Stream> {
        let mut scratch: Vec<f32> = Vec::new();

        device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    scratch.resize(data.len(), 0.0);
                    mixer.render(&mut scratch);
                    for (out, sample) in data.iter_mut().zip(scratch.iter()) {
                        *out = T::from_sample(*sample);
                    }
                },
                move |err| {
                    tracing::error!("Audio output error: {}", err);
                },
                None,
            )
            .map_err(|e| SoundboardError::Output(format!("failed to build output stream: {}", e)))
    }
}

impl Drop for AudioOutput {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
