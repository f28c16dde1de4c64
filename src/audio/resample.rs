// Offline sample rate conversion with rubato
// Tracks are converted once at load time to the engine's output rate

use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

const CHUNK_FRAMES: usize = 1024;

/// Convert interleaved `samples` from `from_rate` to `to_rate`.
///
/// The output holds exactly `ceil(frames * to_rate / from_rate)` frames with
/// the resampler delay already trimmed.
pub fn resample_interleaved(
    samples: &[f32],
    channels: usize,
    from_rate: u32,
    to_rate: u32,
) -> Result<Vec<f32>, String> {
    if from_rate == to_rate || channels == 0 || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let ratio = to_rate as f64 / from_rate as f64;
    let params = SincInterpolationParameters {
        sinc_len: 128,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Cubic,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let mut resampler = SincFixedIn::<f32>::new(ratio, 1.0, params, CHUNK_FRAMES, channels)
        .map_err(|e| format!("resampler creation failed: {}", e))?;

    let planes = deinterleave(samples, channels);
    let in_frames = planes[0].len();
    let wanted = (in_frames as f64 * ratio).ceil() as usize;
    let delay = resampler.output_delay();

    let mut out: Vec<Vec<f32>> = vec![Vec::with_capacity(wanted + delay); channels];
    let mut offset = 0;

    while in_frames - offset >= resampler.input_frames_next() {
        let take = resampler.input_frames_next();
        let chunk: Vec<&[f32]> = planes.iter().map(|p| &p[offset..offset + take]).collect();
        let produced = resampler
            .process(&chunk, None)
            .map_err(|e| format!("resampling failed: {}", e))?;
        append(&mut out, produced);
        offset += take;
    }

    if offset < in_frames {
        let rest: Vec<&[f32]> = planes.iter().map(|p| &p[offset..]).collect();
        let produced = resampler
            .process_partial(Some(rest.as_slice()), None)
            .map_err(|e| format!("resampling failed: {}", e))?;
        append(&mut out, produced);
    }

    // Flush until the delayed tail has come out
    while out[0].len() < wanted + delay {
        let produced = resampler
            .process_partial::<Vec<f32>>(None, None)
            .map_err(|e| format!("resampling failed: {}", e))?;
        if produced[0].is_empty() {
            break;
        }
        append(&mut out, produced);
    }

    let end = (wanted + delay).min(out[0].len());
    let start = delay.min(end);
    Ok(interleave(&out, start, end))
}

fn deinterleave(samples: &[f32], channels: usize) -> Vec<Vec<f32>> {
    let frames = samples.len() / channels;
    let mut planes = vec![Vec::with_capacity(frames); channels];
    for frame in samples.chunks_exact(channels) {
        for (ch, sample) in frame.iter().enumerate() {
            planes[ch].push(*sample);
        }
    }
    planes
}

fn interleave(planes: &[Vec<f32>], start: usize, end: usize) -> Vec<f32> {
    let mut out = Vec::with_capacity((end - start) * planes.len());
    for frame in start..end {
        for plane in planes {
            out.push(plane[frame]);
        }
    }
    out
}

fn append(out: &mut [Vec<f32>], produced: Vec<Vec<f32>>) {
    for (plane, chunk) in out.iter_mut().zip(produced) {
        plane.extend_from_slice(&chunk);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_rate_is_passthrough() {
        let samples = vec![0.1, -0.1, 0.2, -0.2];
        let out = resample_interleaved(&samples, 2, 48000, 48000).unwrap();
        assert_eq!(out, samples);
    }

    #[test]
    fn upsampling_produces_expected_frame_count() {
        let frames = 44100 / 4;
        let samples: Vec<f32> = (0..frames)
            .flat_map(|i| {
                let s = (i as f32 * 440.0 * std::f32::consts::TAU / 44100.0).sin() * 0.5;
                [s, s]
            })
            .collect();

        let out = resample_interleaved(&samples, 2, 44100, 48000).unwrap();
        let expected = (frames as f64 * 48000.0 / 44100.0).ceil() as usize;
        assert_eq!(out.len(), expected * 2);
        assert!(out.iter().all(|s| s.is_finite() && s.abs() <= 1.0));
    }

    #[test]
    fn downsampling_shrinks_the_buffer() {
        let samples = vec![0.25f32; 4800];
        let out = resample_interleaved(&samples, 1, 48000, 24000).unwrap();
        assert_eq!(out.len(), 2400);
    }
}
