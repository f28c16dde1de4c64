// Waveform indicator shown under the active mood

use rand::Rng;
use serde::Serialize;

pub const WAVEFORM_BARS: usize = 5;
pub const MIN_BAR_HEIGHT_PX: f32 = 8.0;
pub const MAX_BAR_HEIGHT_PX: f32 = 24.0;
const BAR_DELAY_STEP_SECS: f32 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaveformBar {
    pub height_px: f32,
    pub delay_secs: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Waveform {
    pub bars: Vec<WaveformBar>,
}

impl Waveform {
    /// Random bar heights with staggered animation delays
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let bars = (0..WAVEFORM_BARS)
            .map(|i| WaveformBar {
                height_px: rng.gen_range(MIN_BAR_HEIGHT_PX..MAX_BAR_HEIGHT_PX),
                delay_secs: i as f32 * BAR_DELAY_STEP_SECS,
            })
            .collect();
        Self { bars }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn bars_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let waveform = Waveform::generate(&mut rng);
            assert_eq!(waveform.bars.len(), WAVEFORM_BARS);
            assert!(waveform
                .bars
                .iter()
                .all(|b| (MIN_BAR_HEIGHT_PX..MAX_BAR_HEIGHT_PX).contains(&b.height_px)));
        }
    }

    #[test]
    fn delays_are_staggered() {
        let waveform = Waveform::generate(&mut StdRng::seed_from_u64(1));
        let delays: Vec<f32> = waveform.bars.iter().map(|b| b.delay_secs).collect();
        assert_eq!(delays[0], 0.0);
        for pair in delays.windows(2) {
            assert!((pair[1] - pair[0] - 0.1).abs() < 1e-6);
        }
    }
}
