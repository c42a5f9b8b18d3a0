use rodio::Source;
use std::time::Duration;

const SAMPLE_RATE: u32 = 44100;
const FREQUENCY_HZ: f32 = 800.0;
const DURATION_SECS: f32 = 0.5;
const START_GAIN: f32 = 0.3;
const END_GAIN: f32 = 0.01;

/// Completion chime: an 800 Hz sine with an exponential decay envelope,
/// half a second long.
pub struct Chime {
    sample_rate: u32,
    position: u32,
    total_samples: u32,
}

impl Chime {
    pub fn new() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            position: 0,
            total_samples: (SAMPLE_RATE as f32 * DURATION_SECS) as u32,
        }
    }
}

impl Default for Chime {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for Chime {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.total_samples {
            return None;
        }
        let t = self.position as f32 / self.sample_rate as f32;

        // Exponential ramp from START_GAIN down to END_GAIN over the chime
        let gain = START_GAIN * (END_GAIN / START_GAIN).powf(t / DURATION_SECS);
        let sample = gain * (2.0 * std::f32::consts::PI * FREQUENCY_HZ * t).sin();

        self.position += 1;
        Some(sample)
    }
}

impl Source for Chime {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1 // Mono
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f32(DURATION_SECS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chime_is_finite_and_half_a_second() {
        let samples: Vec<f32> = Chime::new().collect();
        assert_eq!(samples.len(), (SAMPLE_RATE as f32 * DURATION_SECS) as usize);
    }

    #[test]
    fn amplitude_stays_within_the_envelope() {
        assert!(Chime::new().all(|s| s.abs() <= START_GAIN + f32::EPSILON));
    }

    #[test]
    fn envelope_decays_over_time() {
        let samples: Vec<f32> = Chime::new().collect();
        let head_peak = samples[..441].iter().fold(0f32, |m, s| m.max(s.abs()));
        let tail_peak = samples[samples.len() - 441..]
            .iter()
            .fold(0f32, |m, s| m.max(s.abs()));
        assert!(tail_peak < head_peak / 4.0);
    }
}
