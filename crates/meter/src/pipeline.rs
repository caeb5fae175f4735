use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tracing::trace;

use crate::clip::{ClipState, ClipTracker};
use crate::config::MeterConfig;
use crate::peak::peak_magnitude;
use crate::scale::VolumeScaler;
use crate::smoothing::DisplaySmoother;
use crate::MeterError;

/// Result of one capture period, handed to the renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelFrame {
    pub peak: u8,
    pub raw_volume: f32,
    /// Smoothed volume in `[0, 1]`; this is what gets drawn.
    pub volume: f32,
    pub clip: ClipState,
}

impl LevelFrame {
    pub fn clipped_recently(&self) -> bool {
        self.clip == ClipState::ClippedRecently
    }
}

/// Per-period pipeline: peak, scale, clip tracking, smoothing.
///
/// Runs inside the audio callback. Nothing here blocks.
#[derive(Debug)]
pub struct LevelMeter {
    scaler: VolumeScaler,
    smoother: DisplaySmoother,
    clip: ClipTracker,
    last: LevelFrame,
}

impl LevelMeter {
    pub fn new(config: &MeterConfig, runtime: Handle) -> Result<Self, MeterError> {
        config.validate()?;
        Ok(Self {
            scaler: VolumeScaler::from_config(config),
            smoother: DisplaySmoother::new(config.smoothing),
            clip: ClipTracker::new(config.clip_hold(), runtime),
            last: LevelFrame::default(),
        })
    }

    pub fn last_frame(&self) -> LevelFrame {
        self.last
    }

    pub fn process(&mut self, samples: &[u8]) -> LevelFrame {
        if samples.is_empty() {
            trace!("ignoring empty capture period");
            return self.last;
        }

        let peak = peak_magnitude(samples);
        if self.scaler.is_clipping(peak) {
            self.clip.indicate_clipping();
        }
        let raw_volume = self.scaler.volume(peak);
        let volume = self.smoother.update(raw_volume);

        self.last = LevelFrame {
            peak,
            raw_volume,
            volume,
            clip: self.clip.state(),
        };
        self.last
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use approx::assert_abs_diff_eq;
    use tokio::time::{sleep, Instant};

    use super::*;

    const PERIOD: Duration = Duration::from_millis(16);

    fn meter() -> LevelMeter {
        LevelMeter::new(&MeterConfig::default(), Handle::current()).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn silence_settles_at_zero_without_clipping() {
        let mut meter = meter();
        for _ in 0..5 {
            let frame = meter.process(&[0; 800]);
            assert_eq!(frame.volume, 0.0);
            assert_eq!(frame.clip, ClipState::Clear);
            sleep(PERIOD).await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn loud_input_drains_to_silence() {
        let mut meter = meter();
        for _ in 0..20 {
            meter.process(&[200; 64]);
        }
        let mut frame = meter.last_frame();
        for _ in 0..30 {
            frame = meter.process(&[128; 64]);
        }
        assert_abs_diff_eq!(frame.raw_volume, 8.0 / 120.0, epsilon = 1e-6);
        assert_eq!(frame.volume, frame.raw_volume);
    }

    #[tokio::test(start_paused = true)]
    async fn one_clipped_sample_flags_once_then_clears() {
        let mut meter = meter();
        let quiet = [130u8; 800];
        let mut clipped = quiet;
        clipped[400] = 240;

        let mut clip_at = None;
        let mut cleared_at = None;
        let mut rises = 0;
        let mut previous = ClipState::Clear;

        for period in 0..300 {
            let buffer = if period == 10 { &clipped } else { &quiet };
            let frame = meter.process(buffer);
            if period == 10 {
                clip_at = Some(Instant::now());
            }
            match (previous, frame.clip) {
                (ClipState::Clear, ClipState::ClippedRecently) => rises += 1,
                (ClipState::ClippedRecently, ClipState::Clear) => {
                    cleared_at.get_or_insert(Instant::now());
                }
                _ => {}
            }
            previous = frame.clip;
            sleep(PERIOD).await;
        }

        assert_eq!(rises, 1);
        let held = cleared_at.unwrap() - clip_at.unwrap();
        assert!(held >= Duration::from_secs(3), "cleared after {held:?}");
        assert!(held <= Duration::from_secs(3) + PERIOD, "cleared after {held:?}");
        assert_eq!(previous, ClipState::Clear);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_period_repeats_the_last_frame() {
        let mut meter = meter();
        let frame = meter.process(&[180; 32]);
        assert_eq!(meter.process(&[]), frame);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_config_is_rejected() {
        let config = MeterConfig {
            noise_floor: 250,
            ..Default::default()
        };
        assert!(LevelMeter::new(&config, Handle::current()).is_err());
    }
}
