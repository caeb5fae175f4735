use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::MeterError;

/// Peak magnitudes at or below this level read as silence. Unsigned 8-bit PCM
/// idles at 128, and real inputs rarely dip far below that.
pub const DEFAULT_NOISE_FLOOR: u8 = 120;
/// Largest magnitude the capture driver was observed to produce. The format
/// allows 255, but the driver tops out here.
pub const DEFAULT_CLIP_THRESHOLD: u8 = 240;
pub const DEFAULT_SNAP_THRESHOLD: f32 = 0.02;
pub const DEFAULT_CATCH_UP_FRACTION: f32 = 1.0 / 3.0;
pub const DEFAULT_MAX_STEP: f32 = 0.05;
pub const DEFAULT_CLIP_HOLD_MS: u64 = 3_000;

/// Response curve from peak magnitude to raw volume.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScalingCurve {
    /// Everything up to the noise floor is 0, the rest of the range is linear.
    #[default]
    LinearWithFloor,
    /// Square of the peak-to-threshold ratio.
    PowerLaw,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingPolicy {
    /// Cover a fraction of the gap each period, snapping once the gap is small.
    #[default]
    CatchUp,
    /// Move at most `max_step` per period.
    FixedStep,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SmoothingConfig {
    pub policy: SmoothingPolicy,
    pub snap_threshold: f32,
    pub catch_up_fraction: f32,
    pub max_step: f32,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            policy: SmoothingPolicy::CatchUp,
            snap_threshold: DEFAULT_SNAP_THRESHOLD,
            catch_up_fraction: DEFAULT_CATCH_UP_FRACTION,
            max_step: DEFAULT_MAX_STEP,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MeterConfig {
    pub noise_floor: u8,
    /// Shared by the scaler (full volume) and the clip tracker (clip event).
    pub clip_threshold: u8,
    pub scaling: ScalingCurve,
    pub smoothing: SmoothingConfig,
    pub clip_hold_ms: u64,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            noise_floor: DEFAULT_NOISE_FLOOR,
            clip_threshold: DEFAULT_CLIP_THRESHOLD,
            scaling: ScalingCurve::default(),
            smoothing: SmoothingConfig::default(),
            clip_hold_ms: DEFAULT_CLIP_HOLD_MS,
        }
    }
}

impl MeterConfig {
    pub fn clip_hold(&self) -> Duration {
        Duration::from_millis(self.clip_hold_ms)
    }

    pub fn validate(&self) -> Result<(), MeterError> {
        if self.clip_threshold == 0 {
            return Err(MeterError::invalid_config(
                "clip_threshold must be greater than 0",
            ));
        }
        if self.noise_floor >= self.clip_threshold {
            return Err(MeterError::invalid_config(format!(
                "noise_floor ({}) must be below clip_threshold ({})",
                self.noise_floor, self.clip_threshold
            )));
        }
        let smoothing = &self.smoothing;
        if !(smoothing.catch_up_fraction > 0.0 && smoothing.catch_up_fraction <= 1.0) {
            return Err(MeterError::invalid_config(
                "smoothing.catch_up_fraction must be in (0, 1]",
            ));
        }
        if !(smoothing.snap_threshold >= 0.0 && smoothing.snap_threshold.is_finite()) {
            return Err(MeterError::invalid_config(
                "smoothing.snap_threshold must be a non-negative number",
            ));
        }
        if !(smoothing.max_step > 0.0 && smoothing.max_step.is_finite()) {
            return Err(MeterError::invalid_config(
                "smoothing.max_step must be a positive number",
            ));
        }
        if self.clip_hold_ms == 0 {
            return Err(MeterError::invalid_config(
                "clip_hold_ms must be greater than 0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = MeterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.clip_hold(), Duration::from_secs(3));
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config: MeterConfig = serde_yaml::from_str(
            "clip_threshold: 255\nscaling: power_law\nsmoothing:\n  policy: fixed_step\n",
        )
        .unwrap();
        assert_eq!(config.clip_threshold, 255);
        assert_eq!(config.noise_floor, DEFAULT_NOISE_FLOOR);
        assert_eq!(config.scaling, ScalingCurve::PowerLaw);
        assert_eq!(config.smoothing.policy, SmoothingPolicy::FixedStep);
        assert_eq!(config.smoothing.max_step, DEFAULT_MAX_STEP);
    }

    #[test]
    fn validation_rejects_inconsistent_values() {
        let floor_above_threshold = MeterConfig {
            noise_floor: 240,
            ..Default::default()
        };
        assert!(floor_above_threshold.validate().is_err());

        let mut no_catch_up = MeterConfig::default();
        no_catch_up.smoothing.catch_up_fraction = 0.0;
        assert!(no_catch_up.validate().is_err());

        let mut nan_step = MeterConfig::default();
        nan_step.smoothing.max_step = f32::NAN;
        assert!(nan_step.validate().is_err());

        let no_hold = MeterConfig {
            clip_hold_ms: 0,
            ..Default::default()
        };
        assert!(no_hold.validate().is_err());
    }
}
