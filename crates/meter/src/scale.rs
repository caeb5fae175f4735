use crate::config::{MeterConfig, ScalingCurve};

/// Maps a peak magnitude to a raw volume in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VolumeScaler {
    curve: ScalingCurve,
    noise_floor: u8,
    clip_threshold: u8,
}

impl VolumeScaler {
    pub fn new(curve: ScalingCurve, noise_floor: u8, clip_threshold: u8) -> Self {
        Self {
            curve,
            noise_floor,
            clip_threshold,
        }
    }

    pub fn from_config(config: &MeterConfig) -> Self {
        Self::new(config.scaling, config.noise_floor, config.clip_threshold)
    }

    /// Whether `peak` counts as a clip event.
    pub fn is_clipping(&self, peak: u8) -> bool {
        peak >= self.clip_threshold
    }

    pub fn volume(&self, peak: u8) -> f32 {
        if self.is_clipping(peak) {
            return 1.0;
        }
        let volume = match self.curve {
            ScalingCurve::LinearWithFloor => {
                let span = self.clip_threshold.saturating_sub(self.noise_floor).max(1);
                peak.saturating_sub(self.noise_floor) as f32 / span as f32
            }
            ScalingCurve::PowerLaw => {
                let ratio = peak as f32 / self.clip_threshold.max(1) as f32;
                ratio * ratio
            }
        };
        volume.clamp(0.0, 1.0)
    }
}

impl Default for VolumeScaler {
    fn default() -> Self {
        Self::from_config(&MeterConfig::default())
    }
}
