use crate::config::{SmoothingConfig, SmoothingPolicy};

/// Limits how far the displayed volume moves per capture period.
///
/// Holds the previously displayed value; it is owned by the audio callback and
/// never shared.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplaySmoother {
    config: SmoothingConfig,
    displayed: f32,
}

impl DisplaySmoother {
    pub fn new(config: SmoothingConfig) -> Self {
        Self {
            config,
            displayed: 0.0,
        }
    }

    pub fn displayed(&self) -> f32 {
        self.displayed
    }

    /// Advances the displayed volume one period toward `raw` and returns it.
    pub fn update(&mut self, raw: f32) -> f32 {
        self.displayed = smooth(&self.config, self.displayed, raw.clamp(0.0, 1.0));
        self.displayed
    }

}

impl Default for DisplaySmoother {
    fn default() -> Self {
        Self::new(SmoothingConfig::default())
    }
}

/// One smoothing step. The result always lies between `previous` and `raw`
/// and equals `raw` exactly once the gap is small enough.
pub fn smooth(config: &SmoothingConfig, previous: f32, raw: f32) -> f32 {
    let gap = raw - previous;
    let next = match config.policy {
        SmoothingPolicy::CatchUp => {
            if gap.abs() > config.snap_threshold {
                previous + gap * config.catch_up_fraction
            } else {
                raw
            }
        }
        SmoothingPolicy::FixedStep => {
            if gap.abs() > config.max_step {
                previous + config.max_step.copysign(gap)
            } else {
                raw
            }
        }
    };
    // A step too small to change an f32 would stall short of `raw` forever.
    if next == previous {
        return raw;
    }
    next.clamp(previous.min(raw), previous.max(raw))
}
