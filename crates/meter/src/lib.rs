pub mod clip;
pub mod config;
pub mod error;
pub mod peak;
pub mod pipeline;
pub mod scale;
pub mod smoothing;

pub use crate::clip::{ClipState, ClipTracker};
pub use crate::config::{MeterConfig, ScalingCurve, SmoothingConfig, SmoothingPolicy};
pub use crate::error::MeterError;
pub use crate::peak::peak_magnitude;
pub use crate::pipeline::{LevelFrame, LevelMeter};
pub use crate::scale::VolumeScaler;
pub use crate::smoothing::DisplaySmoother;
