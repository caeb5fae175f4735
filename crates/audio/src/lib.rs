pub mod backend;
pub mod capture;
pub mod dsp;
pub mod error;

pub use backend::{CaptureBackend, CaptureConfig, CaptureStream, PeriodCallback, ScriptedBackend};
pub use capture::{list_input_devices, CpalBackend};
pub use dsp::{PeriodChunker, ToU8Sample};
pub use error::AudioError;
