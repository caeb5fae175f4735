use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no default input device available")]
    NoInputDevice,
    #[error("input device not found: {0}")]
    DeviceNotFound(String),
    #[error("invalid capture configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to enumerate input devices: {0}")]
    Devices(#[from] cpal::DevicesError),
    #[error("failed to query input configuration: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),
    #[error("failed to build capture stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),
    #[error("failed to start capture: {0}")]
    Play(#[from] cpal::PlayStreamError),
    #[error("failed to stop capture: {0}")]
    Pause(#[from] cpal::PauseStreamError),
    #[error("unsupported sample format: {0:?}")]
    UnsupportedFormat(cpal::SampleFormat),
}

impl AudioError {
    pub fn invalid_config<T: Into<String>>(message: T) -> Self {
        Self::InvalidConfig(message.into())
    }
}
