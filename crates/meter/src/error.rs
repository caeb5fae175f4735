use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MeterError {
    #[error("invalid meter configuration: {0}")]
    InvalidConfig(String),
}

impl MeterError {
    pub fn invalid_config<T: Into<String>>(message: T) -> Self {
        Self::InvalidConfig(message.into())
    }
}
