use thiserror::Error;

#[derive(Debug, Error)]
pub enum UiError {
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
    #[error("invalid color {value:?} for {field}")]
    InvalidColor { field: &'static str, value: String },
}
