#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Sampling exhausted: accepted {accepted} of {requested} samples after {attempts} attempts")]
    SamplingExhausted {
        requested: usize,
        accepted: usize,
        attempts: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, PlanError>;
