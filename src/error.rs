use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    #[error("Axis {axis} out of range for tensor of rank {rank}, expected an axis in [0, {rank})")]
    AxisOutOfRange { axis: i64, rank: usize },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid operator: {0}")]
    InvalidOperator(String),

    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),

    #[error("Invalid graph structure: {0}")]
    InvalidGraph(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
