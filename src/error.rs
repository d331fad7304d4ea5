use thiserror::Error;

/// Errors raised while laying out or rendering a table
#[derive(Debug, Error)]
pub enum ChartError {
    /// The renderer has no usable table (unset, no rows, no categories) or a
    /// setting is malformed.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An operation was invoked out of order, e.g. painting before layout.
    #[error("invalid state: {0}")]
    State(String),

    /// The drawing backend refused a primitive.
    #[error("drawing backend error: {0}")]
    Backend(String),

    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, ChartError>;
