//! Error types for GenreScope

/// Result type alias using GenreScope's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for GenreScope operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing or undownloadable model/tokenizer artifacts
    #[error("artifact error: {0}")]
    Artifact(String),

    /// Metadata record errors
    #[error("metadata error: {0}")]
    Metadata(String),

    /// Model construction and weight loading errors
    #[error("model error: {0}")]
    Model(String),

    /// Inference execution errors
    #[error("inference error: {0}")]
    Inference(String),

    /// Chart rendering errors
    #[error("chart error: {0}")]
    Chart(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a new artifact error
    pub fn artifact(msg: impl Into<String>) -> Self {
        Self::Artifact(msg.into())
    }

    /// Create a new metadata error
    pub fn metadata(msg: impl Into<String>) -> Self {
        Self::Metadata(msg.into())
    }

    /// Create a new model error
    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }

    /// Create a new inference error
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    /// Create a new chart error
    pub fn chart(msg: impl Into<String>) -> Self {
        Self::Chart(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
