//! GenreScope Core
//!
//! Core types and error handling shared across GenreScope components.
//!
//! This crate provides:
//! - The persisted metadata record describing the label set
//! - Prediction and device types used by the inference pipeline
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{DevicePreference, MetadataRecord, PredictionMap, ProblemType, DEFAULT_GENRES};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{DevicePreference, MetadataRecord, PredictionMap, ProblemType};
}
