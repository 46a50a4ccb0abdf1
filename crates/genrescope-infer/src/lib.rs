//! GenreScope Inference
//!
//! Loads a pretrained BERT sequence-classification model with Candle and
//! turns movie synopses into genre probability maps.
//!
//! The pipeline runs in a fixed order: artifact fetching, metadata
//! resolution, model loading (tokenizer, weights, ordered label list,
//! device), then per-call prediction. A missing artifact or load failure is
//! fatal; there is no partial session state.

pub mod artifacts;
pub mod config;
pub mod labels;
pub mod manifest;
pub mod metadata;
pub mod pipeline;
pub mod session;

pub use artifacts::{ensure_present, ArtifactDownloader, CommandDownloader, HubDownloader};
pub use config::{AppConfig, ArtifactSource};
pub use labels::resolve_labels;
pub use manifest::ModelManifest;
pub use metadata::ensure_metadata;
pub use session::ModelSession;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::artifacts::{ensure_present, ArtifactDownloader};
    pub use crate::config::{AppConfig, ArtifactSource};
    pub use crate::session::ModelSession;
    pub use genrescope_core::prelude::*;
}
