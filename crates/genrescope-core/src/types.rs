//! Core types for GenreScope

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Genres used when no metadata record exists yet
pub const DEFAULT_GENRES: [&str; 5] = ["Action", "Comedy", "Drama", "Science Fiction", "Horror"];

/// Mapping from label to probability in `[0, 1]`, produced per inference call.
///
/// Keys are unique; values only sum to 1 in the multi-class case.
pub type PredictionMap = HashMap<String, f32>;

/// Persisted description of the label set used to annotate raw model outputs.
///
/// Created with default genres when the file is missing or unreadable,
/// read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// Ordered label names, one per model output position
    pub genres: Vec<String>,

    /// Preferred number of entries shown in ranked displays
    #[serde(default)]
    pub top_k: Option<usize>,
}

impl MetadataRecord {
    /// Create a record from a label list, with no top-k preference
    pub fn new(genres: Vec<String>) -> Self {
        Self {
            genres,
            top_k: None,
        }
    }

    /// Record built from the default genre list
    pub fn with_default_genres() -> Self {
        Self::new(DEFAULT_GENRES.iter().map(|g| g.to_string()).collect())
    }
}

/// Compute device preference, chosen once at load time and held for the session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevicePreference {
    /// Use an accelerator when one is available, otherwise CPU
    #[default]
    Auto,
    /// Force CPU inference
    Cpu,
}

/// How raw logits are converted to probabilities
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProblemType {
    /// Mutually exclusive labels; probabilities sum to 1 via softmax
    #[default]
    MultiClass,
    /// Independent labels; per-output sigmoid, no sum constraint
    MultiLabel,
}

impl ProblemType {
    /// Parse the HuggingFace `problem_type` config field.
    ///
    /// Anything other than `multi_label_classification` (including an absent
    /// field) is treated as multi-class.
    pub fn from_config_field(value: Option<&str>) -> Self {
        match value {
            Some("multi_label_classification") => Self::MultiLabel,
            _ => Self::MultiClass,
        }
    }
}
