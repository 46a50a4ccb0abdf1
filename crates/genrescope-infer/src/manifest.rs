//! Classification-relevant fields of a HuggingFace `config.json`

use genrescope_core::{ProblemType, Result};
use serde::Deserialize;
use std::collections::HashMap;

/// The subset of the model's `config.json` this pipeline cares about.
///
/// The full config is parsed separately into the architecture config; this
/// manifest only carries label naming, output count, and the problem type.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelManifest {
    /// Index-to-label mapping, keyed by stringified indices
    #[serde(default)]
    pub id2label: Option<HashMap<String, String>>,

    /// Declared number of classification outputs
    #[serde(default)]
    pub num_labels: Option<usize>,

    /// `multi_label_classification` or `single_label_classification`
    #[serde(default)]
    pub problem_type: Option<String>,
}

impl ModelManifest {
    /// Parse from the raw contents of `config.json`
    pub fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// How logits should be converted to probabilities
    pub fn problem_type(&self) -> ProblemType {
        ProblemType::from_config_field(self.problem_type.as_deref())
    }

    /// The model's declared output dimensionality.
    ///
    /// Falls back to the `id2label` entry count, then to 1 when the config
    /// declares nothing.
    pub fn declared_outputs(&self) -> usize {
        self.num_labels
            .or_else(|| self.id2label.as_ref().map(|m| m.len()))
            .filter(|&n| n > 0)
            .unwrap_or(1)
    }
}
