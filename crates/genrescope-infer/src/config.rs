//! Application configuration for directories, device, and artifact sources

use genrescope_core::{DevicePreference, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for the inference pipeline and its artifact layout.
///
/// All fields have defaults mirroring the conventional on-disk layout, so an
/// empty config file (or none at all) is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding the pretrained model bundle
    #[serde(default = "default_model_dir")]
    pub model_dir: PathBuf,

    /// Directory holding the tokenizer bundle; falls back to `model_dir`
    /// when it does not exist
    #[serde(default = "default_tokenizer_dir")]
    pub tokenizer_dir: PathBuf,

    /// Path of the persisted metadata record
    #[serde(default = "default_metadata_path")]
    pub metadata_path: PathBuf,

    /// Compute device preference
    #[serde(default)]
    pub device: DevicePreference,

    /// Where to fetch the model bundle from when `model_dir` is empty
    #[serde(default)]
    pub model_source: ArtifactSource,

    /// Where to fetch the tokenizer bundle from when `tokenizer_dir` is empty
    #[serde(default)]
    pub tokenizer_source: ArtifactSource,

    /// Override for the number of rows shown in ranked displays
    #[serde(default)]
    pub top_k: Option<usize>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_dir: default_model_dir(),
            tokenizer_dir: default_tokenizer_dir(),
            metadata_path: default_metadata_path(),
            device: DevicePreference::default(),
            model_source: ArtifactSource::default(),
            tokenizer_source: ArtifactSource::default(),
            top_k: None,
        }
    }
}

/// Source for populating a missing artifact directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ArtifactSource {
    /// No downloader configured; the directory must already be populated
    #[default]
    None,

    /// Spawn an external downloader process; exit code zero is success
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
    },

    /// Download the bundle from a HuggingFace repository
    HuggingFace {
        repo: String,
        #[serde(default = "default_revision")]
        revision: String,
    },
}

fn default_model_dir() -> PathBuf {
    PathBuf::from("movie_genre_model")
}

fn default_tokenizer_dir() -> PathBuf {
    PathBuf::from("movie_genre_tokenizer")
}

fn default_metadata_path() -> PathBuf {
    PathBuf::from("out").join("metadata.json")
}

fn default_revision() -> String {
    "main".to_string()
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        serde_yaml::from_str(&contents)
            .map_err(|e| Error::config(format!("failed to parse config file: {e}")))
    }

    /// Load from an optional config file path, defaulting when absent
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }
}
