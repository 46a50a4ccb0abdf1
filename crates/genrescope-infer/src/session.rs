//! Model session: tokenizer, weights, labels, and device held for one process

use crate::artifacts;
use crate::config::AppConfig;
use crate::labels::resolve_labels;
use crate::manifest::ModelManifest;
use crate::metadata::ensure_metadata;
use crate::pipeline::{align_to_labels, logits_to_probs, pair_with_labels};
use candle_core::{DType, Device, IndexOp, Tensor};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use genrescope_core::{
    DevicePreference, Error, MetadataRecord, PredictionMap, ProblemType, Result, DEFAULT_GENRES,
};
use std::path::Path;
use tokenizers::{Tokenizer, TruncationParams};

/// Tokenization truncates to this many tokens
const MAX_SEQ_LEN: usize = 512;

/// Everything needed to run predictions, loaded once and immutable after.
///
/// Construction is all-or-nothing: a missing artifact directory or any load
/// error is fatal, there is no degraded session.
pub struct ModelSession {
    tokenizer: Tokenizer,
    bert: BertModel,
    pooler: Linear,
    classifier: Linear,
    device: Device,
    labels: Vec<String>,
    problem_type: ProblemType,
    metadata: MetadataRecord,
}

impl std::fmt::Debug for ModelSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelSession")
            .field("device", &self.device)
            .field("labels", &self.labels)
            .field("problem_type", &self.problem_type)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

impl ModelSession {
    /// Load tokenizer, model, labels, and device per the configuration.
    ///
    /// Fetches missing artifacts first (when a source is configured), then
    /// resolves the metadata record, selects the device, and builds the
    /// BERT body plus pooler and classification head from safetensors.
    pub fn load(config: &AppConfig) -> Result<Self> {
        let model_ready = artifacts::ensure_available(&config.model_dir, &config.model_source)?;
        if !model_ready {
            return Err(Error::artifact(format!(
                "model directory {} is missing or empty and no source is configured",
                config.model_dir.display()
            )));
        }
        artifacts::ensure_available(&config.tokenizer_dir, &config.tokenizer_source)?;

        let default_genres: Vec<String> = DEFAULT_GENRES.iter().map(|g| g.to_string()).collect();
        let metadata = ensure_metadata(&config.metadata_path, &default_genres)?;

        let device = select_device(config.device);
        tracing::info!("running inference on {device:?}");

        let tokenizer = load_tokenizer(&config.tokenizer_dir, &config.model_dir)?;

        let config_path = config.model_dir.join("config.json");
        let config_contents = std::fs::read_to_string(&config_path).map_err(|e| {
            Error::model(format!("failed to read {}: {e}", config_path.display()))
        })?;
        let bert_config: BertConfig = serde_json::from_str(&config_contents)
            .map_err(|e| Error::model(format!("failed to parse model config: {e}")))?;
        let manifest = ModelManifest::from_json(&config_contents)?;

        let weights_path = config.model_dir.join("model.safetensors");
        if !weights_path.exists() {
            return Err(Error::artifact(format!(
                "weights not found at {}",
                weights_path.display()
            )));
        }

        // SAFETY: mmap'd safetensors file, safe as long as the file is not
        // modified while the model is in use.
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[&weights_path], DType::F32, &device)
                .map_err(|e| Error::model(format!("failed to load weights: {e}")))?
        };

        let hidden = bert_config.hidden_size;
        let num_outputs = manifest.declared_outputs();

        let pooler = candle_nn::linear(hidden, hidden, vb.pp("bert").pp("pooler").pp("dense"))
            .map_err(|e| Error::model(format!("failed to load pooler head: {e}")))?;
        let classifier = candle_nn::linear(hidden, num_outputs, vb.pp("classifier"))
            .map_err(|e| Error::model(format!("failed to load classifier head: {e}")))?;
        let bert = BertModel::load(vb.pp("bert"), &bert_config)
            .map_err(|e| Error::model(format!("failed to construct BERT model: {e}")))?;

        let labels = resolve_labels(&metadata, &manifest);
        let problem_type = manifest.problem_type();
        tracing::info!(
            "model loaded: {} labels, {problem_type:?} outputs",
            labels.len()
        );

        Ok(Self {
            tokenizer,
            bert,
            pooler,
            classifier,
            device,
            labels,
            problem_type,
            metadata,
        })
    }

    /// Predict genre probabilities for a synopsis.
    ///
    /// Returns one entry per resolved label; a probability vector that
    /// disagrees with the label count is padded/truncated rather than
    /// rejected.
    pub fn predict(&self, text: &str) -> Result<PredictionMap> {
        let logits = self.forward(text)?;
        let probs = logits_to_probs(&logits, self.problem_type);
        let probs = align_to_labels(probs, self.labels.len());
        Ok(pair_with_labels(&self.labels, &probs))
    }

    fn forward(&self, text: &str) -> Result<Vec<f32>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| Error::inference(format!("tokenization failed: {e}")))?;

        let input_ids = Tensor::new(encoding.get_ids(), &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| Error::inference(format!("failed to build input tensor: {e}")))?;
        let token_type_ids = Tensor::new(encoding.get_type_ids(), &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| Error::inference(format!("failed to build token type tensor: {e}")))?;
        let attention_mask = Tensor::new(encoding.get_attention_mask(), &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| Error::inference(format!("failed to build attention mask: {e}")))?;

        // Forward pass -> [1, seq, hidden]
        let hidden = self
            .bert
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))
            .map_err(|e| Error::inference(format!("forward pass failed: {e}")))?;

        // [CLS] position -> pooler (dense + tanh) -> classification head
        let logits = hidden
            .i((.., 0))
            .and_then(|cls| self.pooler.forward(&cls))
            .and_then(|pooled| pooled.tanh())
            .and_then(|pooled| self.classifier.forward(&pooled))
            .and_then(|logits| logits.squeeze(0))
            .map_err(|e| Error::inference(format!("classification head failed: {e}")))?;

        logits
            .to_vec1::<f32>()
            .map_err(|e| Error::inference(format!("failed to read logits: {e}")))
    }

    /// Ordered label list, one per model output position
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// The metadata record resolved at load time
    pub fn metadata(&self) -> &MetadataRecord {
        &self.metadata
    }

    /// Logit-to-probability conversion mode
    pub fn problem_type(&self) -> ProblemType {
        self.problem_type
    }

    /// The device this session runs on
    pub fn device(&self) -> &Device {
        &self.device
    }
}

/// Accelerated device when preferred and available, else CPU
fn select_device(preference: DevicePreference) -> Device {
    match preference {
        DevicePreference::Auto => Device::cuda_if_available(0).unwrap_or(Device::Cpu),
        DevicePreference::Cpu => Device::Cpu,
    }
}

/// Load the tokenizer, preferring the tokenizer directory and falling back
/// to the model directory, with truncation capped at [`MAX_SEQ_LEN`].
fn load_tokenizer(tokenizer_dir: &Path, model_dir: &Path) -> Result<Tokenizer> {
    let dir = preferred_tokenizer_dir(tokenizer_dir, model_dir);
    let path = dir.join("tokenizer.json");
    tracing::info!("loading tokenizer from {}", path.display());

    let mut tokenizer = Tokenizer::from_file(&path)
        .map_err(|e| Error::model(format!("failed to load tokenizer: {e}")))?;
    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length: MAX_SEQ_LEN,
            ..Default::default()
        }))
        .map_err(|e| Error::model(format!("failed to configure truncation: {e}")))?;
    Ok(tokenizer)
}

fn preferred_tokenizer_dir<'a>(tokenizer_dir: &'a Path, model_dir: &'a Path) -> &'a Path {
    if tokenizer_dir.exists() {
        tokenizer_dir
    } else {
        model_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_preference_selects_cpu() {
        assert!(matches!(select_device(DevicePreference::Cpu), Device::Cpu));
    }

    #[test]
    fn test_tokenizer_dir_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let model_dir = dir.path().join("model");
        let tokenizer_dir = dir.path().join("tokenizer");
        std::fs::create_dir_all(&model_dir).unwrap();

        // Tokenizer dir absent: fall back to the model dir.
        assert_eq!(
            preferred_tokenizer_dir(&tokenizer_dir, &model_dir),
            model_dir.as_path()
        );

        std::fs::create_dir_all(&tokenizer_dir).unwrap();
        assert_eq!(
            preferred_tokenizer_dir(&tokenizer_dir, &model_dir),
            tokenizer_dir.as_path()
        );
    }

    #[test]
    fn test_load_fails_without_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            model_dir: dir.path().join("no_such_model"),
            tokenizer_dir: dir.path().join("no_such_tokenizer"),
            metadata_path: dir.path().join("out").join("metadata.json"),
            ..AppConfig::default()
        };

        let err = ModelSession::load(&config).unwrap_err();
        assert!(matches!(err, Error::Artifact(_)));
    }
}
