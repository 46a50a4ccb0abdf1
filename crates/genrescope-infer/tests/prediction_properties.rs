//! End-to-end properties of the label resolution and probability pipeline,
//! exercised without model weights.

use genrescope_core::{MetadataRecord, ProblemType};
use genrescope_infer::labels::resolve_labels;
use genrescope_infer::manifest::ModelManifest;
use genrescope_infer::metadata::ensure_metadata;
use genrescope_infer::pipeline::{align_to_labels, logits_to_probs, pair_with_labels};

fn prediction_for(
    logits: &[f32],
    labels: &[String],
    problem_type: ProblemType,
) -> genrescope_core::PredictionMap {
    let probs = logits_to_probs(logits, problem_type);
    let probs = align_to_labels(probs, labels.len());
    pair_with_labels(labels, &probs)
}

#[test]
fn prediction_has_one_entry_per_label_with_bounded_values() {
    let labels: Vec<String> = ["Action", "Comedy", "Drama", "Science Fiction", "Horror"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let logits = [0.3, -1.2, 2.5, 0.0, -0.7];

    for problem_type in [ProblemType::MultiClass, ProblemType::MultiLabel] {
        let map = prediction_for(&logits, &labels, problem_type);
        assert_eq!(map.len(), labels.len());
        for label in &labels {
            let p = map[label];
            assert!((0.0..=1.0).contains(&p), "{label} out of range: {p}");
        }
    }
}

#[test]
fn multiclass_probabilities_sum_to_one() {
    let labels: Vec<String> = (0..4).map(|i| format!("genre_{i}")).collect();
    let map = prediction_for(&[1.0, 0.5, -2.0, 3.0], &labels, ProblemType::MultiClass);
    let sum: f32 = map.values().sum();
    assert!((sum - 1.0).abs() < 1e-6, "sum was {sum}");
}

#[test]
fn short_probability_vector_pads_trailing_labels_with_zero() {
    let labels: Vec<String> = ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect();
    let probs = align_to_labels(vec![0.9, 0.1], labels.len());
    let map = pair_with_labels(&labels, &probs);

    assert_eq!(map["A"], 0.9);
    assert_eq!(map["B"], 0.1);
    assert_eq!(map["C"], 0.0);
    assert_eq!(map["D"], 0.0);
}

#[test]
fn long_probability_vector_truncates_in_order() {
    let labels: Vec<String> = ["A", "B"].iter().map(|s| s.to_string()).collect();
    let probs = align_to_labels(vec![0.5, 0.3, 0.2], labels.len());
    let map = pair_with_labels(&labels, &probs);

    assert_eq!(map.len(), 2);
    assert_eq!(map["A"], 0.5);
    assert_eq!(map["B"], 0.3);
}

#[test]
fn metadata_genres_take_priority_over_model_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("metadata.json");
    std::fs::write(&path, r#"{"genres":["Drama","Horror"],"top_k":null}"#).unwrap();

    let defaults = vec!["ignored".to_string()];
    let metadata = ensure_metadata(&path, &defaults).unwrap();
    let manifest = ModelManifest::from_json(r#"{"id2label":{"0":"X","1":"Y"}}"#).unwrap();

    assert_eq!(resolve_labels(&metadata, &manifest), vec!["Drama", "Horror"]);
}

#[test]
fn metadata_resolution_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("metadata.json");
    let defaults: Vec<String> = vec!["Drama".to_string(), "Comedy".to_string()];

    let first = ensure_metadata(&path, &defaults).unwrap();
    let second = ensure_metadata(&path, &defaults).unwrap();
    assert_eq!(first, second);
}

#[test]
fn resolution_falls_back_to_placeholders() {
    let metadata = MetadataRecord::new(vec![]);
    let manifest = ModelManifest::from_json("{}").unwrap();
    assert_eq!(resolve_labels(&metadata, &manifest), vec!["label_0"]);
}
