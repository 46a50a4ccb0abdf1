//! Logit-to-probability conversion and label pairing

use genrescope_core::{PredictionMap, ProblemType};

/// Convert raw logits to probabilities.
///
/// Multi-label models get an independent logistic transform per output, so
/// probabilities do not normalize across labels. Multi-class models get a
/// softmax stabilized by subtracting the maximum logit before
/// exponentiating.
pub fn logits_to_probs(logits: &[f32], problem_type: ProblemType) -> Vec<f32> {
    if logits.is_empty() {
        return Vec::new();
    }

    match problem_type {
        ProblemType::MultiLabel => logits.iter().map(|&x| sigmoid(x)).collect(),
        ProblemType::MultiClass => {
            let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
            let exps: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
            let sum: f32 = exps.iter().sum();
            exps.into_iter().map(|e| e / sum).collect()
        }
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Reconcile a probability vector with the label count.
///
/// Shorter vectors are padded with zeros on the right; longer ones are
/// truncated. This silently masks a label/output mismatch rather than
/// erroring; the mismatch is logged so it at least leaves a trace.
pub fn align_to_labels(mut probs: Vec<f32>, label_count: usize) -> Vec<f32> {
    if probs.len() != label_count {
        tracing::warn!(
            "probability vector has {} entries for {} labels, adjusting",
            probs.len(),
            label_count
        );
        probs.resize(label_count, 0.0);
    }
    probs
}

/// Pair each label with its probability by position
pub fn pair_with_labels(labels: &[String], probs: &[f32]) -> PredictionMap {
    labels
        .iter()
        .cloned()
        .zip(probs.iter().copied())
        .collect()
}
