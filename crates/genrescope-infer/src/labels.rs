//! Label resolution: an ordered chain of fallible resolvers

use crate::manifest::ModelManifest;
use genrescope_core::MetadataRecord;

/// Resolve the ordered label list for a loaded model.
///
/// Tiers are tried in strict priority order, first match wins:
/// 1. the metadata record's genres, if non-empty;
/// 2. the model config's `id2label`, re-ordered by numeric index;
/// 3. numeric placeholders sized to the declared output count.
pub fn resolve_labels(metadata: &MetadataRecord, manifest: &ModelManifest) -> Vec<String> {
    let tiers: [&dyn Fn() -> Option<Vec<String>>; 3] = [
        &|| metadata_labels(metadata),
        &|| config_labels(manifest),
        &|| Some(placeholder_labels(manifest.declared_outputs())),
    ];

    // The placeholder tier always yields, so the chain cannot come up empty.
    tiers
        .iter()
        .find_map(|tier| tier())
        .unwrap_or_default()
}

fn metadata_labels(metadata: &MetadataRecord) -> Option<Vec<String>> {
    if metadata.genres.is_empty() {
        return None;
    }
    Some(metadata.genres.clone())
}

/// Order `id2label` entries by numeric key ascending; non-numeric keys are
/// sorted lexically and appended after the numeric ones.
fn config_labels(manifest: &ModelManifest) -> Option<Vec<String>> {
    let id2label = manifest.id2label.as_ref()?;
    if id2label.is_empty() {
        return None;
    }

    let mut numeric: Vec<(usize, &String)> = Vec::new();
    let mut lexical: Vec<(&String, &String)> = Vec::new();
    for (key, label) in id2label {
        match key.parse::<usize>() {
            Ok(idx) => numeric.push((idx, label)),
            Err(_) => lexical.push((key, label)),
        }
    }
    numeric.sort_by_key(|(idx, _)| *idx);
    lexical.sort_by_key(|(key, _)| key.as_str());

    Some(
        numeric
            .into_iter()
            .map(|(_, label)| label.clone())
            .chain(lexical.into_iter().map(|(_, label)| label.clone()))
            .collect(),
    )
}

/// Numeric placeholder labels `label_0 .. label_{n-1}`
pub fn placeholder_labels(n: usize) -> Vec<String> {
    (0..n.max(1)).map(|i| format!("label_{i}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn manifest_with_id2label(pairs: &[(&str, &str)]) -> ModelManifest {
        ModelManifest {
            id2label: Some(
                pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ),
            num_labels: None,
            problem_type: None,
        }
    }

    #[test]
    fn test_metadata_genres_win_over_id2label() {
        let metadata = MetadataRecord::new(vec!["Drama".to_string(), "Horror".to_string()]);
        let manifest = manifest_with_id2label(&[("0", "X"), ("1", "Y")]);

        let labels = resolve_labels(&metadata, &manifest);
        assert_eq!(labels, vec!["Drama", "Horror"]);
    }

    #[test]
    fn test_empty_metadata_falls_through_to_config() {
        let metadata = MetadataRecord::new(vec![]);
        let manifest = manifest_with_id2label(&[("1", "Horror"), ("0", "Drama"), ("2", "Comedy")]);

        let labels = resolve_labels(&metadata, &manifest);
        assert_eq!(labels, vec!["Drama", "Horror", "Comedy"]);
    }

    #[test]
    fn test_non_numeric_keys_sorted_lexically_last() {
        let metadata = MetadataRecord::new(vec![]);
        let manifest = manifest_with_id2label(&[("1", "B"), ("zeta", "Z"), ("0", "A"), ("alpha", "X")]);

        let labels = resolve_labels(&metadata, &manifest);
        assert_eq!(labels, vec!["A", "B", "X", "Z"]);
    }

    #[test]
    fn test_placeholders_when_nothing_declared() {
        let metadata = MetadataRecord::new(vec![]);
        let manifest = ModelManifest {
            id2label: None,
            num_labels: Some(3),
            problem_type: None,
        };

        let labels = resolve_labels(&metadata, &manifest);
        assert_eq!(labels, vec!["label_0", "label_1", "label_2"]);
    }

    #[test]
    fn test_placeholders_default_to_single_output() {
        let metadata = MetadataRecord::new(vec![]);
        let manifest = ModelManifest::default();

        assert_eq!(resolve_labels(&metadata, &manifest), vec!["label_0"]);
    }

    #[test]
    fn test_empty_id2label_falls_through() {
        let metadata = MetadataRecord::new(vec![]);
        let manifest = ModelManifest {
            id2label: Some(HashMap::new()),
            num_labels: Some(2),
            problem_type: None,
        };

        let labels = resolve_labels(&metadata, &manifest);
        assert_eq!(labels, vec!["label_0", "label_1"]);
    }
}
