//! Metadata resolver for the persisted label-set record

use genrescope_core::{MetadataRecord, Result};
use std::fs;
use std::path::Path;

/// Ensure a metadata record exists at `path`, returning it.
///
/// A missing file is created from `default_labels` with no top-k
/// preference. A file that cannot be read or parsed, or that lacks the
/// `genres` field, is overwritten with the default record; the corruption
/// is logged but not surfaced as a failure.
pub fn ensure_metadata(path: &Path, default_labels: &[String]) -> Result<MetadataRecord> {
    if !path.exists() {
        tracing::warn!(
            "metadata not found, creating {} with default genres",
            path.display()
        );
        return write_default(path, default_labels);
    }

    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            tracing::warn!("failed to read {}: {e}, recreating with defaults", path.display());
            return write_default(path, default_labels);
        }
    };

    match serde_json::from_str::<MetadataRecord>(&contents) {
        Ok(record) => Ok(record),
        Err(e) => {
            tracing::warn!(
                "metadata at {} has unexpected format: {e}, recreating with defaults",
                path.display()
            );
            write_default(path, default_labels)
        }
    }
}

fn write_default(path: &Path, default_labels: &[String]) -> Result<MetadataRecord> {
    let record = MetadataRecord::new(default_labels.to_vec());
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, serde_json::to_string_pretty(&record)?)?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_labels() -> Vec<String> {
        vec!["Drama".to_string(), "Horror".to_string()]
    }

    #[test]
    fn test_missing_file_creates_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("metadata.json");

        let record = ensure_metadata(&path, &default_labels()).unwrap();

        assert!(path.exists());
        assert_eq!(record.genres, default_labels());
        assert_eq!(record.top_k, None);
    }

    #[test]
    fn test_valid_file_returned_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.json");
        fs::write(&path, r#"{"genres":["Western","Noir"],"top_k":3}"#).unwrap();

        let record = ensure_metadata(&path, &default_labels()).unwrap();

        assert_eq!(record.genres, vec!["Western", "Noir"]);
        assert_eq!(record.top_k, Some(3));
    }

    #[test]
    fn test_corrupt_file_overwritten_with_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.json");
        fs::write(&path, b"not json at all {{{").unwrap();

        let record = ensure_metadata(&path, &default_labels()).unwrap();

        assert_eq!(record.genres, default_labels());
        // The file on disk was replaced with the default record.
        let reread: MetadataRecord =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(reread, record);
    }

    #[test]
    fn test_missing_genres_field_treated_as_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.json");
        fs::write(&path, r#"{"top_k": 5}"#).unwrap();

        let record = ensure_metadata(&path, &default_labels()).unwrap();

        assert_eq!(record.genres, default_labels());
        assert_eq!(record.top_k, None);
    }

    #[test]
    fn test_idempotent_without_mutation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.json");

        let first = ensure_metadata(&path, &default_labels()).unwrap();
        let bytes_after_first = fs::read(&path).unwrap();

        let second = ensure_metadata(&path, &default_labels()).unwrap();
        let bytes_after_second = fs::read(&path).unwrap();

        assert_eq!(first, second);
        assert_eq!(bytes_after_first, bytes_after_second);
    }
}
