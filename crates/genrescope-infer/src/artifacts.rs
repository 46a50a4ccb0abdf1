//! Artifact fetching: ensure model/tokenizer directories are populated

use crate::config::ArtifactSource;
use genrescope_core::{Error, Result};
use std::fs;
use std::path::Path;
use std::process::Command;

/// Populates an artifact directory from some external source.
///
/// Implementations download a full model or tokenizer bundle into the
/// destination directory. Failures are fatal to the caller; there is no
/// retry.
pub trait ArtifactDownloader {
    /// Download the bundle into `dest`
    fn download(&self, dest: &Path) -> Result<()>;
}

/// Ensure `dir` contains artifact files, invoking the downloader when it is
/// missing or empty.
///
/// A directory that already holds at least one entry is left untouched and
/// the downloader is never invoked.
pub fn ensure_present(dir: &Path, downloader: &dyn ArtifactDownloader) -> Result<()> {
    if dir_is_populated(dir)? {
        tracing::info!("directory {} already contains files", dir.display());
        return Ok(());
    }

    tracing::info!("directory {} missing or empty, downloading", dir.display());
    fs::create_dir_all(dir)?;
    downloader.download(dir)
}

/// Ensure `dir` is populated using the configured source.
///
/// Returns whether the directory ended up populated. `ArtifactSource::None`
/// with an empty directory is not an error here; callers decide whether the
/// artifact is required.
pub fn ensure_available(dir: &Path, source: &ArtifactSource) -> Result<bool> {
    if dir_is_populated(dir)? {
        tracing::info!("directory {} already contains files", dir.display());
        return Ok(true);
    }

    match downloader_for(source) {
        Some(downloader) => {
            ensure_present(dir, downloader.as_ref())?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Build a downloader for a configured source, if one is configured
pub fn downloader_for(source: &ArtifactSource) -> Option<Box<dyn ArtifactDownloader>> {
    match source {
        ArtifactSource::None => None,
        ArtifactSource::Command { program, args } => Some(Box::new(CommandDownloader {
            program: program.clone(),
            args: args.clone(),
        })),
        ArtifactSource::HuggingFace { repo, revision } => Some(Box::new(HubDownloader {
            repo: repo.clone(),
            revision: revision.clone(),
        })),
    }
}

fn dir_is_populated(dir: &Path) -> Result<bool> {
    if !dir.exists() {
        return Ok(false);
    }
    Ok(fs::read_dir(dir)?.next().is_some())
}

/// Downloader that delegates to an external process.
///
/// The process is expected to populate the destination directory itself;
/// the directory path is appended as the final argument. Exit code zero is
/// the only success signal.
pub struct CommandDownloader {
    pub program: String,
    pub args: Vec<String>,
}

impl ArtifactDownloader for CommandDownloader {
    fn download(&self, dest: &Path) -> Result<()> {
        tracing::info!("running downloader: {} {:?}", self.program, self.args);
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(dest)
            .status()
            .map_err(|e| Error::artifact(format!("failed to spawn {}: {e}", self.program)))?;

        if !status.success() {
            return Err(Error::artifact(format!(
                "downloader {} exited with {status}",
                self.program
            )));
        }
        Ok(())
    }
}

/// Downloader backed by the HuggingFace Hub.
///
/// Fetches the standard sequence-classification bundle into the destination
/// directory. `vocab.txt` is optional; everything else is required.
pub struct HubDownloader {
    pub repo: String,
    pub revision: String,
}

const REQUIRED_FILES: [&str; 3] = ["config.json", "tokenizer.json", "model.safetensors"];
const OPTIONAL_FILES: [&str; 1] = ["vocab.txt"];

impl ArtifactDownloader for HubDownloader {
    fn download(&self, dest: &Path) -> Result<()> {
        tracing::info!("downloading {} @ {} from HuggingFace", self.repo, self.revision);

        let api = hf_hub::api::sync::Api::new()
            .map_err(|e| Error::artifact(format!("failed to initialize HuggingFace API: {e}")))?;
        let repo = api.repo(hf_hub::Repo::with_revision(
            self.repo.clone(),
            hf_hub::RepoType::Model,
            self.revision.clone(),
        ));

        for file in REQUIRED_FILES {
            let cached = repo
                .get(file)
                .map_err(|e| Error::artifact(format!("failed to download {file}: {e}")))?;
            fs::copy(&cached, dest.join(file))?;
            tracing::debug!("fetched {file}");
        }

        for file in OPTIONAL_FILES {
            if let Ok(cached) = repo.get(file) {
                fs::copy(&cached, dest.join(file))?;
                tracing::debug!("fetched {file}");
            }
        }

        tracing::info!("download complete: {}", dest.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingDownloader {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingDownloader {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ArtifactDownloader for CountingDownloader {
        fn download(&self, dest: &Path) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(Error::artifact("simulated download failure"));
            }
            fs::write(dest.join("model.safetensors"), b"weights")?;
            Ok(())
        }
    }

    #[test]
    fn test_populated_dir_skips_downloader() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.json"), b"{}").unwrap();

        let downloader = CountingDownloader::new(false);
        ensure_present(dir.path(), &downloader).unwrap();

        assert_eq!(downloader.call_count(), 0);
    }

    #[test]
    fn test_empty_dir_invokes_downloader_once() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("model");

        let downloader = CountingDownloader::new(false);
        ensure_present(&target, &downloader).unwrap();

        assert_eq!(downloader.call_count(), 1);
        assert!(target.join("model.safetensors").exists());

        // A second call sees the populated directory and stays a no-op.
        ensure_present(&target, &downloader).unwrap();
        assert_eq!(downloader.call_count(), 1);
    }

    #[test]
    fn test_downloader_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("model");

        let downloader = CountingDownloader::new(true);
        let err = ensure_present(&target, &downloader).unwrap_err();

        assert!(matches!(err, Error::Artifact(_)));
    }

    #[test]
    fn test_ensure_available_without_source() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("model");

        let populated = ensure_available(&target, &ArtifactSource::None).unwrap();
        assert!(!populated);

        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("config.json"), b"{}").unwrap();
        let populated = ensure_available(&target, &ArtifactSource::None).unwrap();
        assert!(populated);
    }
}
