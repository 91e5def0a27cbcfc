use std::{
    io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use eyre::{Context, Result};
use tokio::fs;
use tracing::{debug, warn};

use crate::TemplateFile;

/// Destination for generated files.
///
/// The generator calls [`clean`](DataSink::clean) once before any write,
/// [`write`](DataSink::write) once per file, possibly from many tasks at the
/// same time, and [`post_clean`](DataSink::post_clean) once after every
/// write has returned.
///
/// Implementations must tolerate concurrent writes to distinct paths. The
/// outcome of concurrent writes to the same path is unspecified.
#[async_trait]
pub trait DataSink: Send + Sync {
    /// Remove any previous output.
    ///
    /// Returns whether the destination is clean. A `false` result is not
    /// fatal to the caller.
    async fn clean(&self) -> bool;

    /// Persist one file at its relative path, overwriting an existing one.
    async fn write(&self, file: &TemplateFile) -> Result<()>;

    /// Finalize the destination after all writes were attempted.
    async fn post_clean(&self) -> Result<()>;
}

/// A [`DataSink`] writing into a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileDataSink {
    root: PathBuf,
}

impl FileDataSink {
    /// Create a sink rooted at the given output directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the output directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn reset_root(&self) -> io::Result<()> {
        if fs::try_exists(&self.root).await? {
            fs::remove_dir_all(&self.root).await?;
        }
        fs::create_dir_all(&self.root).await
    }
}

#[async_trait]
impl DataSink for FileDataSink {
    async fn clean(&self) -> bool {
        match self.reset_root().await {
            Ok(()) => true,
            Err(e) => {
                warn!(root = %self.root.display(), error = %e, "failed to clean output directory");
                false
            }
        }
    }

    async fn write(&self, file: &TemplateFile) -> Result<()> {
        let path = file.resolve(&self.root)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .wrap_err_with(|| format!("failed to create '{}'", parent.display()))?;
        }
        fs::write(&path, file.content())
            .await
            .wrap_err_with(|| format!("failed to write '{}'", path.display()))?;

        debug!(path = file.relative_path(), "wrote file");
        Ok(())
    }

    async fn post_clean(&self) -> Result<()> {
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || prune_empty_dirs(&root, true))
            .await
            .wrap_err("pruning task failed")?
            .wrap_err_with(|| format!("failed to prune '{}'", self.root.display()))?;
        Ok(())
    }
}

/// Remove empty directories below `dir`. Returns whether `dir` ended up empty.
///
/// The root itself is kept. Symlinks are never followed, so a link to a
/// directory counts as content.
fn prune_empty_dirs(dir: &Path, is_root: bool) -> io::Result<bool> {
    if !dir.is_dir() {
        return Ok(false);
    }

    let mut empty = true;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() && prune_empty_dirs(&entry.path(), false)? {
            continue;
        }
        empty = false;
    }

    if empty && !is_root {
        std::fs::remove_dir(dir)?;
    }
    Ok(empty)
}

#[cfg(test)]
mod tests {
    use std::fs as std_fs;

    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn test_clean_removes_previous_output() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("gen");
        std_fs::create_dir_all(root.join("stale")).unwrap();
        std_fs::write(root.join("stale").join("old.py"), "old").unwrap();

        let sink = FileDataSink::new(&root);

        assert!(sink.clean().await);
        assert!(root.exists());
        assert_eq!(std_fs::read_dir(&root).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_clean_creates_missing_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("a").join("b");

        let sink = FileDataSink::new(&root);

        assert!(sink.clean().await);
        assert!(root.is_dir());
    }

    #[tokio::test]
    async fn test_clean_reports_failure_when_root_is_blocked() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("file");
        std_fs::write(&blocker, "not a directory").unwrap();

        let sink = FileDataSink::new(blocker.join("gen"));

        assert!(!sink.clean().await);
    }

    #[tokio::test]
    async fn test_write_creates_parent_dirs_and_overwrites() {
        let temp = TempDir::new().unwrap();
        let sink = FileDataSink::new(temp.path());

        sink.write(&TemplateFile::new("a/b/c.py", "first"))
            .await
            .unwrap();
        sink.write(&TemplateFile::new("a/b/c.py", "second"))
            .await
            .unwrap();

        let written = std_fs::read_to_string(temp.path().join("a/b/c.py")).unwrap();
        assert_eq!(written, "second");
    }

    #[tokio::test]
    async fn test_write_rejects_escaping_path() {
        let temp = TempDir::new().unwrap();
        let sink = FileDataSink::new(temp.path().join("gen"));

        let result = sink.write(&TemplateFile::new("../escape.py", "x")).await;

        assert!(result.is_err());
        assert!(!temp.path().join("escape.py").exists());
    }

    #[tokio::test]
    async fn test_post_clean_prunes_empty_dirs() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        std_fs::create_dir_all(root.join("empty").join("nested")).unwrap();
        std_fs::create_dir_all(root.join("kept")).unwrap();
        std_fs::write(root.join("kept").join("file.py"), "").unwrap();

        let sink = FileDataSink::new(root);
        sink.post_clean().await.unwrap();

        assert!(!root.join("empty").exists());
        assert!(root.join("kept").join("file.py").exists());
        assert!(root.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_post_clean_does_not_follow_symlinks() {
        let temp = TempDir::new().unwrap();
        let outside = temp.path().join("outside");
        std_fs::create_dir_all(outside.join("empty")).unwrap();
        let root = temp.path().join("gen");
        std_fs::create_dir_all(&root).unwrap();
        std::os::unix::fs::symlink(&outside, root.join("link")).unwrap();

        let sink = FileDataSink::new(&root);
        sink.post_clean().await.unwrap();

        assert!(outside.join("empty").is_dir());
        assert!(root.join("link").exists());
    }
}
