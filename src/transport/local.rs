//! Copies files from an archive mounted on the local file system.

use std::{
    collections::BTreeSet,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::fs;

use super::{FetchOutcome, Transport};

pub struct LocalTransport {
    root: PathBuf,
    label: String,
}

impl LocalTransport {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let label = root.display().to_string();

        LocalTransport { root, label }
    }
}

#[async_trait]
impl Transport for LocalTransport {
    fn label(&self) -> &str {
        &self.label
    }

    async fn fetch(&self, remote_path: &str, target: &Path) -> Result<FetchOutcome> {
        let source = self.root.join(remote_path.trim_start_matches('/'));

        if !fs::try_exists(&source).await? {
            return Ok(FetchOutcome::NotFound);
        }

        // Partial copies never appear under the target name.
        let directory = target
            .parent()
            .context("Copy target has no parent directory")?;
        let file = NamedTempFile::new_in(directory)?;
        let bytes = fs::copy(&source, file.path()).await.with_context(|| {
            format!("Failed to copy {} to {}", source.display(), target.display())
        })?;

        file.persist(target)
            .with_context(|| format!("Failed to save {}", target.display()))?;

        Ok(FetchOutcome::Downloaded { bytes })
    }

    async fn list_remote(&self, directory: &str) -> Result<BTreeSet<String>> {
        let dir = self.root.join(directory.trim_start_matches('/'));
        let mut names = BTreeSet::new();

        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(names),
            Err(e) => return Err(e).with_context(|| format!("Failed to list {}", dir.display())),
        };

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                if let Some(name) = entry.file_name().to_str() {
                    names.insert(name.to_string());
                }
            }
        }

        Ok(names)
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn should_copy_existing_file() {
        let remote = TempDir::new().unwrap();
        let local = TempDir::new().unwrap();
        std::fs::create_dir_all(remote.path().join("2004")).unwrap();
        std::fs::write(remote.path().join("2004/a.nc"), b"abcd").unwrap();

        let transport = LocalTransport::new(remote.path());
        let target = local.path().join("a.nc");
        let outcome = transport.fetch("2004/a.nc", &target).await.unwrap();

        assert_eq!(outcome, FetchOutcome::Downloaded { bytes: 4 });
        assert_eq!(std::fs::read(&target).unwrap(), b"abcd");
    }

    #[tokio::test]
    async fn should_leave_no_file_behind_when_copy_fails() {
        let remote = TempDir::new().unwrap();
        let local = TempDir::new().unwrap();
        // A directory under the remote name exists but cannot be copied.
        std::fs::create_dir_all(remote.path().join("2004/a.nc")).unwrap();

        let transport = LocalTransport::new(remote.path());
        let target = local.path().join("a.nc");
        let result = transport.fetch("2004/a.nc", &target).await;

        assert!(result.is_err());
        assert!(!target.exists());
        assert_eq!(std::fs::read_dir(local.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn should_replace_existing_target() {
        let remote = TempDir::new().unwrap();
        let local = TempDir::new().unwrap();
        std::fs::write(remote.path().join("a.nc"), b"complete").unwrap();
        let target = local.path().join("a.nc");
        std::fs::write(&target, b"part").unwrap();

        let transport = LocalTransport::new(remote.path());
        transport.fetch("a.nc", &target).await.unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), b"complete");
    }

    #[tokio::test]
    async fn should_report_missing_file() {
        let remote = TempDir::new().unwrap();
        let local = TempDir::new().unwrap();

        let transport = LocalTransport::new(remote.path());
        let outcome = transport
            .fetch("2004/missing.nc", &local.path().join("missing.nc"))
            .await
            .unwrap();

        assert_eq!(outcome, FetchOutcome::NotFound);
        assert!(!local.path().join("missing.nc").exists());
    }

    #[tokio::test]
    async fn should_list_files_only() {
        let remote = TempDir::new().unwrap();
        std::fs::create_dir_all(remote.path().join("2004/sub")).unwrap();
        std::fs::write(remote.path().join("2004/b.nc"), b"").unwrap();
        std::fs::write(remote.path().join("2004/a.nc"), b"").unwrap();

        let transport = LocalTransport::new(remote.path());
        let names = transport.list_remote("2004").await.unwrap();

        assert_eq!(
            names.into_iter().collect::<Vec<_>>(),
            vec!["a.nc".to_string(), "b.nc".to_string()]
        );
        assert!(transport.list_remote("1999").await.unwrap().is_empty());
    }
}
