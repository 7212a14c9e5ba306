//! Filesystem storage for news attachments.

use std::fs;
use std::path::{Component, Path, PathBuf};

use chrono::{Datelike, Utc};
use slug::slugify;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::types::{AttachmentPath, TypeConstraintError};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid stored path")]
    InvalidPath,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<TypeConstraintError> for StorageError {
    fn from(_: TypeConstraintError) -> Self {
        Self::InvalidPath
    }
}

/// An uploaded file waiting in a temporary location.
#[derive(Debug, Clone, Copy)]
pub struct PendingUpload<'a> {
    pub original_name: &'a str,
    pub source: &'a Path,
}

/// Persists uploads and hands back their path relative to the media root.
pub trait AttachmentStore {
    fn save(&self, upload: PendingUpload<'_>) -> Result<AttachmentPath, StorageError>;

    /// Delete a stored attachment; a file that is already gone is not an error.
    fn remove(&self, stored: &AttachmentPath) -> Result<(), StorageError>;
}

/// Stores attachments below a media root as `YYYY/MM/DD/<uuid>-<slug>.<ext>`.
#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
}

impl MediaStorage {
    /// Initialise storage rooted at `root`, creating it if necessary.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, std::io::Error> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of a stored attachment.
    pub fn resolve(&self, stored: &AttachmentPath) -> Result<PathBuf, StorageError> {
        let relative = Path::new(stored.as_str());
        if relative.is_absolute()
            || relative
                .components()
                .any(|component| matches!(component, Component::ParentDir | Component::Prefix(_)))
        {
            return Err(StorageError::InvalidPath);
        }

        Ok(self.root.join(relative))
    }

    fn build_stored_path(original_name: &str) -> String {
        let today = Utc::now().date_naive();
        let directory = format!("{}/{:02}/{:02}", today.year(), today.month(), today.day());
        format!(
            "{directory}/{}-{}",
            Uuid::new_v4(),
            sanitize_filename(original_name)
        )
    }
}

impl AttachmentStore for MediaStorage {
    fn save(&self, upload: PendingUpload<'_>) -> Result<AttachmentPath, StorageError> {
        let stored = AttachmentPath::new(Self::build_stored_path(upload.original_name))?;
        let absolute = self.resolve(&stored)?;

        if let Some(parent) = absolute.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(upload.source, &absolute)?;

        log::info!("Stored attachment {stored}");
        Ok(stored)
    }

    fn remove(&self, stored: &AttachmentPath) -> Result<(), StorageError> {
        let absolute = self.resolve(stored)?;
        match fs::remove_file(&absolute) {
            Ok(()) => {
                log::info!("Removed attachment {stored}");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn sanitize_filename(original: &str) -> String {
    // Some browsers send the full client path.
    let original = original.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(original);
    let path = Path::new(original);
    let stem = path
        .file_stem()
        .and_then(|value| value.to_str())
        .unwrap_or("upload");
    let mut base = slugify(stem);
    if base.is_empty() {
        base = "upload".to_string();
    }

    let extension = path
        .extension()
        .and_then(|value| value.to_str())
        .map(|value| slugify(value.trim_matches('.')))
        .filter(|value| !value.is_empty());

    match extension {
        Some(extension) => format!("{base}.{extension}"),
        None => base,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn sanitizes_client_file_names() {
        assert_eq!(sanitize_filename("Relatório Final.PDF"), "relatorio-final.pdf");
        assert_eq!(sanitize_filename("C:\\fakepath\\foto.jpg"), "foto.jpg");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("???"), "upload");
    }

    #[test]
    fn saves_copy_below_root() {
        let root = tempfile::tempdir().unwrap();
        let storage = MediaStorage::new(root.path().join("media")).unwrap();

        let mut source = tempfile::NamedTempFile::new().unwrap();
        source.write_all(b"conteudo").unwrap();

        let stored = storage
            .save(PendingUpload {
                original_name: "nota.txt",
                source: source.path(),
            })
            .unwrap();

        assert!(stored.as_str().ends_with("-nota.txt"));
        let absolute = storage.resolve(&stored).unwrap();
        assert!(absolute.starts_with(storage.root()));
        assert_eq!(fs::read(absolute).unwrap(), b"conteudo");
    }

    #[test]
    fn remove_deletes_stored_file_and_tolerates_missing_ones() {
        let root = tempfile::tempdir().unwrap();
        let storage = MediaStorage::new(root.path()).unwrap();

        let mut source = tempfile::NamedTempFile::new().unwrap();
        source.write_all(b"anexo").unwrap();
        let stored = storage
            .save(PendingUpload {
                original_name: "anexo.pdf",
                source: source.path(),
            })
            .unwrap();
        let absolute = storage.resolve(&stored).unwrap();
        assert!(absolute.exists());

        storage.remove(&stored).unwrap();
        assert!(!absolute.exists());

        storage.remove(&stored).unwrap();
    }

    #[test]
    fn resolve_joins_relative_paths() {
        let root = tempfile::tempdir().unwrap();
        let storage = MediaStorage::new(root.path()).unwrap();
        let stored = AttachmentPath::new("a/b.txt").unwrap();
        assert_eq!(
            storage.resolve(&stored).unwrap(),
            root.path().join("a").join("b.txt")
        );
    }
}
