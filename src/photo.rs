// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Photograph directory: one image and one sidecar label file per capture,
//! both named by the capture key.
//!
//! ```text
//! images/20250601_100405.jpg
//! images/20250601_100405.txt   "01 June 2025, 10:04:05 — European Robin"
//! ```
//!
//! Each write goes to its own temporary file in the directory and is renamed
//! into place. Two captures in the same second share a key; the later one
//! replaces the earlier.

use crate::capture::CaptureStamp;
use crate::config::{IMAGE_EXT, SIDECAR_EXT, SIDECAR_SEPARATOR};
use crate::error::{StorageError, StorageResult};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A classified photograph. The label is set once at ingest and never changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhotoEvent {
    pub capture_key: String,
    pub capture_time_display: String,
    pub label: String,
}

impl PhotoEvent {
    pub fn new(stamp: &CaptureStamp, label: impl Into<String>) -> Self {
        Self {
            capture_key: stamp.key(),
            capture_time_display: stamp.display(),
            label: label.into(),
        }
    }

    /// Sidecar text: display time and label.
    pub fn caption(&self) -> String {
        format!("{}{}{}", self.capture_time_display, SIDECAR_SEPARATOR, self.label)
    }
}

/// One listed photograph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhotoEntry {
    pub key: String,
    pub file_name: String,
    /// Sidecar text, or the image file name when the sidecar is missing.
    pub caption: String,
}

#[derive(Clone, Debug)]
pub struct PhotoStore {
    dir: PathBuf,
}

impl PhotoStore {
    pub fn open(dir: impl AsRef<Path>) -> StorageResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Bind to a directory without creating it.
    pub fn at(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_for(&self, key: &str, ext: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", key, ext))
    }

    /// Write the raw image bytes under the stamp's key.
    pub fn persist_photo(&self, bytes: &[u8], stamp: &CaptureStamp) -> StorageResult<PathBuf> {
        let path = self.file_for(&stamp.key(), IMAGE_EXT);
        write_replace(&self.dir, &path, bytes)?;
        tracing::debug!(path = ?path, bytes = bytes.len(), "photo persisted");
        Ok(path)
    }

    pub fn write_sidecar(&self, event: &PhotoEvent) -> StorageResult<PathBuf> {
        let path = self.file_for(&event.capture_key, SIDECAR_EXT);
        write_replace(&self.dir, &path, event.caption().as_bytes())?;
        Ok(path)
    }

    /// Sidecar caption for a key, if present and readable.
    pub fn read_caption(&self, key: &str) -> Option<String> {
        let path = self.file_for(key, SIDECAR_EXT);
        match fs::read_to_string(&path) {
            Ok(text) => Some(text.trim().to_string()),
            Err(e) => {
                tracing::debug!(path = ?path, "no sidecar: {}", e);
                None
            }
        }
    }

    /// All photographs, newest first.
    ///
    /// Ordering is reverse lexicographic on file name, which is reverse
    /// chronological because keys are fixed width. A missing directory holds
    /// no photographs.
    pub fn list(&self) -> StorageResult<Vec<PhotoEntry>> {
        let suffix = format!(".{}", IMAGE_EXT);
        let mut names = Vec::new();

        let dir = match fs::read_dir(&self.dir) {
            Ok(dir) => dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        for entry in dir {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if name.len() > suffix.len() && name.ends_with(&suffix) {
                    names.push(name.to_string());
                }
            }
        }

        names.sort_unstable_by(|a, b| b.cmp(a));

        Ok(names
            .into_iter()
            .map(|file_name| {
                let key = file_name.strip_suffix(&suffix).unwrap_or(&file_name).to_string();
                let caption = self.read_caption(&key).unwrap_or_else(|| file_name.clone());
                PhotoEntry { key, file_name, caption }
            })
            .collect())
    }

    /// Resolve a served file name inside the directory.
    pub fn image_path(&self, file_name: &str) -> StorageResult<PathBuf> {
        if file_name.is_empty()
            || file_name.contains('/')
            || file_name.contains('\\')
            || file_name.contains("..")
        {
            return Err(StorageError::InvalidName(file_name.to_string()));
        }
        Ok(self.dir.join(file_name))
    }
}

fn write_replace(dir: &Path, path: &Path, bytes: &[u8]) -> StorageResult<()> {
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
