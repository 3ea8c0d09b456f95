use crate::{
    error::{Result, StudioError},
    storage::traits::KeyValueStore,
};
use async_trait::async_trait;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs;

/// Stores each slot as `<dir>/<key>.json`.
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(StudioError::Persistence(format!(
                "Invalid slot name: {:?}",
                key
            )));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key)?;
        match fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StudioError::Persistence(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.slot_path(key)?;
        let dir = self.dir.clone();
        let contents = value.to_string();

        tokio::task::spawn_blocking(move || replace_slot(&dir, &path, &contents))
            .await
            .map_err(|e| StudioError::Persistence(format!("Slot writer panicked: {}", e)))??;

        log::debug!("Stored slot {} ({} bytes)", key, value.len());
        Ok(())
    }
}

/// Stages the value in a private temporary file beside the slot and renames
/// it over the slot, so readers see either the old or the new value and
/// concurrent writers never share a staging file.
fn replace_slot(dir: &Path, path: &Path, value: &str) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| {
        StudioError::Persistence(format!("Failed to create {}: {}", dir.display(), e))
    })?;

    let mut staged = NamedTempFile::new_in(dir).map_err(|e| {
        StudioError::Persistence(format!("Failed to stage {}: {}", path.display(), e))
    })?;
    staged.write_all(value.as_bytes()).map_err(|e| {
        StudioError::Persistence(format!("Failed to write {}: {}", path.display(), e))
    })?;
    staged.persist(path).map_err(|e| {
        StudioError::Persistence(format!("Failed to replace {}: {}", path.display(), e.error))
    })?;
    Ok(())
}
