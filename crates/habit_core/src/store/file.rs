//! Directory-backed store: one file per key.
//!
//! # Invariants
//! - A key maps to `<dir>/<key>.json`.
//! - Writes land in a temp file inside the same directory and are persisted
//!   over the target, so readers see either the old or the new blob. A failed
//!   write removes its temp file.

use super::{validate_key, KeyValueStore, StoreResult};
use log::debug;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const BLOB_EXTENSION: &str = "json";

/// File-system key-value store rooted at one data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens a store rooted at `root`, creating the directory when missing.
    pub fn open(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        debug!(
            "event=store_open module=store status=ok backend=file root={}",
            root.display()
        );
        Ok(Self { root })
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.{BLOB_EXTENSION}"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        validate_key(key)?;
        match fs::read_to_string(self.blob_path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        validate_key(key)?;
        let mut staging = NamedTempFile::new_in(&self.root)?;
        staging.write_all(value.as_bytes())?;
        staging.as_file().sync_all()?;
        staging
            .persist(self.blob_path(key))
            .map_err(|err| err.error)?;
        Ok(())
    }
}
