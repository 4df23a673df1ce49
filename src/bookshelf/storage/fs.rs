use super::KeyValueStore;
use crate::error::{Result, ShelfError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const VALUE_EXT: &str = "json";

/// File-backed key-value store: `<root>/<key>.json`, one file per key.
///
/// Writes go to a temporary file first and are renamed into place, so a crash
/// mid-write leaves the previous value intact.
pub struct FsKeyValueStore {
    root: PathBuf,
}

impl FsKeyValueStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn item_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{}.{}", key, VALUE_EXT)))
    }

    fn ensure_dir(&self, key: &str) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(|e| io_error(e, key))?;
        }
        Ok(())
    }
}

fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(ShelfError::Store(format!("Invalid storage key: {:?}", key)))
    }
}

/// A full disk is the filesystem's version of an exceeded quota.
fn io_error(e: std::io::Error, key: &str) -> ShelfError {
    match e.kind() {
        ErrorKind::StorageFull | ErrorKind::QuotaExceeded => ShelfError::QuotaExceeded {
            key: key.to_string(),
        },
        _ => ShelfError::Io(e),
    }
}

impl KeyValueStore for FsKeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.item_path(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ShelfError::Io(e)),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.item_path(key)?;
        self.ensure_dir(key)?;

        let tmp = self
            .root
            .join(format!(".{}-{}.tmp", key, std::process::id()));
        if let Err(e) = fs::write(&tmp, value).and_then(|_| fs::rename(&tmp, &path)) {
            let _ = fs::remove_file(&tmp);
            return Err(io_error(e, key));
        }
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let path = self.item_path(key)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ShelfError::Io(e)),
        }
    }

    fn len(&self) -> Result<usize> {
        if !self.root.exists() {
            return Ok(0);
        }
        let mut count = 0;
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            let is_value = path.is_file()
                && path.extension().and_then(|e| e.to_str()) == Some(VALUE_EXT)
                && !path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with('.'));
            if is_value {
                count += 1;
            }
        }
        Ok(count)
    }
}
