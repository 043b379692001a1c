//! Saving and loading to files, specifically.

use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use crate::constants::storage::EXT;

use super::{Error, Result, Storage};

/// Each key is one file, `<key>.aha`, in a directory.
///
/// Writes go to a temporary file next to the real one, which is then renamed over it, so a crash mid-save leaves
/// either the old save or the new one, never half of each.
#[derive(Clone, Debug)]
pub struct Directory(PathBuf);

impl Directory {
    /// Where saves go by default on this platform, if it has a notion of a per-user data directory.
    pub fn default_location() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("aha"))
    }

    /// Read saves from a specific location. The directory doesn't need to exist until something is saved.
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self(path.as_ref().into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// The file a key lives in. Keys are restricted to ASCII letters, digits, `-`, and `_` so they can't escape the
    /// directory.
    fn file(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty() && key.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        if !valid {
            return Err(Error::InvalidKey(key.to_owned()));
        }
        Ok(self.0.join(format!("{}.{}", key, EXT)))
    }
}

impl Storage for Directory {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match fs::read(self.file(key)?) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.file(key)?;
        fs::create_dir_all(&self.0)?;
        let tmp = path.with_extension(format!("{}.tmp", EXT));
        let mut file = File::create(&tmp)?;
        file.write_all(value)?;
        file.sync_all()?;
        drop(file);
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.file(key)?) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}
