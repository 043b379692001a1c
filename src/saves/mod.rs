//! Keeping the current session around between runs.
//!
//! There are two layers here. [`Storage`] is a dumb key-value byte store, with a couple of backends: [`fs`] for
//! real saves and [`memory`] for tests and throwaway games. [`Gateway`] sits on top and knows how to turn a
//! [`Session`] into bytes and back, under a single fixed key.
//!
//! Saving is best-effort. The in-memory session is always the source of truth, so [`Gateway::save`],
//! [`Gateway::clear`], and [`Gateway::load`] log failures and carry on instead of returning them. The `try_*`
//! variants are there when you do want to know.
//!
//! The encoding itself is `serde` + `bincode`, behind some magic bytes and a format version so stale or foreign
//! data is never mistaken for a session.

pub mod fs;
pub mod memory;

use std::io;

use enum_dispatch::enum_dispatch;
use tracing::{debug, warn};

use crate::{
    constants::storage::{FORMAT_VERSION, MAGIC, SESSION_KEY},
    session::Session,
};

pub use self::{fs::Directory, memory::Memory};

/// Everything that can go wrong saving or loading.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
    #[error("not a saved session (missing magic bytes)")]
    NotASave,
    #[error("save format version {0} isn't supported")]
    Version(u8),
    #[error("saved session is corrupt: {0}")]
    Codec(#[from] bincode::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A single-level key-value store of raw bytes. Last write wins.
#[enum_dispatch]
pub trait Storage {
    /// The bytes stored under `key`, or `None` if nothing is.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing anything already there.
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Remove whatever is under `key`. Removing something that isn't there is fine.
    fn delete(&self, key: &str) -> Result<()>;
}

/// Any of the built-in storage backends, picked at runtime.
#[enum_dispatch(Storage)]
#[derive(Debug)]
pub enum Backend {
    Directory,
    Memory,
}

/// Turn a session into save bytes.
pub fn encode(session: &Session) -> Result<Vec<u8>> {
    let body_len = bincode::serialized_size(session)? as usize;
    let mut data = Vec::with_capacity(MAGIC.len() + 1 + body_len);
    data.extend_from_slice(MAGIC);
    data.push(FORMAT_VERSION);
    bincode::serialize_into(&mut data, session)?;
    Ok(data)
}

/// Turn save bytes back into a session.
pub fn decode(bytes: &[u8]) -> Result<Session> {
    let rest = bytes.strip_prefix(MAGIC.as_slice()).ok_or(Error::NotASave)?;
    let (&version, body) = rest.split_first().ok_or(Error::NotASave)?;
    if version != FORMAT_VERSION {
        return Err(Error::Version(version));
    }
    Ok(bincode::deserialize(body)?)
}

/// Mirrors the one current session into a [`Storage`].
#[derive(Debug)]
pub struct Gateway<S: Storage> {
    storage: S,
    key: String,
}

impl<S: Storage> Gateway<S> {
    /// Save under the standard key.
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, SESSION_KEY)
    }

    /// Save under a different key, e.g. to keep test sessions apart.
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the saved session, reporting any problems.
    pub fn try_load(&self) -> Result<Option<Session>> {
        match self.storage.get(&self.key)? {
            Some(bytes) => decode(&bytes).map(Some),
            None => Ok(None),
        }
    }

    /// Load the saved session. Anything unreadable is logged and treated as no session at all.
    pub fn load(&self) -> Option<Session> {
        match self.try_load() {
            Ok(Some(session)) => {
                debug!(key = %self.key, "loaded saved session");
                Some(session)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(key = %self.key, error = %e, "couldn't load saved session; starting fresh");
                None
            }
        }
    }

    pub fn try_save(&self, session: &Session) -> Result<()> {
        self.storage.set(&self.key, &encode(session)?)
    }

    /// Save the session, logging (and otherwise ignoring) failure.
    pub fn save(&self, session: &Session) {
        if let Err(e) = self.try_save(session) {
            warn!(key = %self.key, error = %e, "couldn't save session");
        }
    }

    pub fn try_clear(&self) -> Result<()> {
        self.storage.delete(&self.key)
    }

    /// Forget the saved session, logging (and otherwise ignoring) failure.
    pub fn clear(&self) {
        if let Err(e) = self.try_clear() {
            warn!(key = %self.key, error = %e, "couldn't clear saved session");
        }
    }

    /// Make storage match `session`: save it if there is one, clear it if not.
    pub fn mirror(&self, session: Option<&Session>) {
        match session {
            Some(s) => self.save(s),
            None => self.clear(),
        }
    }
}
