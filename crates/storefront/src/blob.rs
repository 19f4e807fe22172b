//! Local key-value blob store.
//!
//! The local fallback tier: whole-document JSON strings stored under a
//! handful of well-known keys. [`FileBlobStore`] keeps one file per key in
//! the data directory; [`MemoryBlobStore`] is used by tests and ephemeral
//! runs.
//!
//! Stores are synchronous. Async callers go through [`load_json_async`] and
//! [`save_json_async`], which run the store on tokio's blocking pool.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Well-known blob keys.
pub mod keys {
    /// Serialized cart lines.
    pub const CART: &str = "zoco-cart";
    /// Serialized site content.
    pub const SITE_CONTENT: &str = "zoco-site-content";
}

/// Errors from the local blob store.
#[derive(Debug, Error)]
pub enum BlobError {
    #[error("invalid blob key: {0:?}")]
    InvalidKey(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed blob {key}: {source}")]
    Parse {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("blob task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// A string key-value store.
pub trait BlobStore: Send + Sync + fmt::Debug {
    /// Read a value; `Ok(None)` if the key was never written.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, BlobError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), BlobError>;

    /// Delete a value; deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the store cannot be written.
    fn remove(&self, key: &str) -> Result<(), BlobError>;
}

/// Read and decode a JSON blob.
///
/// # Errors
///
/// Returns [`BlobError::Parse`] if the stored text is not valid JSON for `T`.
pub fn load_json<T: DeserializeOwned>(
    store: &dyn BlobStore,
    key: &str,
) -> Result<Option<T>, BlobError> {
    decode(key, store.get(key)?)
}

/// Encode and write a JSON blob.
///
/// # Errors
///
/// Returns an error if encoding or writing fails.
pub fn save_json<T: Serialize + ?Sized>(
    store: &dyn BlobStore,
    key: &str,
    value: &T,
) -> Result<(), BlobError> {
    let raw = encode(key, value)?;
    store.set(key, &raw)
}

/// [`load_json`] without blocking the async runtime.
///
/// # Errors
///
/// Same as [`load_json`], plus [`BlobError::Task`] if the blocking task
/// panicked.
pub async fn load_json_async<T: DeserializeOwned>(
    store: Arc<dyn BlobStore>,
    key: &str,
) -> Result<Option<T>, BlobError> {
    let owned_key = key.to_string();
    let raw = tokio::task::spawn_blocking(move || store.get(&owned_key)).await??;
    decode(key, raw)
}

/// [`save_json`] without blocking the async runtime.
///
/// The value is encoded on the caller's task; only the write moves to the
/// blocking pool. The future completes once the write has finished, so
/// writes awaited in sequence land in order.
///
/// # Errors
///
/// Same as [`save_json`], plus [`BlobError::Task`] if the blocking task
/// panicked.
pub async fn save_json_async<T: Serialize + ?Sized>(
    store: Arc<dyn BlobStore>,
    key: &str,
    value: &T,
) -> Result<(), BlobError> {
    let raw = encode(key, value)?;
    let owned_key = key.to_string();
    tokio::task::spawn_blocking(move || store.set(&owned_key, &raw)).await?
}

fn decode<T: DeserializeOwned>(key: &str, raw: Option<String>) -> Result<Option<T>, BlobError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| BlobError::Parse {
            key: key.to_string(),
            source,
        })
}

fn encode<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<String, BlobError> {
    serde_json::to_string(value).map_err(|source| BlobError::Parse {
        key: key.to_string(),
        source,
    })
}

/// Keys become file names, so only a conservative alphabet is allowed.
fn validate_key(key: &str) -> Result<(), BlobError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(BlobError::InvalidKey(key.to_string()))
    }
}

// =============================================================================
// FileBlobStore
// =============================================================================

/// One `<key>.json` file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    /// Open (creating if needed) a store rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, BlobError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Root directory of the store.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, BlobError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, BlobError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BlobError> {
        let path = self.path_for(key)?;
        // Write-then-rename so a crash never leaves a half-written blob.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), BlobError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// MemoryBlobStore
// =============================================================================

/// In-process store; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBlobStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, BlobError> {
        validate_key(key)?;
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BlobError> {
        validate_key(key)?;
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), BlobError> {
        validate_key(key)?;
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}
