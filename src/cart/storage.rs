//! Cart persistence
//!
//! A cart is written wholesale as a [`CartSnapshot`] under one key per
//! session. Two backends are provided: an in-memory map (the default when no
//! cart directory is configured) and a directory of JSON files. Blocking
//! backends are wrapped in [`WriteBehind`] so saves never run on a request.

use super::models::CartSnapshot;
use dashmap::DashMap;
use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::sync::mpsc;

/// Namespace every cart snapshot is stored under.
pub const CART_STORAGE_KEY: &str = "cart-storage";

/// Builds the storage key for one session's cart.
pub fn session_key(session_id: &str) -> String {
    format!("{}:{}", CART_STORAGE_KEY, session_id)
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("cart storage I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cart snapshot for key {key} is not valid JSON: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("cart writer has stopped")]
    WriterClosed,
}

/// Durable key-value store for cart snapshots.
pub trait CartStorage: Send + Sync {
    /// Returns the snapshot stored under `key`, or `None` when nothing was saved yet.
    fn load(&self, key: &str) -> Result<Option<CartSnapshot>, StorageError>;

    /// Overwrites whatever is stored under `key`.
    fn save(&self, key: &str, snapshot: &CartSnapshot) -> Result<(), StorageError>;
}

/// Process-local storage. Snapshots survive as long as the process does.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    snapshots: DashMap<String, CartSnapshot>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<CartSnapshot>, StorageError> {
        Ok(self.snapshots.get(key).map(|s| s.clone()))
    }

    fn save(&self, key: &str, snapshot: &CartSnapshot) -> Result<(), StorageError> {
        self.snapshots.insert(key.to_string(), snapshot.clone());
        Ok(())
    }
}

/// One JSON file per key inside `dir`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Creates the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", file_name))
    }
}

impl CartStorage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<CartSnapshot>, StorageError> {
        let path = self.path_for(key);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StorageError::Io { path, source }),
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Corrupt {
                key: key.to_string(),
                source,
            })
    }

    fn save(&self, key: &str, snapshot: &CartSnapshot) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let body = serde_json::to_vec(snapshot).map_err(|source| StorageError::Corrupt {
            key: key.to_string(),
            source,
        })?;

        // Write beside the target, then rename over it.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, body).map_err(|source| StorageError::Io {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &path).map_err(|source| StorageError::Io { path, source })
    }
}

/// Queues saves for a background writer.
///
/// `save` records the snapshot and returns at once; a tokio task hands queued
/// snapshots to the inner storage on the blocking pool, one at a time, newest
/// snapshot per key. `load` sees queued snapshots before they are written.
pub struct WriteBehind {
    inner: Arc<dyn CartStorage>,
    pending: Arc<DashMap<String, CartSnapshot>>,
    queue: mpsc::UnboundedSender<String>,
}

impl WriteBehind {
    /// Starts the writer task. Must be called from within a tokio runtime.
    pub fn spawn(inner: Arc<dyn CartStorage>) -> Self {
        let (queue, mut keys) = mpsc::unbounded_channel::<String>();
        let pending: Arc<DashMap<String, CartSnapshot>> = Arc::new(DashMap::new());

        let storage = Arc::clone(&inner);
        let queued = Arc::clone(&pending);
        tokio::spawn(async move {
            while let Some(key) = keys.recv().await {
                // Already written by an earlier wake-up for the same key.
                let Some(snapshot) = queued.get(&key).map(|s| s.clone()) else {
                    continue;
                };

                let storage = Arc::clone(&storage);
                let write = tokio::task::spawn_blocking(move || {
                    let result = storage.save(&key, &snapshot);
                    (key, snapshot, result)
                });
                match write.await {
                    Ok((key, snapshot, result)) => {
                        if let Err(e) = result {
                            tracing::warn!(key = %key, error = %e, "failed to persist cart");
                        }
                        queued.remove_if(&key, |_, latest| *latest == snapshot);
                    }
                    Err(e) => tracing::error!(error = %e, "cart writer panicked"),
                }
            }
        });

        Self {
            inner,
            pending,
            queue,
        }
    }

    /// Number of snapshots not yet handed to the inner storage.
    pub fn queued(&self) -> usize {
        self.pending.len()
    }
}

impl CartStorage for WriteBehind {
    fn load(&self, key: &str) -> Result<Option<CartSnapshot>, StorageError> {
        if let Some(snapshot) = self.pending.get(key) {
            return Ok(Some(snapshot.clone()));
        }
        self.inner.load(key)
    }

    fn save(&self, key: &str, snapshot: &CartSnapshot) -> Result<(), StorageError> {
        self.pending.insert(key.to_string(), snapshot.clone());
        self.queue
            .send(key.to_string())
            .map_err(|_| StorageError::WriterClosed)
    }
}
