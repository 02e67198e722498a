//! Namespaced key-value persistence.
//!
//! Every logical field is stored under its own key so that a write to one field can never
//! clobber another. Values are encoded as JSON text. Reads fail soft: anything that cannot be
//! read or decoded is reported through `tracing` and treated as absent.

use std::{fmt::Debug, io, sync::Arc};

use serde::{Serialize, de::DeserializeOwned};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use thiserror::Error;
use tracing::{trace, warn};

use crate::config::CoreConfig;

mod db;
mod memory;

pub use db::DbBackend;
pub use memory::MemoryBackend;

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Internal database error {0}")]
    Internal(#[from] agdb::DbError),
    #[error("Failed to open the store: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to encode the value for `{key}`: {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },
    #[error("Failed to decode the value stored under `{key}`: {source}")]
    Decode {
        key: String,
        source: serde_json::Error,
    },
    #[error("The entry `{0}` does not hold text")]
    NotText(String),
    #[error("The store rejected the write to `{0}`")]
    Rejected(String),
}

/// Every durably stored field. The string form is the key suffix used in the store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "camelCase")]
pub enum Field {
    IsFollowing,
    Likes,
    IsLiked,
    ProfileImage,
    Name,
    Title,
    Company,
    Location,
    Bio,
}

/// Raw access to a persistent store. Keys passed in are already namespaced.
pub trait Backend: Debug + Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>>;

    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Delete an entry. Deleting a missing entry succeeds.
    fn delete(&self, key: &str) -> Result<()>;
}

/// Typed, namespaced facade over a [`Backend`].
#[derive(Debug, Clone)]
pub struct StorageAdapter {
    namespace: String,
    backend: Arc<dyn Backend>,
}

impl StorageAdapter {
    pub fn new(namespace: impl Into<String>, backend: impl Backend + 'static) -> Self {
        Self {
            namespace: namespace.into(),
            backend: Arc::new(backend),
        }
    }

    /// Open the on-disk store in the state directory, namespaced as configured.
    pub fn open(cfg: &CoreConfig) -> Result<Self> {
        Ok(Self::new(cfg.namespace.clone(), DbBackend::open()?))
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The full key a field is stored under.
    pub fn key(&self, field: Field) -> String {
        format!("{}_{}", self.namespace, field)
    }

    /// Read and decode a field. Read and decode failures are logged and yield `None`.
    pub fn get<T>(&self, field: Field) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let key = self.key(field);

        let raw = match self.backend.read(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!("Error reading `{key}`: {err}");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(source) => {
                warn!("{}", StorageError::Decode { key, source });
                None
            }
        }
    }

    /// Encode and write a field. Failures are logged and returned; nothing is rolled back.
    pub fn set<T>(&self, field: Field, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let key = self.key(field);

        let result = serde_json::to_string(value)
            .map_err(|source| StorageError::Encode {
                key: key.clone(),
                source,
            })
            .and_then(|raw| self.backend.write(&key, &raw));

        match &result {
            Ok(()) => trace!("Stored `{key}`"),
            Err(err) => warn!("Error writing `{key}`: {err}"),
        }

        result
    }

    /// Remove a field's entry. A missing entry is not an error.
    pub fn remove(&self, field: Field) -> Result<()> {
        let key = self.key(field);

        let result = self.backend.delete(&key);
        if let Err(err) = &result {
            warn!("Error removing `{key}`: {err}");
        }

        result
    }
}
