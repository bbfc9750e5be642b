//! Durable file-access grants for files the user dropped on the app.
//!
//! A drop is explicit user consent to read a file, so every candidate gets a
//! grant before it is inspected. Grants are keyed by the file's canonical
//! path and survive restarts. The store is an append-only JSON-lines file:
//! each new grant adds one line, so granting never rewrites earlier grants.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use crate::app_dirs;

/// Records that the user granted access to a file.
///
/// Implementations must be idempotent and safe to call from anywhere in the
/// process.
pub trait PermissionStore {
    fn grant(&self, path: &Path) -> Result<(), PermissionError>;
}

/// Errors raised by the token store.
#[derive(Debug, Error)]
pub enum PermissionError {
    #[error("Cannot grant access to {path}: {source}")]
    Missing {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Permission store location unavailable: {0}")]
    Location(#[from] app_dirs::AppDirError),
    #[error("Failed to read permission store {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid permission store at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to serialize permission grants: {0}")]
    Serialize(serde_json::Error),
    #[error("Failed to write permission store {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// One persisted grant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
    pub path: PathBuf,
    pub token: Uuid,
    /// Unix seconds.
    pub granted_at: i64,
}

/// One line of the store file.
#[derive(Debug, Serialize, Deserialize)]
struct GrantRecord {
    key: String,
    #[serde(flatten)]
    grant: PermissionGrant,
}

/// JSON-lines backed [`PermissionStore`].
#[derive(Debug)]
pub struct TokenStore {
    path: PathBuf,
    grants: Mutex<BTreeMap<String, PermissionGrant>>,
}

impl TokenStore {
    /// Open the store at `path`, starting empty if the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PermissionError> {
        let path = path.into();
        let mut grants = BTreeMap::new();
        if path.exists() {
            let text = std::fs::read_to_string(&path).map_err(|source| PermissionError::Read {
                path: path.clone(),
                source,
            })?;
            for line in text.lines().filter(|line| !line.trim().is_empty()) {
                let record: GrantRecord =
                    serde_json::from_str(line).map_err(|source| PermissionError::Parse {
                        path: path.clone(),
                        source,
                    })?;
                grants.entry(record.key).or_insert(record.grant);
            }
        }
        Ok(Self {
            path,
            grants: Mutex::new(grants),
        })
    }

    /// Open the store in the app root.
    pub fn open_default() -> Result<Self, PermissionError> {
        Self::open(app_dirs::permissions_path()?)
    }

    pub fn location(&self) -> &Path {
        &self.path
    }

    /// Look up the grant for a file, if one was recorded.
    pub fn grant_for(&self, path: &Path) -> Option<PermissionGrant> {
        let key = file_key(&path.canonicalize().ok()?);
        self.lock().get(&key).cloned()
    }

    pub fn is_granted(&self, path: &Path) -> bool {
        self.grant_for(path).is_some()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, PermissionGrant>> {
        self.grants.lock().unwrap_or_else(|err| err.into_inner())
    }

    /// Append one grant as a single line.
    fn append(&self, key: &str, grant: &PermissionGrant) -> Result<(), PermissionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| PermissionError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let mut line = serde_json::to_vec(&GrantRecord {
            key: key.to_string(),
            grant: grant.clone(),
        })
        .map_err(PermissionError::Serialize)?;
        line.push(b'\n');
        let write_err = |source| PermissionError::Write {
            path: self.path.clone(),
            source,
        };
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(write_err)?
            .write_all(&line)
            .map_err(write_err)
    }
}

impl PermissionStore for TokenStore {
    fn grant(&self, path: &Path) -> Result<(), PermissionError> {
        let canonical = path
            .canonicalize()
            .map_err(|source| PermissionError::Missing {
                path: path.to_path_buf(),
                source,
            })?;
        let key = file_key(&canonical);
        let mut grants = self.lock();
        if grants.contains_key(&key) {
            return Ok(());
        }
        let grant = PermissionGrant {
            path: canonical.clone(),
            token: Uuid::new_v4(),
            granted_at: OffsetDateTime::now_utc().unix_timestamp(),
        };
        self.append(&key, &grant)?;
        grants.insert(key, grant);
        debug!("Granted file access to {}", canonical.display());
        Ok(())
    }
}

fn file_key(canonical: &Path) -> String {
    blake3::hash(canonical.as_os_str().as_encoded_bytes())
        .to_hex()
        .to_string()
}
