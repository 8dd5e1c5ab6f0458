use crate::collections::CollectionSet;
use crate::resolver::{MethodPreference, ResolveSettings};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const STORE_ENV_VAR: &str = "FEMBED_STORE";

fn default_size_key() -> String {
    "large1024".to_string()
}

/// The single persisted document: collections plus settings, mirroring the
/// flat key-value layout other surfaces read and write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredState {
    #[serde(flatten)]
    pub set: CollectionSet,
    #[serde(default = "default_size_key")]
    pub default_size: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default)]
    pub method: MethodPreference,
}

impl Default for StoredState {
    fn default() -> Self {
        Self {
            set: CollectionSet::default(),
            default_size: default_size_key(),
            api_key: None,
            method: MethodPreference::default(),
        }
    }
}

impl StoredState {
    pub fn settings(&self) -> ResolveSettings {
        ResolveSettings {
            api_key: self.api_key.clone(),
            method: self.method,
        }
    }

    fn normalize(&mut self) {
        self.set.ensure_invariants();
        if self.default_size.trim().is_empty() {
            self.default_size = default_size_key();
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is first-run state, not an error. A present but
    /// unparseable file is an error; it is never silently overwritten.
    pub fn load(&self) -> Result<StoredState, StoreError> {
        if !self.path.exists() {
            return Ok(StoredState::default());
        }
        let contents = fs::read_to_string(&self.path)?;
        let mut state: StoredState = serde_json::from_str(&contents)?;
        state.normalize();
        Ok(state)
    }

    /// Writes the whole document in one call.
    pub fn save(&self, state: &StoredState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let contents = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }

    /// Read-modify-write against the current on-disk snapshot. The store
    /// is shared with other surfaces, so mutations never trust an
    /// in-memory copy held across operations.
    pub fn update<T>(&self, apply: impl FnOnce(&mut StoredState) -> T) -> Result<T, StoreError> {
        let mut state = self.load()?;
        let out = apply(&mut state);
        self.save(&state)?;
        Ok(out)
    }
}

pub fn default_store_path() -> PathBuf {
    if let Ok(path) = std::env::var(STORE_ENV_VAR) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }
    dirs::config_dir()
        .map(|dir| dir.join("fembed").join("store.json"))
        .unwrap_or_else(|| PathBuf::from("fembed-store.json"))
}
