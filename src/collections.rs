use crate::identity::PhotoIdentity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// The designated collection that always exists; it can be neither
/// renamed nor deleted.
pub const DEFAULT_COLLECTION: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionEntry {
    pub photo_id: String,
    pub username: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_id: Option<String>,
    #[serde(default)]
    pub added_at: String,
}

impl CollectionEntry {
    pub fn from_identity(identity: &PhotoIdentity) -> Self {
        Self {
            photo_id: identity.photo_id.clone(),
            username: identity.username.clone(),
            title: identity.display_title(),
            album_id: identity.album_id.clone(),
            added_at: now_rfc3339(),
        }
    }

    pub fn identity(&self) -> PhotoIdentity {
        let mut identity = PhotoIdentity::new(&self.photo_id, &self.username);
        identity.album_id = self.album_id.clone();
        identity.title = self.title.clone();
        identity
    }
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CollectionError {
    #[error("collection \"{0}\" does not exist")]
    NoSuchCollection(String),
    #[error("index {index} out of range for \"{name}\" ({len} entries)")]
    IndexOutOfRange {
        name: String,
        index: usize,
        len: usize,
    },
    #[error("collection \"{0}\" already exists")]
    AlreadyExists(String),
    #[error("the default collection cannot be renamed or deleted")]
    DefaultProtected,
}

/// Named ordered collections plus the active-collection pointer. The map
/// is a BTreeMap so "first remaining name" after a delete is the same on
/// every run and platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSet {
    #[serde(default)]
    pub collections: BTreeMap<String, Vec<CollectionEntry>>,
    #[serde(default)]
    pub active_collection: String,
}

impl Default for CollectionSet {
    fn default() -> Self {
        let mut collections = BTreeMap::new();
        collections.insert(DEFAULT_COLLECTION.to_string(), Vec::new());
        Self {
            collections,
            active_collection: DEFAULT_COLLECTION.to_string(),
        }
    }
}

impl CollectionSet {
    /// Repairs invariants after loading external data: the default
    /// collection exists and the active pointer names a real collection.
    pub fn ensure_invariants(&mut self) {
        self.collections
            .entry(DEFAULT_COLLECTION.to_string())
            .or_default();
        if !self.collections.contains_key(&self.active_collection) {
            self.active_collection = DEFAULT_COLLECTION.to_string();
        }
    }

    pub fn entries(&self, name: &str) -> Option<&[CollectionEntry]> {
        self.collections.get(name).map(|entries| entries.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(|name| name.as_str())
    }

    /// Appends to the named collection unless the photo is already there.
    /// Creates the collection on first use. Returns whether an insert
    /// happened; a duplicate is a no-op, not an error.
    pub fn add_entry(&mut self, name: &str, identity: &PhotoIdentity) -> bool {
        let entries = self.collections.entry(name.to_string()).or_default();
        if entries
            .iter()
            .any(|entry| entry.photo_id == identity.photo_id)
        {
            return false;
        }
        entries.push(CollectionEntry::from_identity(identity));
        true
    }

    /// Appends to whichever collection is active. A distinct operation
    /// from [`add_entry`], not an overload of it.
    pub fn add_to_active(&mut self, identity: &PhotoIdentity) -> bool {
        let active = self.active_collection.clone();
        self.add_entry(&active, identity)
    }

    pub fn remove_at(&mut self, name: &str, index: usize) -> Result<CollectionEntry, CollectionError> {
        let entries = self
            .collections
            .get_mut(name)
            .ok_or_else(|| CollectionError::NoSuchCollection(name.to_string()))?;
        if index >= entries.len() {
            return Err(CollectionError::IndexOutOfRange {
                name: name.to_string(),
                index,
                len: entries.len(),
            });
        }
        Ok(entries.remove(index))
    }

    /// Remove-then-reinsert, preserving every other relative order. Both
    /// indices are validated before anything moves; nothing is clamped.
    pub fn move_entry(
        &mut self,
        name: &str,
        from: usize,
        to: usize,
    ) -> Result<(), CollectionError> {
        let entries = self
            .collections
            .get_mut(name)
            .ok_or_else(|| CollectionError::NoSuchCollection(name.to_string()))?;
        let len = entries.len();
        if from >= len || to >= len {
            let index = if from >= len { from } else { to };
            return Err(CollectionError::IndexOutOfRange {
                name: name.to_string(),
                index,
                len,
            });
        }
        if from == to {
            return Ok(());
        }
        let entry = entries.remove(from);
        entries.insert(to, entry);
        Ok(())
    }

    pub fn create(&mut self, name: &str) -> Result<(), CollectionError> {
        if self.collections.contains_key(name) {
            return Err(CollectionError::AlreadyExists(name.to_string()));
        }
        self.collections.insert(name.to_string(), Vec::new());
        self.active_collection = name.to_string();
        Ok(())
    }

    pub fn rename(&mut self, old: &str, new: &str) -> Result<(), CollectionError> {
        if old == DEFAULT_COLLECTION {
            return Err(CollectionError::DefaultProtected);
        }
        if new == old {
            return Ok(());
        }
        if self.collections.contains_key(new) {
            return Err(CollectionError::AlreadyExists(new.to_string()));
        }
        let entries = self
            .collections
            .remove(old)
            .ok_or_else(|| CollectionError::NoSuchCollection(old.to_string()))?;
        self.collections.insert(new.to_string(), entries);
        if self.active_collection == old {
            self.active_collection = new.to_string();
        }
        Ok(())
    }

    /// Deletes a collection. When the active one goes away the first
    /// remaining name (stored order) takes over; an empty map gets the
    /// default collection recreated.
    pub fn delete(&mut self, name: &str) -> Result<(), CollectionError> {
        if name == DEFAULT_COLLECTION {
            return Err(CollectionError::DefaultProtected);
        }
        if self.collections.remove(name).is_none() {
            return Err(CollectionError::NoSuchCollection(name.to_string()));
        }
        if self.active_collection == name {
            self.active_collection = match self.collections.keys().next() {
                Some(first) => first.clone(),
                None => {
                    self.collections
                        .insert(DEFAULT_COLLECTION.to_string(), Vec::new());
                    DEFAULT_COLLECTION.to_string()
                }
            };
        }
        Ok(())
    }

    /// Empties the list in place; the collection itself persists.
    pub fn clear(&mut self, name: &str) -> Result<(), CollectionError> {
        let entries = self
            .collections
            .get_mut(name)
            .ok_or_else(|| CollectionError::NoSuchCollection(name.to_string()))?;
        entries.clear();
        Ok(())
    }
}
