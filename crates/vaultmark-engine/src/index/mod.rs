//! Per-vault reference index.
//!
//! The storage layer builds a [`ReferenceIndex`] and hands it to every
//! conversion call. A snapshot is never mutated while in use: each vault sits
//! behind an `Arc`, and mutating an index that shares a vault with another
//! snapshot clones that vault first (`Arc::make_mut`), so concurrent
//! conversions holding the old snapshot keep reading the old data.

pub mod record;
pub mod resolve;
pub mod trie;

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use relative_path::{RelativePath, RelativePathBuf};

pub use record::{EntityRecord, EntityType, is_image_path};
use trie::ReverseTrie;

/// Lookup key for [`ReferenceIndex::resolve`].
#[derive(Debug, Clone, Copy)]
pub enum Key<'a> {
    Id(&'a str),
    Path(&'a RelativePath),
    Title(&'a str),
    RemoteUri(&'a str),
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    vaults: HashMap<String, Arc<VaultIndex>>,
}

impl ReferenceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vault(&self, vault_id: &str) -> Option<&VaultIndex> {
        self.vaults.get(vault_id).map(Arc::as_ref)
    }

    /// Mutable access to one vault, detaching it from other snapshots.
    pub fn vault_mut(&mut self, vault_id: &str) -> &mut VaultIndex {
        let vault = self.vaults.entry(vault_id.to_string()).or_default();
        Arc::make_mut(vault)
    }

    pub fn insert(&mut self, vault_id: &str, record: EntityRecord) {
        self.vault_mut(vault_id).insert(record);
    }

    pub fn insert_loose_media(&mut self, vault_id: &str, record: EntityRecord) {
        self.vault_mut(vault_id).insert_loose_media(record);
    }

    pub fn remove(&mut self, vault_id: &str, id: &str) -> Option<EntityRecord> {
        self.vaults
            .get_mut(vault_id)
            .and_then(|v| Arc::make_mut(v).remove(id))
    }

    /// Looks up a record of `entity_type` by id, path, title or remote URI.
    pub fn resolve(&self, vault_id: &str, entity_type: EntityType, key: Key<'_>) -> Option<&EntityRecord> {
        let vault = self.vault(vault_id)?;
        let record = match key {
            Key::Id(id) => vault.get(id),
            Key::Path(path) => vault.by_path(path),
            Key::Title(title) => vault.by_title(entity_type, title).next(),
            Key::RemoteUri(uri) => vault.by_remote_uri(uri),
        }?;
        (record.entity_type == entity_type).then_some(record)
    }

    /// Closest-path resolution for an image/media reference written in a
    /// document located in `referencing_dir`.
    pub fn resolve_by_path(
        &self,
        vault_id: &str,
        referencing_dir: &RelativePath,
        reference: &str,
    ) -> Option<&EntityRecord> {
        resolve::by_path(self.vault(vault_id)?, referencing_dir, reference)
    }

    /// Resolves the target part of a wikilink (anchor and alias removed).
    pub fn resolve_wikilink(
        &self,
        vault_id: &str,
        referencing_dir: &RelativePath,
        target: &str,
    ) -> Option<&EntityRecord> {
        resolve::wikilink(self.vault(vault_id)?, referencing_dir, target)
    }

    /// Shortest trailing path that identifies the record `id` unambiguously.
    pub fn shortest_unique_path(&self, vault_id: &str, id: &str) -> Option<RelativePathBuf> {
        let vault = self.vault(vault_id)?;
        let path = vault.get(id)?.filepath.as_deref()?;
        vault.paths.shortest_unique_suffix(path)
    }
}

/// All indexes for a single vault.
#[derive(Debug, Clone, Default)]
pub struct VaultIndex {
    records: HashMap<String, EntityRecord>,
    path_ids: HashMap<RelativePathBuf, String>,
    title_ids: HashMap<(EntityType, String), BTreeSet<String>>,
    uri_ids: HashMap<String, String>,
    paths: ReverseTrie,
    loose: HashMap<String, EntityRecord>,
    loose_paths: ReverseTrie,
}

impl VaultIndex {
    /// Adds or replaces a record.
    pub fn insert(&mut self, record: EntityRecord) {
        self.remove(&record.id);
        if let Some(path) = &record.filepath {
            self.path_ids.insert(path.clone(), record.id.clone());
            self.paths.insert(path, &record.id);
        }
        if let Some(title) = &record.title {
            self.title_ids
                .entry((record.entity_type, title.clone()))
                .or_default()
                .insert(record.id.clone());
        }
        if let Some(uri) = &record.remote_uri {
            self.uri_ids.insert(uri.clone(), record.id.clone());
        }
        self.records.insert(record.id.clone(), record);
    }

    /// Media present on the device but not yet registered as an entity.
    pub fn insert_loose_media(&mut self, record: EntityRecord) {
        if let Some(path) = &record.filepath {
            self.loose_paths.insert(path, &record.id);
        }
        self.loose.insert(record.id.clone(), record);
    }

    pub fn remove(&mut self, id: &str) -> Option<EntityRecord> {
        let record = self.records.remove(id)?;
        if let Some(path) = &record.filepath {
            self.path_ids.remove(path);
            self.paths.remove(path, id);
        }
        if let Some(title) = &record.title
            && let Some(ids) = self.title_ids.get_mut(&(record.entity_type, title.clone()))
        {
            ids.remove(id);
            if ids.is_empty() {
                self.title_ids.remove(&(record.entity_type, title.clone()));
            }
        }
        if let Some(uri) = &record.remote_uri {
            self.uri_ids.remove(uri);
        }
        Some(record)
    }

    pub fn get(&self, id: &str) -> Option<&EntityRecord> {
        self.records.get(id)
    }

    pub fn by_path(&self, path: &RelativePath) -> Option<&EntityRecord> {
        let id = self.path_ids.get(&path.normalize())?;
        self.records.get(id)
    }

    /// Records with this exact title, in id order.
    pub fn by_title<'a>(
        &'a self,
        entity_type: EntityType,
        title: &str,
    ) -> impl Iterator<Item = &'a EntityRecord> + 'a {
        self.title_ids
            .get(&(entity_type, title.to_string()))
            .into_iter()
            .flatten()
            .filter_map(|id| self.records.get(id))
    }

    pub fn by_remote_uri(&self, uri: &str) -> Option<&EntityRecord> {
        self.records.get(self.uri_ids.get(uri)?)
    }

    /// Indexed records whose path ends with `suffix`.
    pub fn by_suffix<'a>(&'a self, suffix: &RelativePath) -> impl Iterator<Item = &'a EntityRecord> + 'a {
        let ids = self.paths.find(suffix);
        ids.into_iter().filter_map(|id| self.records.get(id))
    }

    pub fn loose_by_suffix<'a>(
        &'a self,
        suffix: &RelativePath,
    ) -> impl Iterator<Item = &'a EntityRecord> + 'a {
        let ids = self.loose_paths.find(suffix);
        ids.into_iter().filter_map(|id| self.loose.get(id))
    }

    pub fn records(&self) -> impl Iterator<Item = &EntityRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
