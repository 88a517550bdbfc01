use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::error::{StorageError, StorageResult};
use crate::models::{Entity, Kind, KindRegistry};

pub const DEFAULT_FILE_PATH: &str = "file.json";

/// In-memory entity map mirrored to a single JSON document.
pub struct FileStorage {
    path: PathBuf,
    objects: BTreeMap<String, Entity>,
    registry: KindRegistry,
}

impl FileStorage {
    /// Empty storage backed by `path`. Nothing is read until `reload`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStorage::with_registry(path, KindRegistry::builtin())
    }

    pub fn with_registry(path: impl Into<PathBuf>, registry: KindRegistry) -> Self {
        FileStorage {
            path: path.into(),
            objects: BTreeMap::new(),
            registry,
        }
    }

    /// Storage backed by `path`, loaded from disk if the file exists.
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let mut storage = FileStorage::new(path);
        storage.reload()?;
        Ok(storage)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn registry(&self) -> &KindRegistry {
        &self.registry
    }

    pub fn all(&self) -> &BTreeMap<String, Entity> {
        &self.objects
    }

    pub fn all_mut(&mut self) -> &mut BTreeMap<String, Entity> {
        &mut self.objects
    }

    /// Insert or overwrite the entry at the entity's `Kind.id` key.
    pub fn register(&mut self, entity: Entity) {
        self.objects.insert(entity.key(), entity);
    }

    pub fn get(&self, key: &str) -> Option<&Entity> {
        self.objects.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Entity> {
        self.objects.get_mut(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Entity> {
        self.objects.remove(key)
    }

    pub fn count(&self, kind: Kind) -> usize {
        self.objects
            .keys()
            .filter(|key| key_kind(key) == Some(kind.name()))
            .count()
    }

    pub fn of_kind(&self, kind: Kind) -> impl Iterator<Item = &Entity> + '_ {
        self.objects
            .iter()
            .filter(move |(key, _)| key_kind(key) == Some(kind.name()))
            .map(|(_, entity)| entity)
    }

    /// Write every entity to the backing file, replacing it whole.
    pub fn persist(&self) -> StorageResult<()> {
        let document: Map<String, Value> = self
            .objects
            .iter()
            .map(|(key, entity)| (key.clone(), Value::Object(entity.serialize())))
            .collect();
        let content = serde_json::to_string(&document)?;

        // temp file + rename so a crash mid-write never truncates the store
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| self.write_error(e))?;
        tmp.write_all(content.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| self.write_error(e))?;
        tmp.persist(&self.path).map_err(|e| self.write_error(e.error))?;

        debug!(path = %self.path.display(), objects = self.objects.len(), "persisted store");
        Ok(())
    }

    /// Load the backing file into the map. A missing file leaves the map as is.
    pub fn reload(&mut self) -> StorageResult<()> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no storage file, starting empty");
                return Ok(());
            }
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.display().to_string(),
                    source,
                })
            }
        };

        let document: BTreeMap<String, Map<String, Value>> = serde_json::from_str(&content)?;
        let mut loaded = Vec::with_capacity(document.len());

        for (key, mut record) in document {
            let (kind_name, id) = match key.split_once('.') {
                Some((kind_name, id)) if !kind_name.is_empty() && !id.is_empty() => (kind_name, id),
                _ => return Err(StorageError::MalformedKey(key.clone())),
            };
            if !self.registry.contains(kind_name) {
                return Err(StorageError::UnknownKind {
                    kind: kind_name.to_string(),
                    key: key.clone(),
                });
            }

            record
                .entry("id")
                .or_insert_with(|| Value::String(id.to_string()));

            let entity = match self.registry.construct(kind_name, &record) {
                Ok(entity) => entity,
                Err(source) => return Err(StorageError::Record { key: key.clone(), source }),
            };
            if entity.key() != key {
                warn!(key = %key, id = entity.id(), "record id does not match its key");
                return Err(StorageError::KeyMismatch {
                    id: entity.id().to_string(),
                    key,
                });
            }
            loaded.push(entity);
        }

        debug!(path = %self.path.display(), objects = loaded.len(), "reloaded store");
        for entity in loaded {
            self.register(entity);
        }
        Ok(())
    }

    fn write_error(&self, source: io::Error) -> StorageError {
        StorageError::Write {
            path: self.path.display().to_string(),
            source,
        }
    }
}

fn key_kind(key: &str) -> Option<&str> {
    key.split_once('.').map(|(kind, _)| kind)
}
