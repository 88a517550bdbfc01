use serde_json::{Map, Value};
use std::collections::HashMap;

use super::entity::Entity;
use super::error::ModelError;
use super::kind::Kind;

/// Builds an entity of a kind from a serialized record.
pub type Constructor = fn(Kind, &Map<String, Value>) -> Result<Entity, ModelError>;

struct Registration {
    kind: Kind,
    construct: Constructor,
}

/// Maps kind names to their constructors.
pub struct KindRegistry {
    entries: HashMap<String, Registration>,
}

impl KindRegistry {
    pub fn new() -> Self {
        KindRegistry {
            entries: HashMap::new(),
        }
    }

    /// Registry with every built-in kind.
    pub fn builtin() -> Self {
        let mut registry = KindRegistry::new();
        for kind in Kind::ALL {
            registry.register(kind, Entity::from_record);
        }
        registry
    }

    pub fn register(&mut self, kind: Kind, construct: Constructor) {
        self.entries
            .insert(kind.name().to_string(), Registration { kind, construct });
    }

    pub fn lookup(&self, name: &str) -> Result<Kind, ModelError> {
        self.entries
            .get(name)
            .map(|entry| entry.kind)
            .ok_or_else(|| ModelError::UnknownKind(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn construct(&self, name: &str, record: &Map<String, Value>) -> Result<Entity, ModelError> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| ModelError::UnknownKind(name.to_string()))?;
        (entry.construct)(entry.kind, record)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for KindRegistry {
    fn default() -> Self {
        KindRegistry::builtin()
    }
}
