//! Variable storage.

use crate::error::{HostError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokenbridge_core::{
    Collection, CollectionId, Mode, ModeId, Variable, VariableId, VariableKind, VariableValue,
};
use tokenbridge_export::VariableLookup;

/// Name given to the mode every new collection starts with.
pub const DEFAULT_MODE_NAME: &str = "Mode 1";

/// A store of typed variables grouped into collections.
///
/// Implement this trait to connect the engine to a design tool's variable
/// storage. Identifiers returned by the store must stay stable for the
/// lifetime of the variable.
pub trait VariableStore: VariableLookup {
    /// All collections, in creation order.
    fn collections(&self) -> Vec<&Collection>;

    fn collection(&self, id: &CollectionId) -> Option<&Collection>;

    /// Create a collection holding a single default mode.
    fn create_collection(&mut self, name: &str) -> Result<CollectionId>;

    fn add_mode(&mut self, collection: &CollectionId, name: &str) -> Result<ModeId>;

    fn rename_mode(&mut self, collection: &CollectionId, mode: &ModeId, name: &str) -> Result<()>;

    /// Create an empty variable in a collection.
    fn create_variable(
        &mut self,
        name: &str,
        collection: &CollectionId,
        kind: VariableKind,
    ) -> Result<VariableId>;

    fn set_value_for_mode(
        &mut self,
        variable: &VariableId,
        mode: &ModeId,
        value: VariableValue,
    ) -> Result<()>;

    /// Find a collection by name.
    fn collection_by_name(&self, name: &str) -> Option<&Collection> {
        self.collections().into_iter().find(|c| c.name == name)
    }

    /// Find a variable by name within a collection.
    fn variable_by_name(&self, collection: &CollectionId, name: &str) -> Option<&Variable> {
        self.collection(collection)?
            .variable_ids
            .iter()
            .filter_map(|id| self.variable(id))
            .find(|v| v.name == name)
    }
}

/// In-memory variable store.
///
/// Serializes to JSON so it can stand in for a design tool between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryStore {
    collections: IndexMap<CollectionId, Collection>,
    variables: IndexMap<VariableId, Variable>,
    next_collection: u64,
    next_variable: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store saved with [`MemoryStore::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Load a store, or start empty when the file does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::new())
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    fn collection_mut(&mut self, id: &CollectionId) -> Result<&mut Collection> {
        self.collections
            .get_mut(id)
            .ok_or_else(|| HostError::UnknownCollection(id.clone()))
    }
}

impl VariableLookup for MemoryStore {
    fn variable(&self, id: &VariableId) -> Option<&Variable> {
        self.variables.get(id)
    }
}

impl VariableStore for MemoryStore {
    fn collections(&self) -> Vec<&Collection> {
        self.collections.values().collect()
    }

    fn collection(&self, id: &CollectionId) -> Option<&Collection> {
        self.collections.get(id)
    }

    fn create_collection(&mut self, name: &str) -> Result<CollectionId> {
        let seq = self.next_collection;
        self.next_collection += 1;

        let id = CollectionId(format!("VariableCollectionId:{seq}"));
        let collection = Collection {
            id: id.clone(),
            name: name.to_string(),
            modes: vec![Mode {
                id: ModeId(format!("{seq}:0")),
                name: DEFAULT_MODE_NAME.to_string(),
            }],
            variable_ids: Vec::new(),
        };
        tracing::debug!(collection = %id, name, "collection created");
        self.collections.insert(id.clone(), collection);
        Ok(id)
    }

    fn add_mode(&mut self, collection: &CollectionId, name: &str) -> Result<ModeId> {
        let seq = self.collections.get_index_of(collection);
        let target = self.collection_mut(collection)?;
        let id = ModeId(format!("{}:{}", seq.unwrap_or_default(), target.modes.len()));
        target.modes.push(Mode {
            id: id.clone(),
            name: name.to_string(),
        });
        Ok(id)
    }

    fn rename_mode(&mut self, collection: &CollectionId, mode: &ModeId, name: &str) -> Result<()> {
        let target = self.collection_mut(collection)?;
        let entry = target
            .modes
            .iter_mut()
            .find(|m| &m.id == mode)
            .ok_or_else(|| HostError::UnknownMode {
                collection: collection.clone(),
                mode: mode.clone(),
            })?;
        entry.name = name.to_string();
        Ok(())
    }

    fn create_variable(
        &mut self,
        name: &str,
        collection: &CollectionId,
        kind: VariableKind,
    ) -> Result<VariableId> {
        if self.variable_by_name(collection, name).is_some() {
            return Err(HostError::DuplicateVariable {
                name: name.to_string(),
                collection: collection.clone(),
            });
        }

        let id = VariableId(format!("VariableID:{}", self.next_variable));
        self.collection_mut(collection)?.variable_ids.push(id.clone());
        self.next_variable += 1;
        self.variables.insert(
            id.clone(),
            Variable {
                id: id.clone(),
                name: name.to_string(),
                kind,
                collection_id: collection.clone(),
                values_by_mode: IndexMap::new(),
            },
        );
        Ok(id)
    }

    fn set_value_for_mode(
        &mut self,
        variable: &VariableId,
        mode: &ModeId,
        value: VariableValue,
    ) -> Result<()> {
        if let VariableValue::Alias(target) = &value {
            if !self.variables.contains_key(target) {
                return Err(HostError::UnknownVariable(target.clone()));
            }
        }

        let collection_id = self
            .variables
            .get(variable)
            .map(|v| v.collection_id.clone())
            .ok_or_else(|| HostError::UnknownVariable(variable.clone()))?;
        let known_mode = self
            .collections
            .get(&collection_id)
            .is_some_and(|c| c.modes.iter().any(|m| &m.id == mode));
        if !known_mode {
            return Err(HostError::UnknownMode {
                collection: collection_id,
                mode: mode.clone(),
            });
        }

        if let Some(target) = self.variables.get_mut(variable) {
            target.values_by_mode.insert(mode.clone(), value);
        }
        Ok(())
    }
}
