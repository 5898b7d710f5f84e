//! Persistence gateway: stores serialized schemas as opaque JSON strings keyed
//! by schema id.

use super::builder::{serialize_schema, try_parse_schema};
use super::store::SchemaStore;
use super::types::SchemaError;
use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

/// Reads and writes persisted schema JSON.
pub trait SchemaPersistence: Send + Sync {
    fn load(&self, schema_id: &str) -> Result<Option<String>, SchemaError>;
    fn save(&self, schema_id: &str, json: &str) -> Result<(), SchemaError>;
    fn delete(&self, schema_id: &str) -> Result<(), SchemaError>;
    fn list(&self) -> Result<Vec<String>, SchemaError>;
}

/// Volatile gateway used by tests and previews.
#[derive(Debug, Default)]
pub struct InMemoryPersistence {
    schemas: RwLock<HashMap<String, String>>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SchemaPersistence for InMemoryPersistence {
    fn load(&self, schema_id: &str) -> Result<Option<String>, SchemaError> {
        let schemas = self
            .schemas
            .read()
            .map_err(|_| SchemaError::persistence("Failed to acquire schema lock"))?;
        Ok(schemas.get(schema_id).cloned())
    }

    fn save(&self, schema_id: &str, json: &str) -> Result<(), SchemaError> {
        let mut schemas = self
            .schemas
            .write()
            .map_err(|_| SchemaError::persistence("Failed to acquire schema lock"))?;
        schemas.insert(schema_id.to_string(), json.to_string());
        Ok(())
    }

    fn delete(&self, schema_id: &str) -> Result<(), SchemaError> {
        let mut schemas = self
            .schemas
            .write()
            .map_err(|_| SchemaError::persistence("Failed to acquire schema lock"))?;
        schemas.remove(schema_id);
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>, SchemaError> {
        let schemas = self
            .schemas
            .read()
            .map_err(|_| SchemaError::persistence("Failed to acquire schema lock"))?;
        let mut ids: Vec<String> = schemas.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

/// Gateway backed by a sled tree named `schemas`.
#[derive(Clone)]
pub struct SledPersistence {
    tree: sled::Tree,
}

impl SledPersistence {
    /// Opens (or creates) a sled database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let db = sled::open(path)?;
        Self::from_db(&db)
    }

    pub fn from_db(db: &sled::Db) -> Result<Self, SchemaError> {
        let tree = db.open_tree("schemas")?;
        Ok(Self { tree })
    }
}

impl SchemaPersistence for SledPersistence {
    fn load(&self, schema_id: &str) -> Result<Option<String>, SchemaError> {
        match self.tree.get(schema_id.as_bytes())? {
            Some(bytes) => String::from_utf8(bytes.to_vec())
                .map(Some)
                .map_err(|e| {
                    SchemaError::persistence(format!(
                        "Stored schema '{}' is not valid UTF-8: {}",
                        schema_id, e
                    ))
                }),
            None => Ok(None),
        }
    }

    fn save(&self, schema_id: &str, json: &str) -> Result<(), SchemaError> {
        self.tree.insert(schema_id.as_bytes(), json.as_bytes())?;
        // Ensure the data is durably written to disk
        self.tree.flush()?;
        Ok(())
    }

    fn delete(&self, schema_id: &str) -> Result<(), SchemaError> {
        self.tree.remove(schema_id.as_bytes())?;
        self.tree.flush()?;
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>, SchemaError> {
        let mut ids = Vec::new();
        for key in self.tree.iter().keys() {
            let key = key?;
            ids.push(String::from_utf8_lossy(&key).to_string());
        }
        Ok(ids)
    }
}

/// Suffix of the key a corrupt stored schema is copied to before it is overwritten.
pub const CORRUPT_SUFFIX: &str = ".corrupt";

/// A stored schema that failed to parse when the session was opened.
#[derive(Debug)]
pub struct RecoveredSchema {
    pub error: SchemaError,
    pub raw: String,
}

/// An editing session: one [`SchemaStore`] bound to a schema id in a gateway.
pub struct SchemaSession<P: SchemaPersistence> {
    schema_id: String,
    store: SchemaStore,
    persistence: P,
    recovered_from: Option<RecoveredSchema>,
}

impl<P: SchemaPersistence> SchemaSession<P> {
    /// Opens the schema stored under `schema_id`.
    ///
    /// A missing schema starts empty. A stored schema that fails to parse also
    /// starts empty; the failure is kept in [`recovered_from`](Self::recovered_from)
    /// and the raw string is copied to `<schema_id>.corrupt` on the first save.
    pub fn open(persistence: P, schema_id: impl Into<String>) -> Result<Self, SchemaError> {
        let schema_id = schema_id.into();
        let mut recovered_from = None;
        let store = match persistence.load(&schema_id)? {
            Some(raw) => match try_parse_schema(&raw) {
                Ok(schema) => SchemaStore::from_schema(schema),
                Err(error) => {
                    crate::log_persistence_error!(
                        "Stored schema '{}' is corrupt, starting empty: {}",
                        schema_id,
                        error
                    );
                    recovered_from = Some(RecoveredSchema { error, raw });
                    SchemaStore::new()
                }
            },
            None => {
                crate::log_persistence_info!("No stored schema '{}', starting empty", schema_id);
                SchemaStore::new()
            }
        };

        Ok(Self {
            schema_id,
            store,
            persistence,
            recovered_from,
        })
    }

    /// The parse failure this session recovered from, until the corrupt
    /// original has been backed up by [`save`](Self::save).
    pub fn recovered_from(&self) -> Option<&RecoveredSchema> {
        self.recovered_from.as_ref()
    }

    /// Key holding the backup of a corrupt stored schema.
    pub fn corrupt_key(&self) -> String {
        format!("{}{}", self.schema_id, CORRUPT_SUFFIX)
    }

    pub fn schema_id(&self) -> &str {
        &self.schema_id
    }

    pub fn store(&self) -> &SchemaStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SchemaStore {
        &mut self.store
    }

    /// Writes the schema and marks the store clean; the store stays dirty if the write fails.
    ///
    /// A corrupt original is copied to [`corrupt_key`](Self::corrupt_key) before
    /// it is overwritten; if that copy fails nothing is written.
    pub fn save(&mut self) -> Result<(), SchemaError> {
        if let Some(recovered) = &self.recovered_from {
            let backup_key = self.corrupt_key();
            if let Err(e) = self.persistence.save(&backup_key, &recovered.raw) {
                crate::log_persistence_error!(
                    "Failed to back up corrupt schema '{}': {}",
                    self.schema_id,
                    e
                );
                return Err(e);
            }
            crate::log_persistence_info!(
                "Backed up corrupt schema '{}' to '{}'",
                self.schema_id,
                backup_key
            );
            self.recovered_from = None;
        }

        let json = serialize_schema(&self.store.schema());
        if let Err(e) = self.persistence.save(&self.schema_id, &json) {
            crate::log_persistence_error!("Failed to save schema '{}': {}", self.schema_id, e);
            return Err(e);
        }
        self.store.mark_as_saved();
        crate::log_persistence_info!("Saved schema '{}' ({} bytes)", self.schema_id, json.len());
        Ok(())
    }

    /// Deletes the stored schema and discards the in-memory model.
    pub fn delete(self) -> Result<P, SchemaError> {
        self.persistence.delete(&self.schema_id)?;
        crate::log_persistence_info!("Deleted schema '{}'", self.schema_id);
        Ok(self.persistence)
    }
}
