//! In-memory record store keyed by id.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreError;
use crate::record::{Record, RecordId};
use crate::resolver::{BlockingResolver, ParentResolver};

/// Records keyed by id, resolving parents through `parent_field`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: HashMap<RecordId, Record>,
    parent_field: String,
}

impl MemoryStore {
    pub fn new(parent_field: impl Into<String>) -> Self {
        Self {
            records: HashMap::new(),
            parent_field: parent_field.into(),
        }
    }

    pub fn with_records(
        parent_field: impl Into<String>,
        records: impl IntoIterator<Item = Record>,
    ) -> Self {
        let mut store = Self::new(parent_field);
        for record in records {
            store.insert(record);
        }
        store
    }

    /// Load a JSON export: either an array of objects or a `{"data": [...]}`
    /// envelope as returned by REST item endpoints.
    pub fn from_json(value: Value, id_field: &str, parent_field: &str) -> Result<Self, StoreError> {
        let items = match value {
            Value::Array(items) => items,
            Value::Object(mut envelope) => match envelope.remove("data") {
                Some(Value::Array(items)) => items,
                _ => {
                    return Err(StoreError::InvalidRecord(
                        "expected an array of records or a {\"data\": [...]} envelope".into(),
                    ))
                }
            },
            _ => {
                return Err(StoreError::InvalidRecord(
                    "expected an array of records".into(),
                ))
            }
        };

        let mut store = Self::new(parent_field);
        for item in items {
            store.insert(Record::from_json(item, id_field)?);
        }
        tracing::debug!(records = store.len(), "loaded record store");
        Ok(store)
    }

    /// Read and parse a JSON export from disk.
    pub fn load(path: &Path, id_field: &str, parent_field: &str) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&content)?;
        Self::from_json(value, id_field, parent_field)
    }

    /// Insert or replace a record, returning the previous one with the same id.
    pub fn insert(&mut self, record: Record) -> Option<Record> {
        self.records.insert(record.id.clone(), record)
    }

    /// Fetch a record by id, falling back to the id's other representation
    /// (`3` vs `"3"`).
    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.records.get(id).or_else(|| {
            id.alternate()
                .and_then(|alternate| self.records.get(&alternate))
        })
    }

    /// All records, ordered by id.
    pub fn list(&self) -> Vec<&Record> {
        let mut records: Vec<&Record> = self.records.values().collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn parent_field(&self) -> &str {
        &self.parent_field
    }

    /// The parent of `record`, which need not be stored itself (unsaved edits).
    pub fn parent_of(&self, record: &Record) -> Result<Option<Record>, StoreError> {
        let Some(parent_id) = record.parent_ref(&self.parent_field) else {
            return Ok(None);
        };
        match self.get(&parent_id) {
            Some(parent) => Ok(Some(parent.clone())),
            None => Err(StoreError::MissingParent {
                child: record.id.clone(),
                parent: parent_id,
            }),
        }
    }
}

#[async_trait]
impl ParentResolver<Record> for MemoryStore {
    type Error = StoreError;

    async fn resolve_parent(&self, record: &Record) -> Result<Option<Record>, StoreError> {
        self.parent_of(record)
    }
}

impl BlockingResolver<Record> for MemoryStore {
    type Error = StoreError;

    fn resolve_parent(&mut self, record: &Record) -> Result<Option<Record>, StoreError> {
        self.parent_of(record)
    }
}
