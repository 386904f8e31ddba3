//! Where records come from: a JSON export held in memory, or a Postgres table.

use async_trait::async_trait;
use permalink::{MemoryStore, ParentResolver, PathOptions, Record, RecordId, StoreError};
use thiserror::Error;

use crate::config::Profile;
use crate::db::PgStore;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("database error: {0}")]
    Postgres(#[from] tokio_postgres::Error),
}

pub enum Backend {
    Memory(MemoryStore),
    Postgres(PgStore),
}

impl Backend {
    /// Open the backend a profile points at. A records file takes priority
    /// over a connection string.
    pub async fn open(profile: &Profile, options: &PathOptions) -> Result<Self, String> {
        if let Some(path) = &profile.records {
            let store = MemoryStore::load(path, profile.id_field(), &options.parent_field)
                .map_err(|e| format!("failed to load {}: {e}", path.display()))?;
            tracing::info!(records = store.len(), path = %path.display(), "loaded records");
            return Ok(Backend::Memory(store));
        }

        let connection = profile
            .connection
            .as_deref()
            .ok_or("No record source. Use --db or --records, or set one in .permalink/config.toml")?;
        let collection = profile
            .collection
            .as_deref()
            .ok_or("No collection. Use --collection or set one in .permalink/config.toml")?;
        let store = PgStore::connect(
            connection,
            collection,
            profile.id_field(),
            &options.parent_field,
        )
        .await
        .map_err(|e| format!("Connection failed: {e}"))?;
        Ok(Backend::Postgres(store))
    }

    pub async fn fetch(&self, id: &RecordId) -> Result<Option<Record>, BackendError> {
        match self {
            Backend::Memory(store) => Ok(store.get(id).cloned()),
            Backend::Postgres(store) => store.fetch(id).await,
        }
    }

    pub async fn list(&self) -> Result<Vec<Record>, BackendError> {
        match self {
            Backend::Memory(store) => Ok(store.list().into_iter().cloned().collect()),
            Backend::Postgres(store) => store.list().await,
        }
    }
}

#[async_trait]
impl ParentResolver<Record> for Backend {
    type Error = BackendError;

    async fn resolve_parent(&self, record: &Record) -> Result<Option<Record>, BackendError> {
        match self {
            Backend::Memory(store) => Ok(store.parent_of(record)?),
            Backend::Postgres(store) => store.parent_of(record).await,
        }
    }
}

/// Parse an id typed on the command line or in a URL: integers become
/// integer ids, anything else stays text.
pub fn parse_id(raw: &str) -> RecordId {
    raw.parse::<i64>()
        .map(RecordId::Int)
        .unwrap_or_else(|_| RecordId::from(raw))
}
