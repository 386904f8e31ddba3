//! Postgres-backed record store using tokio-postgres.

use permalink::{Record, RecordId, StoreError};
use tokio_postgres::{Client, NoTls};

use crate::backend::BackendError;

/// Upper bound on rows returned by [`PgStore::list`].
const LIST_LIMIT: i64 = 10_000;

/// One collection (table) of records, read as JSON rows.
pub struct PgStore {
    client: Client,
    table: String,
    id_field: String,
    parent_field: String,
}

impl PgStore {
    pub async fn connect(
        database_url: &str,
        table: &str,
        id_field: &str,
        parent_field: &str,
    ) -> Result<Self, tokio_postgres::Error> {
        let (client, connection) = tokio_postgres::connect(database_url, NoTls).await?;

        // Spawn the connection handler
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("database connection error: {}", e);
            }
        });

        tracing::info!(table, "connected to record store");
        Ok(Self {
            client,
            table: table.to_string(),
            id_field: id_field.to_string(),
            parent_field: parent_field.to_string(),
        })
    }

    /// Fetch one record by id. Ids are compared as text so integer and
    /// uuid keys both work.
    pub async fn fetch(&self, id: &RecordId) -> Result<Option<Record>, BackendError> {
        let sql = format!(
            "SELECT row_to_json(t)::text FROM {} t WHERE t.{}::text = $1",
            quote_ident(&self.table),
            quote_ident(&self.id_field),
        );
        let row = self.client.query_opt(&sql, &[&id.to_string()]).await?;
        match row {
            Some(row) => Ok(Some(decode_row(row.try_get(0)?, &self.id_field)?)),
            None => Ok(None),
        }
    }

    pub async fn list(&self) -> Result<Vec<Record>, BackendError> {
        let sql = format!(
            "SELECT row_to_json(t)::text FROM {} t ORDER BY t.{} LIMIT {LIST_LIMIT}",
            quote_ident(&self.table),
            quote_ident(&self.id_field),
        );
        let rows = self.client.query(&sql, &[]).await?;
        rows.iter()
            .map(|row| -> Result<Record, BackendError> {
                Ok(decode_row(row.try_get(0)?, &self.id_field)?)
            })
            .collect()
    }

    pub async fn parent_of(&self, record: &Record) -> Result<Option<Record>, BackendError> {
        let Some(parent_id) = record.parent_ref(&self.parent_field) else {
            return Ok(None);
        };
        tracing::debug!(child = %record.id, parent = %parent_id, "fetching parent");
        let found = self.fetch(&parent_id).await?;
        Ok(Some(require_parent(record, parent_id, found)?))
    }
}

/// Decode one `row_to_json` row into a record keyed by `id_field`.
fn decode_row(text: &str, id_field: &str) -> Result<Record, StoreError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    Record::from_json(value, id_field)
}

/// A referenced parent must exist; a dangling reference is an error, not a root.
fn require_parent(
    child: &Record,
    parent_id: RecordId,
    found: Option<Record>,
) -> Result<Record, StoreError> {
    found.ok_or_else(|| StoreError::MissingParent {
        child: child.id.clone(),
        parent: parent_id,
    })
}

/// Quote a possibly schema-qualified identifier (`public.pages` →
/// `"public"."pages"`).
pub fn quote_ident(name: &str) -> String {
    name.split('.')
        .map(|part| format!("\"{}\"", part.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(".")
}
