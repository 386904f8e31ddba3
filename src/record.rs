//! Content records as seen by the path builder.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::StoreError;

/// Host-defined record identifier. Serialized untagged: a JSON number or string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl RecordId {
    /// Read an id from a scalar JSON value. Empty strings and non-scalars are not ids.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(
                n.as_i64()
                    .map(RecordId::Int)
                    .unwrap_or_else(|| RecordId::Text(n.to_string())),
            ),
            Value::String(s) if !s.is_empty() => Some(RecordId::Text(s.clone())),
            _ => None,
        }
    }

    /// The same id in the other representation (`3` <-> `"3"`), if there is one.
    pub fn alternate(&self) -> Option<Self> {
        match self {
            RecordId::Int(i) => Some(RecordId::Text(i.to_string())),
            RecordId::Text(s) => s.parse::<i64>().ok().map(RecordId::Int),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(i) => write!(f, "{i}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Int(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId::Text(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        RecordId::Text(value)
    }
}

/// Anything the path builder can derive a segment from.
///
/// Hosts with their own record types implement this instead of converting
/// into [`Record`].
pub trait PathRecord {
    fn record_id(&self) -> RecordId;

    /// Title text stored under `field`, or `None` when missing.
    fn title(&self, field: &str) -> Option<Cow<'_, str>>;
}

/// A record as handed out by an admin UI or a REST item endpoint: an id plus
/// its field values.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: RecordId,
    pub fields: Map<String, Value>,
}

impl Record {
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Builder-style field setter.
    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    /// Build a record from a JSON object, taking its id from `id_field`.
    pub fn from_json(value: Value, id_field: &str) -> Result<Self, StoreError> {
        let (id, fields) = split_object(value, id_field)?;
        let id = id.ok_or_else(|| StoreError::MissingId {
            field: id_field.to_string(),
        })?;
        Ok(Self { id, fields })
    }

    /// Build a record that may not be persisted yet. A missing id becomes an
    /// empty text id, which no stored record can carry.
    pub fn from_draft(value: Value, id_field: &str) -> Result<Self, StoreError> {
        let (id, fields) = split_object(value, id_field)?;
        let id = id.unwrap_or_else(|| RecordId::Text(String::new()));
        Ok(Self { id, fields })
    }

    /// The parent id stored under `field`.
    ///
    /// Accepts a scalar foreign key or an expanded relation object with an
    /// `id` member. Null, missing and empty references mean "root".
    pub fn parent_ref(&self, field: &str) -> Option<RecordId> {
        match self.fields.get(field)? {
            Value::Object(relation) => relation.get("id").and_then(RecordId::from_json),
            other => RecordId::from_json(other),
        }
    }
}

impl PathRecord for Record {
    fn record_id(&self) -> RecordId {
        self.id.clone()
    }

    fn title(&self, field: &str) -> Option<Cow<'_, str>> {
        match self.fields.get(field)? {
            Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            _ => None,
        }
    }
}

fn split_object(value: Value, id_field: &str) -> Result<(Option<RecordId>, Map<String, Value>), StoreError> {
    let Value::Object(fields) = value else {
        return Err(StoreError::InvalidRecord(format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        )));
    };
    let id = fields.get(id_field).and_then(RecordId::from_json);
    Ok((id, fields))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
