use crate::error::{Result, ShiftError};
use bson::oid::ObjectId;
use bson::{Bson, Document};
use serde_json::{Map, Value};
use std::fmt;

/// Field holding the store-assigned identifier of every document.
pub const ID_FIELD: &str = "_id";

/// Store-native document identifier.
///
/// Identifiers arrive over HTTP as opaque strings and must be parsed before any
/// store call is made, so a malformed identifier never reaches the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(ObjectId);

impl DocumentId {
    /// Parses a 24 hex digit identifier.
    pub fn parse(raw: &str) -> Result<Self> {
        ObjectId::parse_str(raw)
            .map(Self)
            .map_err(|_| ShiftError::InvalidIdentifier(raw.to_string()))
    }

    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl From<ObjectId> for DocumentId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

/// Document selection for `find`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    All,
    /// Top-level string equality on a single field.
    FieldEquals { field: String, value: String },
}

impl Query {
    pub fn field_equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Query::FieldEquals {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Query::All => true,
            Query::FieldEquals { field, value } => {
                matches!(document.get(field), Some(Bson::String(s)) if s == value)
            }
        }
    }
}

/// Converts a JSON object into a store document.
pub fn from_json_object(fields: Map<String, Value>) -> Result<Document> {
    Ok(bson::to_document(&fields)?)
}

/// Renders a store document as JSON.
///
/// Identifiers become their hex string and datetimes become RFC 3339 strings;
/// every other value uses relaxed extended JSON.
pub fn to_json(document: Document) -> Value {
    Value::Object(
        document
            .into_iter()
            .map(|(key, value)| (key, bson_to_json(value)))
            .collect(),
    )
}

fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => match dt.try_to_rfc3339_string() {
            Ok(s) => Value::String(s),
            Err(_) => Bson::DateTime(dt).into_relaxed_extjson(),
        },
        Bson::Document(doc) => to_json(doc),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}
