use super::document::{self, ID_FIELD, Query};
use crate::error::{Result, ShiftError};
use bson::Document;
use serde_json::Value;

/// Server-assigned creation timestamp of a parcel.
pub const CREATED_AT_FIELD: &str = "createdAt";
/// Field matched by the `email` filter of the parcel listing.
pub const EMAIL_FIELD: &str = "email";

/// Client-supplied parcel fields that passed the validation boundary.
///
/// Parcels carry no fixed schema, but every field name must be safe to hand to
/// the store verbatim: non-empty, not `_id`, no leading `$` and no `.` path
/// separator.
#[derive(Debug, Clone, PartialEq)]
pub struct ParcelFields(Document);

impl ParcelFields {
    /// Validates a parcel body for creation.
    pub fn from_json(body: Value) -> Result<Self> {
        let Value::Object(map) = body else {
            return Err(ShiftError::InvalidBody(
                "parcel body must be a JSON object".to_string(),
            ));
        };

        for key in map.keys() {
            validate_field_name(key)?;
        }

        Ok(Self(document::from_json_object(map)?))
    }

    /// Validates a parcel body for an update; an update must set something.
    pub fn from_update_json(body: Value) -> Result<Self> {
        let fields = Self::from_json(body)?;
        if fields.is_empty() {
            return Err(ShiftError::InvalidBody(
                "update body must contain at least one field".to_string(),
            ));
        }
        Ok(fields)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_document(self) -> Document {
        self.0
    }

    /// Document to insert: the submitted fields with `createdAt` set to `now`,
    /// replacing any client-supplied value.
    pub fn stamped(self, now: bson::DateTime) -> Document {
        let mut document = self.0;
        document.insert(CREATED_AT_FIELD, now);
        document
    }
}

fn validate_field_name(key: &str) -> Result<()> {
    let reason = if key.is_empty() {
        "field names must not be empty"
    } else if key == ID_FIELD {
        "`_id` is assigned by the store"
    } else if key.starts_with('$') {
        "field names must not start with `$`"
    } else if key.contains('.') {
        "field names must not contain `.`"
    } else {
        return Ok(());
    };

    Err(ShiftError::InvalidBody(format!("{reason} (got {key:?})")))
}

/// Selection for the parcel listing: filtered by `email` when one is given.
pub fn listing_query(email: Option<&str>) -> Query {
    match email.map(str::trim) {
        Some(email) if !email.is_empty() => Query::field_equals(EMAIL_FIELD, email),
        _ => Query::All,
    }
}
