//! Promotion record and payload validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors raised while validating promotion data from a client payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required key was absent from the payload
    #[error("Invalid promotion: missing {0}")]
    MissingField(&'static str),
    /// A field held a JSON value of the wrong type
    #[error("Invalid type for {expected} [{field}]: {actual}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        actual: &'static str,
    },
    /// A required string field was present but empty
    #[error("Invalid promotion: [{0}] must be a non-empty string")]
    EmptyField(&'static str),
    /// A date field did not parse as an ISO-8601 calendar date
    #[error("Invalid date format for [{0}]: expected YYYY-MM-DD")]
    BadDateFormat(&'static str),
    /// The payload was not a JSON object at all
    #[error("Invalid promotion: body of request contained bad or no data")]
    InvalidStructure,
}

/// A discount tied to a product, in effect over an inclusive date window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Promotion {
    /// Server-assigned identifier; `None` until the record is inserted
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub promotion_type: String,
    pub value: i64,
    pub product_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Promotion {
    /// Validate an untrusted JSON payload into a Promotion.
    ///
    /// Every required field is checked individually so the error can name
    /// the offending key. The `id` field is never read from the payload.
    pub fn from_json(data: &Value) -> Result<Self, ValidationError> {
        let map = data.as_object().ok_or(ValidationError::InvalidStructure)?;

        Ok(Self {
            id: None,
            name: require_string(map, "name")?,
            promotion_type: require_string(map, "promotion_type")?,
            value: require_integer(map, "value")?,
            product_id: require_integer(map, "product_id")?,
            start_date: require_date(map, "start_date")?,
            end_date: require_date(map, "end_date")?,
        })
    }

    /// Whether the promotion's window contains `on` (inclusive both ends).
    pub fn is_active_on(&self, on: NaiveDate) -> bool {
        self.start_date <= on && on <= self.end_date
    }

    /// Truncate the active window so it ends no later than yesterday.
    ///
    /// An end date already earlier than yesterday is left untouched, so the
    /// operation never extends history and applying it twice is a no-op.
    pub fn deactivate(&mut self, today: NaiveDate) {
        if let Some(yesterday) = today.pred_opt() {
            if self.end_date > yesterday {
                self.end_date = yesterday;
            }
        }
    }
}

fn require_field<'a>(
    map: &'a serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<&'a Value, ValidationError> {
    map.get(field).ok_or(ValidationError::MissingField(field))
}

fn require_string(
    map: &serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<String, ValidationError> {
    let value = require_field(map, field)?;
    let text = value.as_str().ok_or(ValidationError::WrongType {
        field,
        expected: "string",
        actual: json_type_name(value),
    })?;
    if text.is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(text.to_string())
}

fn require_integer(
    map: &serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<i64, ValidationError> {
    let value = require_field(map, field)?;
    value.as_i64().ok_or(ValidationError::WrongType {
        field,
        expected: "integer",
        actual: json_type_name(value),
    })
}

fn require_date(
    map: &serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<NaiveDate, ValidationError> {
    let value = require_field(map, field)?;
    let text = value.as_str().ok_or(ValidationError::WrongType {
        field,
        expected: "date string",
        actual: json_type_name(value),
    })?;
    text.parse::<NaiveDate>()
        .map_err(|_| ValidationError::BadDateFormat(field))
}

/// Name of a JSON value's type, for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.as_i64().is_some() => "integer",
        Value::Number(_) => "float",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
