//! Identities and the values they are read from.
//!
//! An [`Identity`] is a trimmed, non-empty, case-preserved string. Equality is
//! exact string equality; there is no case folding.
//!
//! CSV cells may hold either plain text or an embedded JSON object. A cell is
//! resolved once into a [`CellValue`] and the identity is then read from the
//! variant, never by probing properties on an untyped value.

use crate::skip::SkipReason;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Borrow;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Trim `raw`; `None` when nothing is left.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Identity {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A CSV cell resolved at read time.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// The cell held a JSON object.
    Json(Value),
    /// Anything else, kept verbatim.
    Text(String),
}

impl CellValue {
    /// Resolve a raw cell. Only JSON objects count as embedded JSON; scalars
    /// such as `42` or `true` stay text.
    pub fn parse(cell: &str) -> Self {
        let trimmed = cell.trim();
        if trimmed.starts_with('{')
            && let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(trimmed)
        {
            return Self::Json(value);
        }
        Self::Text(cell.to_string())
    }

    /// The identity carried by this cell. Text is used directly; embedded JSON is
    /// looked up under `key`.
    ///
    /// # Errors
    /// Returns the reason the cell cannot supply an identity.
    pub fn identity(&self, key: &str) -> Result<Identity, SkipReason> {
        match self {
            Self::Text(s) => Identity::new(s).ok_or(SkipReason::EmptyIdentity),
            Self::Json(v) => identity_from_value(v, key),
        }
    }
}

/// Read the identity stored under `key` in a JSON object.
///
/// # Errors
/// Returns the reason when `value` is not an object, lacks `key`, holds a
/// non-string under `key`, or holds a blank string.
pub fn identity_from_value(value: &Value, key: &str) -> Result<Identity, SkipReason> {
    let obj = value.as_object().ok_or(SkipReason::NotAnObject)?;
    match obj.get(key) {
        None | Some(Value::Null) => Err(SkipReason::MissingKey(key.to_string())),
        Some(Value::String(s)) => Identity::new(s).ok_or(SkipReason::EmptyIdentity),
        Some(_) => Err(SkipReason::NotAString(key.to_string())),
    }
}
