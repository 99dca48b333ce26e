use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reserved key carrying a customer's identifier.
pub const ID_KEY: &str = "id";

/// Opaque caller identity. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn parse(raw: &str) -> Option<Self> {
        (!raw.is_empty()).then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A free-form JSON object owned by one user.
///
/// Once stored, `id` is always a string equal to the key it is stored under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Customer(Map<String, Value>);

impl Customer {
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn id(&self) -> Option<&str> {
        self.0.get(ID_KEY).and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Overwrite every key present in `patch`, keeping the others.
    pub fn merge(&mut self, patch: Map<String, Value>) {
        for (key, value) in patch {
            self.0.insert(key, value);
        }
    }
}

/// Result of a merge update: the full record and the keys that were written, in body order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdatedCustomer {
    pub customer: Customer,
    #[serde(rename = "updatedKeys")]
    pub updated_keys: Vec<String>,
}
