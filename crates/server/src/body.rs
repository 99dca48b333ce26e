use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use url::form_urlencoded;

use crate::errors::ApiError;

/// Request body carrying an optional `customer` value.
///
/// Decoding never fails on content: a missing, empty or unparseable body yields
/// `customer: None` and the operation reports its own validation error.
#[derive(Debug, Default, Deserialize)]
pub struct CustomerBody {
    #[serde(default)]
    pub customer: Option<Value>,
}

impl CustomerBody {
    pub fn decode(content_type: &str, bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            return Self::default();
        }
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if mime == "application/x-www-form-urlencoded" {
            Self::from_form(bytes)
        } else if mime == "application/json" || mime.ends_with("+json") {
            serde_json::from_slice(bytes).unwrap_or_default()
        } else {
            Self::default()
        }
    }

    /// `customer[name]=Ann&customer[email]=a%40b.c` builds a string-valued object.
    /// Nested brackets are ignored.
    fn from_form(bytes: &[u8]) -> Self {
        let mut fields = Map::new();
        let mut seen = false;
        for (key, value) in form_urlencoded::parse(bytes) {
            let Some(field) = key
                .strip_prefix("customer[")
                .and_then(|rest| rest.strip_suffix(']'))
            else {
                continue;
            };
            if field.is_empty() || field.contains(['[', ']']) {
                continue;
            }
            seen = true;
            fields.insert(field.to_string(), Value::String(value.into_owned()));
        }
        Self { customer: seen.then_some(Value::Object(fields)) }
    }
}

#[async_trait]
impl<S> FromRequest<S> for CustomerBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::new(e.status(), e.body_text()))?;
        Ok(Self::decode(&content_type, &bytes))
    }
}
