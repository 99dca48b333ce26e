//! Caller identification.
//!
//! Identity is an unauthenticated, caller-chosen token. Extraction sits behind
//! [`IdentifyCaller`] so handlers only ever see a resolved [`UserId`].

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderName},
    middleware::Next,
    response::Response,
};
use service::UserId;
use tracing::info;

use crate::{errors::ApiError, state::AppState};

pub const USER_HEADER: &str = "x-user-id";
pub const MISSING_USER_ID: &str = "Specify \"X-User-ID\" header with your ID";

pub trait IdentifyCaller: Send + Sync {
    /// `None` when the request carries no usable identity.
    fn identify(&self, headers: &HeaderMap) -> Option<UserId>;
}

/// Reads the user id from a request header (case-insensitive name).
#[derive(Debug, Clone)]
pub struct HeaderIdentity {
    header: HeaderName,
}

impl HeaderIdentity {
    pub fn new(header: HeaderName) -> Self {
        Self { header }
    }
}

impl Default for HeaderIdentity {
    fn default() -> Self {
        Self::new(HeaderName::from_static(USER_HEADER))
    }
}

impl IdentifyCaller for HeaderIdentity {
    fn identify(&self, headers: &HeaderMap) -> Option<UserId> {
        let value = headers.get(&self.header)?;
        std::str::from_utf8(value.as_bytes()).ok().and_then(UserId::parse)
    }
}

/// Middleware: reject unidentified callers with 403, otherwise ensure the
/// caller's partition exists and expose the `UserId` to handlers.
///
/// The `UserId` is also attached to the response so the access log can report it.
pub async fn require_user_id(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(user) = state.identity.identify(req.headers()) else {
        info!(
            event = "unidentified",
            method = %req.method(),
            path = %req.uri().path(),
            "rejected request without user id"
        );
        return Err(ApiError::forbidden(MISSING_USER_ID));
    };

    state.customers.identify(&user).await;
    req.extensions_mut().insert(user.clone());
    let mut response = next.run(req).await;
    response.extensions_mut().insert(user);
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn header_lookup_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static("x-user-id"), HeaderValue::from_static("u1"));
        let id = HeaderIdentity::default().identify(&headers);
        assert_eq!(id.as_ref().map(UserId::as_str), Some("u1"));
    }

    #[test]
    fn empty_or_missing_header_is_unidentified() {
        let identity = HeaderIdentity::default();
        assert!(identity.identify(&HeaderMap::new()).is_none());

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static("x-user-id"), HeaderValue::from_static(""));
        assert!(identity.identify(&headers).is_none());
    }

    #[test]
    fn custom_header_name() {
        let identity = HeaderIdentity::new(HeaderName::from_static("x-tenant"));
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static("x-user-id"), HeaderValue::from_static("u1"));
        assert!(identity.identify(&headers).is_none());
        headers.insert(HeaderName::from_static("x-tenant"), HeaderValue::from_static("t1"));
        assert!(identity.identify(&headers).is_some());
    }
}
