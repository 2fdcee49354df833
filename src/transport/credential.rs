//! API credentials and the request value object.

use std::fmt;

use http::HeaderValue;
use serde_json::Value;

use super::InvalidCredential;

/// Header carrying a project API key.
pub const PROJECT_KEY_HEADER: &str = "x-api-key";

/// Header carrying a master key.
pub const MASTER_KEY_HEADER: &str = "x-master-key";

/// The key a client authenticates with.
///
/// Chosen once when the client is built; the kind decides which single
/// auth header is sent. `Debug` never prints the key itself.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Project key (`pk_live_...`), sent as `x-api-key`.
    ProjectKey(String),
    /// Master key (`mk_...`) for project administration, sent as `x-master-key`.
    MasterKey(String),
}

impl Credential {
    /// Creates a project-key credential.
    #[must_use]
    pub fn project_key(key: impl Into<String>) -> Self {
        Self::ProjectKey(key.into())
    }

    /// Creates a master-key credential.
    #[must_use]
    pub fn master_key(key: impl Into<String>) -> Self {
        Self::MasterKey(key.into())
    }

    /// Name of the header this credential is sent in.
    #[must_use]
    pub const fn header_name(&self) -> &'static str {
        match self {
            Self::ProjectKey(_) => PROJECT_KEY_HEADER,
            Self::MasterKey(_) => MASTER_KEY_HEADER,
        }
    }

    /// The raw key.
    #[must_use]
    pub fn expose(&self) -> &str {
        match self {
            Self::ProjectKey(key) | Self::MasterKey(key) => key,
        }
    }

    /// Builds the auth header value, marked sensitive.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCredential`] if the key is empty or not header-safe.
    pub fn header_value(&self) -> Result<HeaderValue, InvalidCredential> {
        let key = self.expose();
        if key.is_empty() {
            return Err(InvalidCredential::Empty);
        }
        let mut value = HeaderValue::from_str(key).map_err(|_| InvalidCredential::NotHeaderSafe)?;
        value.set_sensitive(true);
        Ok(value)
    }

    /// Returns true for a master key.
    #[must_use]
    pub const fn is_master(&self) -> bool {
        matches!(self, Self::MasterKey(_))
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::ProjectKey(_) => "ProjectKey",
            Self::MasterKey(_) => "MasterKey",
        };
        f.debug_tuple(kind).field(&"[REDACTED]").finish()
    }
}

/// One logical API call: method, path (query included) and optional JSON body.
///
/// Built per call and never mutated afterwards; retries reuse it as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    method: http::Method,
    path: String,
    body: Option<Value>,
}

impl RequestSpec {
    /// A `GET` request for `path`.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: http::Method::GET,
            path: path.into(),
            body: None,
        }
    }

    /// A `POST` request for `path` with a JSON body.
    #[must_use]
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: http::Method::POST,
            path: path.into(),
            body: Some(body),
        }
    }

    /// A `PATCH` request for `path` with a JSON body.
    #[must_use]
    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: http::Method::PATCH,
            path: path.into(),
            body: Some(body),
        }
    }

    /// The HTTP method.
    #[must_use]
    pub const fn method(&self) -> &http::Method {
        &self.method
    }

    /// The path relative to the base URL, including any query string.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The JSON body, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}
