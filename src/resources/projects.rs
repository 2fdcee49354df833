//! Project administration requests. These require a master key.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::time::{Sleeper, TokioSleeper};
use crate::transport::{ApiError, HttpClient, Transport};

use super::{decode, encode_body};

/// Parameters for [`Projects::create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateProjectParams {
    /// Display name.
    pub name: String,
    /// URL-friendly identifier.
    pub slug: String,
    /// Endpoint that receives payment webhooks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    /// Free-form metadata stored with the project.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl CreateProjectParams {
    /// Creates parameters with the two required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            webhook_url: None,
            metadata: None,
        }
    }

    /// Sets the webhook endpoint.
    #[must_use]
    pub fn with_webhook_url(mut self, url: impl Into<String>) -> Self {
        self.webhook_url = Some(url.into());
        self
    }

    /// Sets the metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// A newly created project, including its secrets.
///
/// `api_key` and `webhook_secret` are only ever returned here; `Debug`
/// redacts both.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Project id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// URL-friendly identifier.
    pub slug: String,
    /// Project API key, sent as `x-api-key`.
    pub api_key: String,
    /// Secret for verifying this project's webhooks.
    pub webhook_secret: String,
    /// Endpoint that receives payment webhooks.
    pub webhook_url: Option<String>,
    /// Creation time (ISO-8601).
    pub created_at: String,
}

impl std::fmt::Debug for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Project")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("slug", &self.slug)
            .field("api_key", &"[REDACTED]")
            .field("webhook_secret", &"[REDACTED]")
            .field("webhook_url", &self.webhook_url)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Result of [`Projects::create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProjectResponse {
    /// The created project.
    pub project: Project,
}

/// One row of [`Projects::list`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectListItem {
    /// Project id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// URL-friendly identifier.
    pub slug: String,
    /// Masked by the server in listings.
    pub api_key: String,
    /// Endpoint that receives payment webhooks.
    pub webhook_url: Option<String>,
    /// Whether the project accepts new payments.
    pub is_active: bool,
    /// Creation time (ISO-8601).
    pub created_at: String,
}

/// Result of [`Projects::list`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListProjectsResponse {
    /// Projects owned by the master key.
    pub projects: Vec<ProjectListItem>,
}

/// Handle for the `/v1/projects` endpoints.
///
/// Obtained from [`PayzCore::projects`](crate::PayzCore::projects).
#[derive(Debug)]
pub struct Projects<'a, H, S = TokioSleeper> {
    transport: &'a Transport<H, S>,
}

impl<'a, H, S> Projects<'a, H, S>
where
    H: HttpClient,
    S: Sleeper,
{
    /// Wraps a transport.
    #[must_use]
    pub const fn new(transport: &'a Transport<H, S>) -> Self {
        Self { transport }
    }

    /// Creates a project.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] from the transport, or an `api_error` with
    /// status 0 if the response has an unexpected shape.
    pub async fn create(
        &self,
        params: &CreateProjectParams,
    ) -> Result<CreateProjectResponse, ApiError> {
        let body = encode_body(params)?;
        decode(self.transport.post("/v1/projects", body).await?)
    }

    /// Lists all projects of the account.
    ///
    /// # Errors
    ///
    /// See [`create`](Self::create).
    pub async fn list(&self) -> Result<ListProjectsResponse, ApiError> {
        decode(self.transport.get("/v1/projects").await?)
    }
}
