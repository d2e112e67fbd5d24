//! HTTP implementation of [`TaskApi`] backed by `reqwest`.
//!
//! | Operation | Method | Path |
//! |---|---|---|
//! | list | GET | `/tasks` |
//! | create | POST | `/tasks` |
//! | update | PATCH | `/tasks/{id}` |
//! | delete | DELETE | `/tasks/{id}` |
//!
//! Non-2xx responses become [`RequestError::Status`], carrying the body's
//! `detail` string when the server supplied one.

use serde::de::DeserializeOwned;
use tasklet_proto::{ErrorDetail, NewTask, Task, TaskId, TaskPatch};

use super::{Operation, RequestError, TaskApi};

/// Errors that can occur when constructing an [`HttpTaskApi`].
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The base URL did not parse.
    #[error("invalid API base URL {url:?}: {source}")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
        /// Parser error.
        source: url::ParseError,
    },

    /// The base URL is not `http` or `https`.
    #[error("unsupported API URL scheme {0:?} (expected http or https)")]
    UnsupportedScheme(String),

    /// The HTTP client could not be built (e.g. TLS backend failure).
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Task API client speaking JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTaskApi {
    /// Base URL without a trailing slash.
    base_url: String,
    client: reqwest::Client,
}

impl HttpTaskApi {
    /// Creates a client for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if the URL does not parse, is not http(s), or
    /// the underlying client cannot be constructed.
    pub fn new(base_url: &str) -> Result<Self, BuildError> {
        let parsed = url::Url::parse(base_url).map_err(|source| BuildError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(BuildError::UnsupportedScheme(parsed.scheme().to_string()));
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("tasklet/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// The configured base URL (no trailing slash).
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn task_url(&self, id: TaskId) -> String {
        self.url(&format!("/tasks/{id}"))
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        operation: Operation,
    ) -> Result<reqwest::Response, RequestError> {
        let resp = request
            .send()
            .await
            .map_err(|e| RequestError::transport(operation, e))?;
        ensure_ok(resp, operation).await
    }
}

/// Map non-success statuses to [`RequestError::Status`].
async fn ensure_ok(
    resp: reqwest::Response,
    operation: Operation,
) -> Result<reqwest::Response, RequestError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    // An unreadable body only means there is no detail to show.
    let body = resp.bytes().await.unwrap_or_default();
    let detail = ErrorDetail::parse(&body).and_then(|d| d.message().map(str::to_string));

    tracing::warn!(
        %operation,
        status = status.as_u16(),
        detail = ?detail,
        "task API rejected request"
    );

    Err(RequestError::Status {
        operation,
        status: status.as_u16(),
        detail,
    })
}

async fn read_json<T: DeserializeOwned>(
    resp: reqwest::Response,
    operation: Operation,
) -> Result<T, RequestError> {
    resp.json::<T>().await.map_err(|e| {
        if e.is_decode() {
            RequestError::decode(operation, e)
        } else {
            RequestError::transport(operation, e)
        }
    })
}

impl TaskApi for HttpTaskApi {
    async fn list(&self) -> Result<Vec<Task>, RequestError> {
        let url = self.url("/tasks");
        tracing::debug!(method = "GET", %url, "sending request");
        let resp = self.send(self.client.get(&url), Operation::List).await?;
        read_json(resp, Operation::List).await
    }

    async fn create(&self, title: &str) -> Result<Task, RequestError> {
        let url = self.url("/tasks");
        tracing::debug!(method = "POST", %url, "sending request");
        let body = NewTask {
            title: title.to_string(),
        };
        let resp = self
            .send(self.client.post(&url).json(&body), Operation::Create)
            .await?;
        read_json(resp, Operation::Create).await
    }

    async fn update(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, RequestError> {
        let url = self.task_url(id);
        tracing::debug!(method = "PATCH", %url, "sending request");
        let resp = self
            .send(self.client.patch(&url).json(patch), Operation::Update)
            .await?;
        read_json(resp, Operation::Update).await
    }

    async fn delete(&self, id: TaskId) -> Result<(), RequestError> {
        let url = self.task_url(id);
        tracing::debug!(method = "DELETE", %url, "sending request");
        self.send(self.client.delete(&url), Operation::Delete)
            .await?;
        Ok(())
    }

    fn endpoint(&self) -> &str {
        &self.base_url
    }
}
