//! Execution-service seam and its HTTP implementation.

use async_trait::async_trait;
use miette::Diagnostic;
use thiserror::Error;

use crate::config::ClientConfig;
use crate::request::RunRequest;
use crate::results::RunResponse;

/// Failures of an execution call. All variants drive the same controller
/// transition (`running → idle`, results stay cleared).
#[derive(Debug, Error, Diagnostic)]
pub enum BackendError {
    /// Network-level failure before a response arrived.
    #[error("execution request failed: {0}")]
    #[diagnostic(code(pipewright::backend::transport))]
    Transport(#[from] reqwest::Error),

    /// Service answered with a non-success status (rejected graph,
    /// server-side execution error).
    #[error("execution service returned status {status}")]
    #[diagnostic(code(pipewright::backend::status))]
    Status { status: u16, body: String },

    /// Response body did not match the run-response wire shape.
    #[error("malformed execution response: {0}")]
    #[diagnostic(code(pipewright::backend::decode))]
    Decode(#[from] serde_json::Error),
}

/// The execution service as the client sees it: an opaque
/// `execute(graph, target?) -> results | error` function.
///
/// Scheduling, upstream-closure computation, training, and data access all
/// live behind this seam.
#[async_trait]
pub trait ExecutionBackend: Send + Sync {
    async fn execute(&self, request: &RunRequest) -> Result<RunResponse, BackendError>;
}

/// Production backend: POSTs the run request to `{base}/pipeline/run`.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url,
        }
    }

    /// Reuse an existing client (connection pooling with the catalog
    /// source).
    #[must_use]
    pub fn with_client(client: reqwest::Client, config: ClientConfig) -> Self {
        Self {
            client,
            base_url: config.base_url,
        }
    }
}

#[async_trait]
impl ExecutionBackend for HttpBackend {
    async fn execute(&self, request: &RunRequest) -> Result<RunResponse, BackendError> {
        let url = format!("{}/pipeline/run", self.base_url);
        let response = self.client.post(&url).json(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
