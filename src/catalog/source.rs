//! Fetch seam for the node-type catalog.

use async_trait::async_trait;
use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;

use super::descriptor::NodeTypeDescriptor;
use crate::config::ClientConfig;

/// Errors raised while fetching or decoding the catalog.
///
/// All of them degrade the same way at the call site: the session keeps an
/// empty catalog and the palette shows no types.
#[derive(Debug, Error, Diagnostic)]
pub enum CatalogError {
    /// Metadata service unreachable or returned a transport-level failure.
    #[error("metadata service unreachable: {0}")]
    #[diagnostic(
        code(pipewright::catalog::unreachable),
        help("The editor keeps working with an empty palette; retry by reloading the session.")
    )]
    Http(#[from] reqwest::Error),

    /// Response body did not match the catalog wire shape.
    #[error("malformed catalog payload: {0}")]
    #[diagnostic(code(pipewright::catalog::decode))]
    Decode(#[from] serde_json::Error),

    /// Service responded but refused the request.
    #[error("metadata service returned status {status}")]
    #[diagnostic(code(pipewright::catalog::status))]
    Status { status: u16 },
}

/// Transport abstraction for the read-once catalog fetch.
///
/// Production uses [`HttpCatalogSource`]; tests substitute fixtures.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<NodeTypeDescriptor>, CatalogError>;
}

#[derive(Debug, Deserialize)]
struct CatalogEnvelope {
    node_types: Vec<NodeTypeDescriptor>,
}

/// HTTP catalog source against the metadata service's `/node-types`
/// endpoint.
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCatalogSource {
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url,
        }
    }

    /// Reuse an existing client (connection pooling with the run backend).
    #[must_use]
    pub fn with_client(client: reqwest::Client, config: ClientConfig) -> Self {
        Self {
            client,
            base_url: config.base_url,
        }
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch(&self) -> Result<Vec<NodeTypeDescriptor>, CatalogError> {
        let url = format!("{}/node-types", self.base_url);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
            });
        }
        let body = response.bytes().await?;
        let envelope: CatalogEnvelope = serde_json::from_slice(&body)?;
        Ok(envelope.node_types)
    }
}
