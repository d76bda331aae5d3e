//! Endpoint configuration for the metadata and execution services.

/// Base-URL configuration shared by the HTTP catalog source and run
/// backend.
///
/// Both services sit behind the same API prefix in the reference
/// deployment (`{base}/node-types`, `{base}/pipeline/run`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
}

impl ClientConfig {
    pub const DEFAULT_BASE_URL: &'static str = "http://127.0.0.1:8000/api";

    /// Resolve the base URL from the environment.
    ///
    /// Reads `PIPEWRIGHT_API_URL` (after loading a `.env` file if present),
    /// falling back to the development server address.
    #[must_use]
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let base_url = std::env::var("PIPEWRIGHT_API_URL")
            .unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_string());
        Self::with_base_url(base_url)
    }

    /// Explicit base URL; trailing slashes are trimmed so endpoint paths
    /// can be appended uniformly.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
