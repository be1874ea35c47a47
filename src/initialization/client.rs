//! HTTP client initialization.

use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::SOURCE_FETCH_TIMEOUT_SECS;
use crate::error_handling::InitializationError;

/// Initializes the HTTP client used to download the server list.
///
/// The client identifies itself as `dns_audit/<version>` and gives up after
/// `SOURCE_FETCH_TIMEOUT_SECS`.
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails.
pub fn init_client() -> Result<reqwest::Client, InitializationError> {
    let client = ClientBuilder::new()
        .timeout(Duration::from_secs(SOURCE_FETCH_TIMEOUT_SECS))
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}
