// src/utils/http.rs

//! HTTP client utilities.

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};

use crate::error::Result;
use crate::models::RemoteConfig;

/// Create a configured asynchronous HTTP client for the remote directory.
pub fn create_async_client(config: &RemoteConfig) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .default_headers(headers)
        .timeout(config.timeout())
        .build()?;
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client_with_defaults() {
        assert!(create_async_client(&RemoteConfig::default()).is_ok());
    }
}
