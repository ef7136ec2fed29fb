// src/utils/http.rs

//! HTTP client construction.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::{AppError, Result};
use crate::models::HttpConfig;

/// Create a configured asynchronous HTTP client.
///
/// No client-wide timeout is set; only the main asset download carries
/// one, applied per-request by the fetcher.
pub fn create_client(config: &HttpConfig) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    for (name, value) in &config.headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| AppError::config(format!("invalid header name '{name}': {e}")))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| AppError::config(format!("invalid value for header '{name}': {e}")))?;
        headers.insert(header_name, header_value);
    }

    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .default_headers(headers)
        .build()?;
    Ok(client)
}
