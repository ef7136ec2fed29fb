// src/services/fetch.rs

//! Build information fetcher.
//!
//! Performs the two sequential fetches per channel (entry page, then the
//! main JS bundle) and runs the fingerprint extractors over each body.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::error::FetchError;
use crate::models::{AssetHashes, ReleaseBuild, ReleaseChannel};
use crate::services::extract::{extract_asset_hashes, extract_build_id};

/// Source of build snapshots for a channel.
///
/// Implemented over HTTP by [`BuildFetcher`]; the poller depends on this
/// trait so its loop can be exercised without a network.
#[async_trait]
pub trait BuildSource: Send + Sync {
    async fn fetch(&self, channel: ReleaseChannel) -> Result<ReleaseBuild, FetchError>;
}

/// Fetches build information from a channel's deployed pages.
pub struct BuildFetcher {
    client: Client,
    scheme: String,
    base_domain: String,
    download_timeout: Duration,
}

impl BuildFetcher {
    /// Create a fetcher for the given domain.
    pub fn new(client: Client, base_domain: impl Into<String>, download_timeout: Duration) -> Self {
        Self {
            client,
            scheme: "https".to_string(),
            base_domain: base_domain.into(),
            download_timeout,
        }
    }

    #[cfg(test)]
    fn with_scheme(mut self, scheme: &str) -> Self {
        self.scheme = scheme.to_string();
        self
    }

    /// URL of the entry (login) page for a channel.
    fn login_page_url(&self, channel: ReleaseChannel) -> String {
        format!(
            "{}://{}/login",
            self.scheme,
            channel.host(&self.base_domain)
        )
    }

    /// URL of a JS asset for a channel.
    fn asset_url(&self, channel: ReleaseChannel, hash: &str) -> String {
        format!(
            "{}://{}/assets/{}.js",
            self.scheme,
            channel.host(&self.base_domain),
            hash
        )
    }

    async fn fetch_hashes(&self, channel: ReleaseChannel) -> Result<AssetHashes, FetchError> {
        let url = self.login_page_url(channel);
        log::info!("{channel}: fetching {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        let status = response.status();
        if status != StatusCode::OK {
            log::error!("{channel}: failed to fetch entry page, got http {status}");
            return Err(FetchError::UnexpectedStatus { status, url });
        }

        let body = response.text().await.map_err(FetchError::from_reqwest)?;
        Ok(extract_asset_hashes(&body)?)
    }

    async fn fetch_main_asset(
        &self,
        channel: ReleaseChannel,
        hash: &str,
    ) -> Result<String, FetchError> {
        let url = self.asset_url(channel, hash);

        let response = self
            .client
            .get(&url)
            .timeout(self.download_timeout)
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        response.text().await.map_err(FetchError::from_reqwest)
    }
}

#[async_trait]
impl BuildSource for BuildFetcher {
    async fn fetch(&self, channel: ReleaseChannel) -> Result<ReleaseBuild, FetchError> {
        let hashes = self.fetch_hashes(channel).await?;
        let main = self.fetch_main_asset(channel, hashes.main_hash()).await?;

        let size_bytes = main.len() as u64;
        let build_id = extract_build_id(&main)?;

        Ok(ReleaseBuild {
            channel,
            hashes,
            build_id,
            size_bytes,
        })
    }
}
