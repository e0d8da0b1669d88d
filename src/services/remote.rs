// src/services/remote.rs

//! Remote directory client.
//!
//! Issues one search request against the volunteer directory and classifies
//! every way it can go wrong into a `FetchError`.

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::{FetchError, FetchResult, Result};
use crate::models::{RemoteConfig, RemoteSearchResponse, SearchFilters};
use crate::utils::{http, same_host};

/// A place remote search pages come from.
#[async_trait]
pub trait OpportunitySource: Send + Sync {
    /// Fetch the page selected by `filters`.
    async fn search(&self, filters: &SearchFilters) -> FetchResult<RemoteSearchResponse>;

    /// Fetch a page by the continuation URL the directory handed out.
    async fn follow(&self, page_url: &str) -> FetchResult<RemoteSearchResponse>;

    /// Lightweight reachability check.
    async fn probe(&self) -> FetchResult<()>;
}

/// HTTP client for the directory search endpoint.
pub struct RemoteFetcher {
    config: RemoteConfig,
    base_url: Url,
    client: Client,
}

impl RemoteFetcher {
    /// Create a fetcher with its own configured HTTP client.
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let client = http::create_async_client(&config)?;
        Self::with_client(config, client)
    }

    /// Create a fetcher around an existing client.
    pub fn with_client(config: RemoteConfig, client: Client) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        Ok(Self {
            config,
            base_url,
            client,
        })
    }

    /// Query pairs for a search, in emission order.
    ///
    /// With no country, area or keyword filter the configured default query is
    /// issued instead, so a first load is reproducible.
    pub fn query_pairs(&self, filters: &SearchFilters) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        if filters.has_remote_query() {
            if let Some(cc) = &filters.country_code {
                pairs.push(("cc".to_string(), cc.clone()));
            }
            for ac in &filters.area_codes {
                pairs.push(("ac".to_string(), ac.clone()));
            }
            if let Some(keyword) = &filters.keyword {
                pairs.push((self.config.keyword_param.clone(), keyword.clone()));
            }
        } else {
            pairs.push(("cc".to_string(), self.config.default_country_code.clone()));
            for ac in &self.config.default_area_codes {
                pairs.push(("ac".to_string(), ac.clone()));
            }
        }

        let page = filters.page_number();
        if page > 1 {
            pairs.push(("page".to_string(), page.to_string()));
        }
        pairs
    }

    /// Full request URL for a search.
    pub fn search_url(&self, filters: &SearchFilters) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.clear();
            for (key, value) in self.query_pairs(filters) {
                query.append_pair(&key, &value);
            }
        }
        url
    }

    async fn get(&self, url: &str) -> FetchResult<RemoteSearchResponse> {
        let timeout = self.config.timeout_secs;
        log::info!("Remote request: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_transport(e, timeout))?;

        let status = response.status();
        log::debug!("Remote response status: {}", status);
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_transport(e, timeout))?;
        parse_search_response(&body)
    }
}

#[async_trait]
impl OpportunitySource for RemoteFetcher {
    async fn search(&self, filters: &SearchFilters) -> FetchResult<RemoteSearchResponse> {
        let url = self.search_url(filters);
        self.get(url.as_str()).await
    }

    async fn follow(&self, page_url: &str) -> FetchResult<RemoteSearchResponse> {
        if !same_host(self.base_url.as_str(), page_url) {
            return Err(FetchError::parse(format!(
                "continuation URL {page_url} is not on the directory host"
            )));
        }
        self.get(page_url).await
    }

    async fn probe(&self) -> FetchResult<()> {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair("cc", &self.config.default_country_code)
            .append_pair(
                "ac",
                self.config
                    .default_area_codes
                    .first()
                    .map(String::as_str)
                    .unwrap_or("5"),
            );

        let response = self
            .client
            .head(url)
            .timeout(self.config.probe_timeout())
            .send()
            .await
            .map_err(|e| FetchError::from_transport(e, self.config.probe_timeout_secs))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(FetchError::HttpStatus {
                status: response.status().as_u16(),
            })
        }
    }
}

/// Parse a 2xx response body. A page without results counts as a failure.
pub fn parse_search_response(body: &str) -> FetchResult<RemoteSearchResponse> {
    let response: RemoteSearchResponse = serde_json::from_str(body).map_err(FetchError::parse)?;
    if response.results.is_empty() {
        return Err(FetchError::EmptyResult);
    }
    log::info!(
        "Remote returned {} opportunities ({} total)",
        response.results.len(),
        response.count
    );
    Ok(response)
}
