// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::error::{SearchError, SearchResult};
use crate::models::analytics::AnalyticsEvent;
use crate::models::query::WireRequest;
use crate::models::search::{
    RawPopularQueries, RawSearchResponse, RawSuggestions, SearchResultPage,
};
use crate::models::settings::ClientSettings;
use crate::services::query_builder::{build_popular_request, build_suggestions_request};
use crate::VERSION;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use std::future::Future;
use tracing::debug;
use url::Url;

/// Read side of the hosted search service
pub trait SearchBackend: Send + Sync + 'static {
    /// `GET /search`
    fn search(
        &self,
        request: &WireRequest,
    ) -> impl Future<Output = SearchResult<SearchResultPage>> + Send;

    /// `GET /search/suggestions`, ranked post titles for autocomplete
    fn suggestions(
        &self,
        text: &str,
        limit: usize,
    ) -> impl Future<Output = SearchResult<Vec<String>>> + Send;

    /// `GET /search/popular`
    fn popular(&self, limit: usize) -> impl Future<Output = SearchResult<Vec<String>>> + Send;
}

/// Sink for fire-and-forget tracking calls
pub trait AnalyticsTransport: Send + Sync + 'static {
    /// `POST /analytics/track`
    fn send(&self, event: &AnalyticsEvent) -> impl Future<Output = SearchResult<()>> + Send;
}

/// reqwest-based client for the blog API
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpBackend {
    /// Create a new client for the API rooted at `settings.base_url`
    pub fn new(settings: &ClientSettings) -> SearchResult<Self> {
        settings.validate()?;

        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .user_agent(format!("blog-search/{VERSION}"))
            .build()?;

        let base_url = normalize_base_url(&settings.base_url)?;
        debug!(base_url = %base_url, "Created search backend client");

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str, params: &WireRequest) -> SearchResult<Url> {
        let mut url = self.base_url.join(path)?;
        let query = params.to_query_string();
        if !query.is_empty() {
            url.set_query(Some(&query));
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, params: &WireRequest) -> SearchResult<T> {
        let url = self.endpoint(path, params)?;
        let response = self.client.get(url).send().await?;
        let body = read_success_body(response).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Accept `host:port` as well as full URLs, and make sure relative joins keep the
/// base path (`http://h/api` + `search` must give `http://h/api/search`).
pub fn normalize_base_url(host: &str) -> SearchResult<Url> {
    let host = host.trim();
    let mut url = if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{}", host)
    };
    if !url.ends_with('/') {
        url.push('/');
    }
    Ok(Url::parse(&url)?)
}

async fn read_success_body(response: reqwest::Response) -> SearchResult<Vec<u8>> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SearchError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.bytes().await?.to_vec())
}

impl SearchBackend for HttpBackend {
    async fn search(&self, request: &WireRequest) -> SearchResult<SearchResultPage> {
        let raw: RawSearchResponse = self.get_json("search", request).await?;
        Ok(raw.into())
    }

    async fn suggestions(&self, text: &str, limit: usize) -> SearchResult<Vec<String>> {
        let params = build_suggestions_request(text, limit);
        let raw: RawSuggestions = self.get_json("search/suggestions", &params).await?;
        Ok(raw.into_titles())
    }

    async fn popular(&self, limit: usize) -> SearchResult<Vec<String>> {
        let params = build_popular_request(limit);
        let raw: RawPopularQueries = self.get_json("search/popular", &params).await?;
        Ok(raw.into_queries())
    }
}

impl AnalyticsTransport for HttpBackend {
    async fn send(&self, event: &AnalyticsEvent) -> SearchResult<()> {
        let url = self.base_url.join("analytics/track")?;
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(event)?)
            .send()
            .await?;
        read_success_body(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_adds_scheme_and_slash() {
        let url = normalize_base_url("localhost:5000").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/");
    }

    #[test]
    fn test_normalize_keeps_base_path() {
        let url = normalize_base_url("https://blog.example.com/api").unwrap();
        assert_eq!(
            url.join("search/suggestions").unwrap().as_str(),
            "https://blog.example.com/api/search/suggestions"
        );
    }

    #[test]
    fn test_endpoint_appends_query() {
        let backend =
            HttpBackend::new(&ClientSettings::default().with_base_url("http://h:1/api")).unwrap();
        let mut params = WireRequest::new();
        params.push("q", "rust lang");
        params.push("tags", "a");
        params.push("tags", "b");

        let url = backend.endpoint("search", &params).unwrap();
        assert_eq!(url.as_str(), "http://h:1/api/search?q=rust+lang&tags=a&tags=b");
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = ClientSettings {
            page_size: 0,
            ..ClientSettings::default()
        };
        assert!(HttpBackend::new(&settings).is_err());
    }
}
