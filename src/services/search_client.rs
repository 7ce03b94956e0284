// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Debounced, race-free incremental search over a [`SearchBackend`].
//!
//! Every dispatched request gets a fresh [`RequestToken`]. A response is applied only if
//! its token is still the one in flight, so replies are applied in the order the user
//! asked for them rather than the order the network delivers them. Cancellation is
//! logical on both ends: a superseded debounce timer wakes up and does nothing, and a
//! superseded request runs to completion but its reply is dropped.

use crate::error::{SearchError, SearchResult};
use crate::models::analytics::EventType;
use crate::models::filter::{FacetKind, FilterSet};
use crate::models::query::{SearchQuery, SortKey};
use crate::models::search::{FacetMap, ResultItem, SearchResultPage};
use crate::models::settings::ClientSettings;
use crate::services::analytics::{AnalyticsEmitter, NoAnalytics};
use crate::services::backend::{AnalyticsTransport, SearchBackend};
use crate::services::facets::{FacetAggregator, FacetPanel};
use crate::services::logging::redact_query;
use crate::services::pagination::{PageStatus, Pagination};
use crate::services::query_builder::build_request;
use serde_json::{Map, Value};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Identifies one dispatched backend request
pub type RequestToken = u64;

/// Mutable state of one search surface
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientSearchState {
    current_query: Option<SearchQuery>,
    pagination: Pagination,
    facets: FacetMap,
    total_hits: u64,
    processing_time_ms: u64,
    in_flight: Option<RequestToken>,
    last_token: RequestToken,
    debounce_generation: u64,
    pending: bool,
}

impl ClientSearchState {
    /// Latest query the user asked for (the last applied page for load-more)
    pub fn current_query(&self) -> Option<&SearchQuery> {
        self.current_query.as_ref()
    }

    pub fn filters(&self) -> FilterSet {
        self.current_query
            .as_ref()
            .map(|q| q.filters().clone())
            .unwrap_or_default()
    }

    pub fn hits(&self) -> &[ResultItem] {
        self.pagination.hits()
    }

    pub fn facets(&self) -> &FacetMap {
        &self.facets
    }

    pub fn total_hits(&self) -> u64 {
        self.total_hits
    }

    pub fn processing_time_ms(&self) -> u64 {
        self.processing_time_ms
    }

    pub fn has_more(&self) -> bool {
        self.pagination.has_more()
    }

    pub fn status(&self) -> &PageStatus {
        self.pagination.status()
    }

    pub fn sort(&self) -> SortKey {
        self.pagination.sort()
    }

    pub fn in_flight(&self) -> Option<RequestToken> {
        self.in_flight
    }

    /// A debounce timer is armed or a request is outstanding
    pub fn is_busy(&self) -> bool {
        self.pending || self.in_flight.is_some()
    }

    fn begin_request(&mut self) -> RequestToken {
        self.last_token += 1;
        self.in_flight = Some(self.last_token);
        self.pagination.begin();
        self.last_token
    }
}

struct Inner<B, A> {
    backend: Arc<B>,
    settings: ClientSettings,
    aggregator: FacetAggregator,
    analytics: Option<AnalyticsEmitter<A>>,
    state: watch::Sender<ClientSearchState>,
}

/// Search client owning the state of a single search surface.
///
/// Cheap to clone; clones share the same state. Methods that schedule work spawn onto
/// the current Tokio runtime and must be called from within one.
pub struct SearchClient<B, A = NoAnalytics> {
    inner: Arc<Inner<B, A>>,
}

impl<B, A> Clone for SearchClient<B, A> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<B: SearchBackend> SearchClient<B> {
    pub fn new(backend: Arc<B>, settings: ClientSettings) -> Self {
        Self::build(backend, settings, None)
    }
}

impl<B: SearchBackend, A: AnalyticsTransport> SearchClient<B, A> {
    /// Create a client that reports every completed search to `analytics`
    pub fn with_analytics(
        backend: Arc<B>,
        settings: ClientSettings,
        analytics: AnalyticsEmitter<A>,
    ) -> Self {
        Self::build(backend, settings, Some(analytics))
    }

    fn build(
        backend: Arc<B>,
        settings: ClientSettings,
        analytics: Option<AnalyticsEmitter<A>>,
    ) -> Self {
        let (state, _) = watch::channel(ClientSearchState::default());
        Self {
            inner: Arc::new(Inner {
                backend,
                aggregator: FacetAggregator::new(settings.facet_limits),
                settings,
                analytics,
                state,
            }),
        }
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> ClientSearchState {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified after every applied state change
    pub fn subscribe(&self) -> watch::Receiver<ClientSearchState> {
        self.inner.state.subscribe()
    }

    /// Resolve once no debounce timer is armed and no request is in flight
    pub async fn wait_idle(&self) {
        let mut rx = self.subscribe();
        // The sender lives as long as `self`, so this cannot observe a closed channel
        let _ = rx.wait_for(|state| !state.is_busy()).await;
    }

    /// Text or filters changed: start over from page 0 and search once input settles.
    ///
    /// Anything in flight becomes stale immediately. Facet counts stay until the next
    /// response replaces them. A query with neither text nor filters just clears the
    /// results and the facets.
    pub fn on_query_changed(&self, text: &str, filters: FilterSet) {
        let query = SearchQuery::new(text, filters, self.inner.settings.page_size);
        let dispatchable = query.is_dispatchable();
        let mut generation = 0;

        self.inner.state.send_modify(|state| {
            state.debounce_generation += 1;
            generation = state.debounce_generation;
            state.in_flight = None;
            state.pagination.reset();
            state.total_hits = 0;
            state.processing_time_ms = 0;
            state.pending = dispatchable;
            state.current_query = Some(query);
            // Nothing will replace the old counts, so they go now
            if !dispatchable {
                state.facets.clear();
            }
        });

        if !dispatchable {
            debug!("Query has neither text nor filters, not searching");
            return;
        }

        let client = self.clone();
        let delay = self.inner.settings.debounce;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            client.fire_debounced(generation);
        });
    }

    /// Toggle a facet value on the current query and search again
    pub fn toggle_filter(&self, kind: FacetKind, value: &str) {
        let (text, mut filters) = {
            let state = self.inner.state.borrow();
            let text = state
                .current_query
                .as_ref()
                .map(|q| q.text().to_string())
                .unwrap_or_default();
            (text, state.filters())
        };
        filters.toggle(kind, value);
        self.on_query_changed(&text, filters);
    }

    /// Fetch the page after the last one received and append it.
    ///
    /// Returns false, leaving state untouched, when there is nothing more to load or a
    /// request is already outstanding.
    pub fn load_more(&self) -> bool {
        let mut dispatch = None;
        self.inner.state.send_if_modified(|state| {
            if state.is_busy() || !state.pagination.has_more() {
                return false;
            }
            let Some(next) = state.current_query.as_ref().map(SearchQuery::next_page) else {
                return false;
            };
            dispatch = Some((state.begin_request(), next));
            true
        });

        match dispatch {
            Some((token, query)) => {
                self.spawn_request(token, query);
                true
            }
            None => false,
        }
    }

    /// Re-sort the accumulated hits and keep that order for later pages
    pub fn set_sort(&self, sort: SortKey) {
        self.inner
            .state
            .send_modify(|state| state.pagination.set_sort(sort));
    }

    /// Facet options for the latest response, with the current selections marked
    pub fn facet_panel(&self) -> FacetPanel {
        let state = self.inner.state.borrow();
        self.inner
            .aggregator
            .aggregate(&state.facets, &state.filters())
    }

    /// Title suggestions for autocomplete; blank input never reaches the backend
    pub async fn suggestions(&self, text: &str, limit: usize) -> SearchResult<Vec<String>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.with_timeout(self.inner.backend.suggestions(text.trim(), limit))
            .await
    }

    pub async fn popular(&self, limit: usize) -> SearchResult<Vec<String>> {
        self.with_timeout(self.inner.backend.popular(limit)).await
    }

    async fn with_timeout<T>(&self, call: impl Future<Output = SearchResult<T>>) -> SearchResult<T> {
        let timeout = self.inner.settings.request_timeout;
        match tokio::time::timeout(timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(SearchError::Timeout(timeout)),
        }
    }

    fn fire_debounced(&self, generation: u64) {
        let mut dispatch = None;
        self.inner.state.send_if_modified(|state| {
            if state.debounce_generation != generation {
                return false;
            }
            state.pending = false;
            if let Some(query) = state.current_query.clone() {
                dispatch = Some((state.begin_request(), query));
            }
            true
        });

        if let Some((token, query)) = dispatch {
            self.spawn_request(token, query);
        }
    }

    fn spawn_request(&self, token: RequestToken, query: SearchQuery) {
        let client = self.clone();
        tokio::spawn(async move {
            let wire = build_request(&query);
            debug!(
                token,
                query = %redact_query(query.text()),
                page = query.page(),
                "Dispatching search"
            );
            let outcome = client.with_timeout(client.inner.backend.search(&wire)).await;
            client.apply_response(token, query, outcome);
        });
    }

    fn apply_response(
        &self,
        token: RequestToken,
        query: SearchQuery,
        outcome: SearchResult<SearchResultPage>,
    ) {
        let summary = outcome
            .as_ref()
            .ok()
            .map(|page| (page.total_hits, page.processing_time_ms));
        let failure = outcome.as_ref().err().map(ToString::to_string);
        let first_page = query.page() == 0;
        let tracked = query.clone();

        let applied = self.inner.state.send_if_modified(|state| {
            if state.in_flight != Some(token) {
                return false;
            }
            state.in_flight = None;
            match outcome {
                Ok(page) => {
                    state.total_hits = page.total_hits;
                    state.processing_time_ms = page.processing_time_ms;
                    state.facets = page.facets.clone();
                    state.current_query = Some(query);
                    state.pagination.append(page);
                }
                Err(e) => state.pagination.fail(e.to_string()),
            }
            true
        });

        if !applied {
            debug!(token, "Discarding stale search response");
            return;
        }
        if let Some(message) = failure {
            warn!(token, error = %message, "Search request failed");
        } else if let Some((total_hits, processing_time_ms)) = summary {
            debug!(token, total_hits, processing_time_ms, "Applied search results");
            if first_page {
                self.track_search(&tracked, total_hits, processing_time_ms);
            }
        }
    }

    fn track_search(&self, query: &SearchQuery, total_hits: u64, processing_time_ms: u64) {
        let Some(analytics) = &self.inner.analytics else {
            return;
        };
        let mut metadata = Map::new();
        metadata.insert("query".to_string(), Value::from(query.text()));
        metadata.insert("totalHits".to_string(), Value::from(total_hits));
        metadata.insert(
            "processingTimeMs".to_string(),
            Value::from(processing_time_ms),
        );
        metadata.insert("filtered".to_string(), Value::from(query.filters().is_active()));
        analytics.track(EventType::SearchPerformed, metadata);
    }
}
