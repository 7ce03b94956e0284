// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Best-effort interaction tracking.
//!
//! Tracking must never hold up or fail the action being tracked: every call is spawned,
//! bounded by a timeout, and any error is logged and dropped.

use crate::error::{SearchError, SearchResult};
use crate::models::analytics::{AnalyticsEvent, EventType};
use crate::services::backend::AnalyticsTransport;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Transport for search surfaces that do not track anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAnalytics;

impl AnalyticsTransport for NoAnalytics {
    async fn send(&self, _event: &AnalyticsEvent) -> SearchResult<()> {
        Ok(())
    }
}

pub struct AnalyticsEmitter<T> {
    transport: Arc<T>,
    timeout: Duration,
}

impl<T> Clone for AnalyticsEmitter<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            timeout: self.timeout,
        }
    }
}

impl<T: AnalyticsTransport> AnalyticsEmitter<T> {
    pub fn new(transport: Arc<T>, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    /// Fire a tracking call in the background.
    ///
    /// The returned handle may be dropped; it only exists so callers (and tests) can
    /// wait for delivery. It always resolves without error.
    pub fn track(&self, event_type: EventType, metadata: Map<String, Value>) -> JoinHandle<()> {
        let event = AnalyticsEvent::new(&event_type, metadata);
        let transport = self.transport.clone();
        let timeout = self.timeout;

        tokio::spawn(async move {
            let outcome = match tokio::time::timeout(timeout, transport.send(&event)).await {
                Ok(result) => result,
                Err(_) => Err(SearchError::Timeout(timeout)),
            };
            match outcome {
                Ok(()) => debug!(event = %event.event_type, "Analytics event delivered"),
                Err(e) => warn!(event = %event.event_type, error = %e, "Dropping analytics event"),
            }
        })
    }

    pub fn page_view(&self, path: &str) -> JoinHandle<()> {
        let mut metadata = Map::new();
        metadata.insert("path".to_string(), Value::from(path));
        self.track(EventType::PageView, metadata)
    }

    pub fn item_viewed(&self, item_id: &str) -> JoinHandle<()> {
        let mut metadata = Map::new();
        metadata.insert("postId".to_string(), Value::from(item_id));
        self.track(EventType::ItemViewed, metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingTransport {
        fail: bool,
        hang: bool,
        sent: Mutex<Vec<AnalyticsEvent>>,
    }

    impl AnalyticsTransport for RecordingTransport {
        async fn send(&self, event: &AnalyticsEvent) -> SearchResult<()> {
            self.sent.lock().unwrap().push(event.clone());
            if self.hang {
                std::future::pending::<()>().await;
            }
            if self.fail {
                return Err(SearchError::Backend("analytics down".to_string()));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_track_delivers_event() {
        let transport = Arc::new(RecordingTransport::default());
        let emitter = AnalyticsEmitter::new(transport.clone(), Duration::from_secs(1));

        emitter.item_viewed("p42").await.unwrap();

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].event_type, "item_viewed");
        assert_eq!(sent[0].metadata["postId"], json!("p42"));
    }

    #[tokio::test]
    async fn test_failure_is_swallowed() {
        let transport = Arc::new(RecordingTransport {
            fail: true,
            ..RecordingTransport::default()
        });
        let emitter = AnalyticsEmitter::new(transport.clone(), Duration::from_secs(1));

        let handle = emitter.page_view("/search");
        assert!(handle.await.is_ok());
        assert_eq!(transport.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_transport_times_out() {
        let transport = Arc::new(RecordingTransport {
            hang: true,
            ..RecordingTransport::default()
        });
        let emitter = AnalyticsEmitter::new(transport, Duration::from_secs(5));

        let handle = emitter.track(EventType::Custom("share".to_string()), Map::new());
        assert!(handle.await.is_ok());
    }
}
