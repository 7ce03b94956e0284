// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of interaction being tracked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventType {
    PageView,
    SearchPerformed,
    ItemViewed,
    Custom(String),
}

impl EventType {
    pub fn as_str(&self) -> &str {
        match self {
            EventType::PageView => "page_view",
            EventType::SearchPerformed => "search_performed",
            EventType::ItemViewed => "item_viewed",
            EventType::Custom(name) => name,
        }
    }

    pub fn parse(name: &str) -> Self {
        match name {
            "page_view" => EventType::PageView,
            "search_performed" => EventType::SearchPerformed,
            "item_viewed" => EventType::ItemViewed,
            other => EventType::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /analytics/track`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl AnalyticsEvent {
    pub fn new(event_type: &EventType, metadata: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            event_type: event_type.to_string(),
            metadata,
        }
    }
}
