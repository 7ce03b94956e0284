// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Error type shared by the search client, the HTTP backend and the settings loader.

use std::time::Duration;

/// Result type for search operations
pub type SearchResult<T> = std::result::Result<T, SearchError>;

/// Errors that can occur while talking to the search or analytics backend
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Transport-level failure (connection refused, TLS, reset, ...)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("Backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body was not the JSON we expected
    #[error("Failed to decode backend response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Request did not complete within the configured timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid backend URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    /// Catch-all for backends that are not HTTP (used by in-process fakes)
    #[error("Backend error: {0}")]
    Backend(String),
}
