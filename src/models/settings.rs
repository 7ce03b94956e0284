// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::error::{SearchError, SearchResult};
use crate::models::query::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default settle delay before a typed query is sent
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Default upper bound for a single backend call
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum number of options shown per facet group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetLimits {
    pub category: usize,
    pub tags: usize,
    pub author: usize,
}

impl Default for FacetLimits {
    fn default() -> Self {
        Self {
            category: 10,
            tags: 20,
            author: 10,
        }
    }
}

/// Everything a search surface needs to talk to the backend.
///
/// Passed explicitly to every client; there is no process-wide configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Base URL of the blog API, e.g. `http://localhost:5000/api`
    pub base_url: String,
    pub debounce: Duration,
    pub request_timeout: Duration,
    pub page_size: u32,
    pub facet_limits: FacetLimits,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000/api".to_string(),
            debounce: DEFAULT_DEBOUNCE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            page_size: DEFAULT_PAGE_SIZE,
            facet_limits: FacetLimits::default(),
        }
    }
}

impl ClientSettings {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Reject values that would make the client useless
    pub fn validate(&self) -> SearchResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(SearchError::InvalidSetting(
                "base URL must not be empty".to_string(),
            ));
        }
        if self.page_size == 0 || self.page_size > 1000 {
            return Err(SearchError::InvalidSetting(format!(
                "page size must be between 1 and 1000, got: {}",
                self.page_size
            )));
        }
        if self.request_timeout.is_zero() {
            return Err(SearchError::InvalidSetting(
                "request timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = ClientSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.debounce, Duration::from_millis(300));
        assert_eq!(settings.request_timeout, Duration::from_secs(10));
        assert_eq!(settings.facet_limits.tags, 20);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let settings = ClientSettings {
            page_size: 0,
            ..ClientSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SearchError::InvalidSetting(_))
        ));
    }

    #[test]
    fn test_blank_base_url_rejected() {
        let settings = ClientSettings::default().with_base_url("  ");
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let settings = ClientSettings {
            request_timeout: Duration::ZERO,
            ..ClientSettings::default()
        };
        assert!(settings.validate().is_err());
    }
}
