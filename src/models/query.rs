// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::filter::FilterSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default number of hits requested per page
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// A fully specified search request as the user intends it.
///
/// Built fresh on every input change and never mutated after dispatch; asking for the
/// next page produces a new value through [`SearchQuery::next_page`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchQuery {
    text: String,
    filters: FilterSet,
    page: u32,
    page_size: u32,
}

impl SearchQuery {
    /// Build a first-page query. Text is trimmed and a zero page size falls back to
    /// [`DEFAULT_PAGE_SIZE`].
    pub fn new(text: &str, filters: FilterSet, page_size: u32) -> Self {
        Self {
            text: text.trim().to_string(),
            filters,
            page: 0,
            page_size: if page_size == 0 {
                DEFAULT_PAGE_SIZE
            } else {
                page_size
            },
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// An empty text is only sent when some filter narrows the results
    pub fn is_dispatchable(&self) -> bool {
        !self.text.is_empty() || self.filters.is_active()
    }

    pub fn next_page(&self) -> Self {
        Self {
            page: self.page + 1,
            ..self.clone()
        }
    }
}

/// Client-side ordering applied over the accumulated hits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Keep the backend ranking
    #[default]
    Relevance,
    Date,
    Views,
    Likes,
    Comments,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "relevance" => Ok(SortKey::Relevance),
            "date" => Ok(SortKey::Date),
            "views" => Ok(SortKey::Views),
            "likes" => Ok(SortKey::Likes),
            "comments" => Ok(SortKey::Comments),
            other => Err(format!(
                "sort key must be one of relevance, date, views, likes, comments; got: {other}"
            )),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortKey::Relevance => "relevance",
            SortKey::Date => "date",
            SortKey::Views => "views",
            SortKey::Likes => "likes",
            SortKey::Comments => "comments",
        };
        f.write_str(name)
    }
}

/// Ordered key/value pairs sent as the query string of `GET /search`.
///
/// Keys may repeat (one pair per selected multi-value filter).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct WireRequest {
    params: Vec<(String, String)>,
}

impl WireRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &str, value: impl Into<String>) {
        self.params.push((key.to_string(), value.into()));
    }

    /// First value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value for a repeated `key`, in insertion order
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.params
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Form-urlencoded query string
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter())
            .finish()
    }
}
