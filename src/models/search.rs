// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Facet name -> (facet value -> number of matching documents)
pub type FacetMap = BTreeMap<String, BTreeMap<String, u64>>;

/// Engagement counters of a post
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCounts {
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
}

/// Backend-supplied highlight markup for a hit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightMarkup {
    pub title: Option<String>,
    pub snippet: Option<String>,
}

/// A single post returned by the search backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultItem {
    pub id: String,
    pub title: String,
    pub author: String,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub counts: ItemCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<HighlightMarkup>,
}

/// One completed backend page. Never mutated once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultPage {
    pub hits: Vec<ResultItem>,
    pub facets: FacetMap,
    pub total_hits: u64,
    pub page_index: u32,
    pub page_count: u32,
    pub processing_time_ms: u64,
}

// ---------------------------------------------------------------------------
// Wire format of `GET /search`
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawSearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    hits: Vec<RawHit>,
    #[serde(default, deserialize_with = "null_as_default")]
    facets: FacetMap,
    #[serde(default)]
    page: u32,
    #[serde(default)]
    nb_pages: u32,
    #[serde(default)]
    nb_hits: u64,
    #[serde(default, rename = "processingTimeMS")]
    processing_time_ms: u64,
}

#[derive(Debug, Deserialize)]
struct MarkupValue {
    value: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawHighlightFields {
    title: Option<MarkupValue>,
    content: Option<MarkupValue>,
}

/// Author is either a display name or an embedded user document
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawAuthor {
    Name(String),
    Document {
        name: Option<String>,
        username: Option<String>,
    },
}

impl RawAuthor {
    fn into_name(self) -> String {
        match self {
            RawAuthor::Name(name) => name,
            RawAuthor::Document { name, username } => name.or(username).unwrap_or_default(),
        }
    }
}

/// Explicit `null` decodes like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Documents pushed from different stores carry their id and counters under
/// different names, sometimes several at once, so each spelling is its own field.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHit {
    #[serde(rename = "objectID")]
    object_id: Option<String>,
    #[serde(rename = "_id")]
    mongo_id: Option<String>,
    id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    title: String,
    author: Option<RawAuthor>,
    category: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    tags: Vec<String>,
    created_at: Option<DateTime<Utc>>,
    views: Option<u64>,
    view_count: Option<u64>,
    likes: Option<u64>,
    likes_count: Option<u64>,
    comments: Option<u64>,
    comments_count: Option<u64>,
    #[serde(rename = "_highlightResult")]
    highlight_result: Option<RawHighlightFields>,
    #[serde(rename = "_snippetResult")]
    snippet_result: Option<RawHighlightFields>,
}

impl From<RawHit> for ResultItem {
    fn from(raw: RawHit) -> Self {
        let highlight_result = raw.highlight_result.unwrap_or_default();
        let snippet = raw
            .snippet_result
            .and_then(|s| s.content)
            .or(highlight_result.content)
            .map(|m| m.value);
        let title = highlight_result.title.map(|m| m.value);
        let highlight = if title.is_some() || snippet.is_some() {
            Some(HighlightMarkup { title, snippet })
        } else {
            None
        };

        ResultItem {
            id: raw
                .object_id
                .or(raw.mongo_id)
                .or(raw.id)
                .unwrap_or_default(),
            title: raw.title,
            author: raw.author.map(RawAuthor::into_name).unwrap_or_default(),
            category: raw.category,
            tags: raw.tags,
            created_at: raw.created_at,
            counts: ItemCounts {
                views: raw.views.or(raw.view_count).unwrap_or_default(),
                likes: raw.likes.or(raw.likes_count).unwrap_or_default(),
                comments: raw.comments.or(raw.comments_count).unwrap_or_default(),
            },
            highlight,
        }
    }
}

impl From<RawSearchResponse> for SearchResultPage {
    fn from(raw: RawSearchResponse) -> Self {
        SearchResultPage {
            hits: raw.hits.into_iter().map(ResultItem::from).collect(),
            facets: raw.facets,
            total_hits: raw.nb_hits,
            page_index: raw.page,
            page_count: raw.nb_pages,
            processing_time_ms: raw.processing_time_ms,
        }
    }
}

// ---------------------------------------------------------------------------
// Wire formats of `GET /search/suggestions` and `GET /search/popular`
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSuggestion {
    Text(String),
    Titled { title: String },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawSuggestions {
    List(Vec<RawSuggestion>),
    Wrapped { suggestions: Vec<RawSuggestion> },
}

impl RawSuggestions {
    pub(crate) fn into_titles(self) -> Vec<String> {
        let entries = match self {
            RawSuggestions::List(entries) | RawSuggestions::Wrapped { suggestions: entries } => {
                entries
            }
        };
        entries
            .into_iter()
            .map(|entry| match entry {
                RawSuggestion::Text(title) | RawSuggestion::Titled { title } => title,
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPopularQuery {
    Text(String),
    Counted { query: String },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawPopularQueries {
    List(Vec<RawPopularQuery>),
    Wrapped { queries: Vec<RawPopularQuery> },
}

impl RawPopularQueries {
    pub(crate) fn into_queries(self) -> Vec<String> {
        let entries = match self {
            RawPopularQueries::List(entries) | RawPopularQueries::Wrapped { queries: entries } => {
                entries
            }
        };
        entries
            .into_iter()
            .map(|entry| match entry {
                RawPopularQuery::Text(query) | RawPopularQuery::Counted { query } => query,
            })
            .collect()
    }
}
