// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Translation of a [`SearchQuery`] into the query parameters of `GET /search`.

use crate::models::filter::FacetKind;
use crate::models::query::{SearchQuery, WireRequest};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Build the wire request for a query.
///
/// Pure and deterministic: equal queries yield byte-identical requests. Multi-value
/// filters become repeated keys, empty ones are left out entirely.
pub fn build_request(query: &SearchQuery) -> WireRequest {
    let mut wire = WireRequest::new();
    let filters = query.filters();

    wire.push("q", query.text().trim());
    wire.push("page", query.page().to_string());
    wire.push("hitsPerPage", query.page_size().to_string());

    for kind in FacetKind::ALL {
        for value in filters.values(kind) {
            wire.push(kind.wire_name(), value.as_str());
        }
    }

    if let Some(status) = &filters.status {
        wire.push("status", status.as_str());
    }
    if let Some(featured) = filters.is_featured {
        wire.push("isFeatured", featured.to_string());
    }
    if let Some(min_views) = filters.min_views {
        wire.push("minViews", min_views.to_string());
    }
    if let Some(range) = &filters.date_range {
        wire.push("dateStart", range.start().format(DATE_FORMAT).to_string());
        wire.push("dateEnd", range.end().format(DATE_FORMAT).to_string());
    }

    wire
}

/// Parameters of `GET /search/suggestions`
pub fn build_suggestions_request(text: &str, limit: usize) -> WireRequest {
    let mut wire = WireRequest::new();
    wire.push("q", text.trim());
    wire.push("limit", limit.to_string());
    wire
}

/// Parameters of `GET /search/popular`
pub fn build_popular_request(limit: usize) -> WireRequest {
    let mut wire = WireRequest::new();
    wire.push("limit", limit.to_string());
    wire
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::filter::{DateRange, FilterSet};
    use chrono::NaiveDate;

    #[test]
    fn test_build_request_is_deterministic() {
        let filters = FilterSet::new()
            .with(FacetKind::Tags, "rust")
            .with(FacetKind::Tags, "async")
            .with(FacetKind::Author, "ada");
        let query = SearchQuery::new("tokio", filters, 20);

        let first = build_request(&query).to_query_string();
        let second = build_request(&query.clone()).to_query_string();
        assert_eq!(first, second);
    }

    #[test]
    fn test_selection_order_does_not_change_request() {
        let a = FilterSet::new()
            .with(FacetKind::Tags, "rust")
            .with(FacetKind::Tags, "async");
        let b = FilterSet::new()
            .with(FacetKind::Tags, "async")
            .with(FacetKind::Tags, "rust");

        assert_eq!(
            build_request(&SearchQuery::new("x", a, 20)),
            build_request(&SearchQuery::new("x", b, 20))
        );
    }

    #[test]
    fn test_empty_filters_are_omitted() {
        let wire = build_request(&SearchQuery::new("react", FilterSet::new(), 20));

        assert_eq!(wire.to_query_string(), "q=react&page=0&hitsPerPage=20");
        assert!(wire.get("category").is_none());
        assert!(wire.get("status").is_none());
    }

    #[test]
    fn test_multi_value_filters_use_repeated_keys() {
        let filters = FilterSet::new()
            .with(FacetKind::Category, "technology")
            .with(FacetKind::Category, "design, ux");
        let wire = build_request(&SearchQuery::new("", filters, 20));

        assert_eq!(wire.get_all("category"), vec!["design, ux", "technology"]);
        assert!(wire
            .to_query_string()
            .contains("category=design%2C+ux&category=technology"));
    }

    #[test]
    fn test_scalar_filters_are_encoded() {
        let mut filters = FilterSet::new();
        filters.set_status(Some("published"));
        filters.is_featured = Some(true);
        filters.min_views = Some(500);
        filters.date_range = Some(
            DateRange::new(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
            )
            .unwrap(),
        );
        let wire = build_request(&SearchQuery::new(" hooks ", filters, 10).next_page());

        assert_eq!(wire.get("q"), Some("hooks"));
        assert_eq!(wire.get("page"), Some("1"));
        assert_eq!(wire.get("hitsPerPage"), Some("10"));
        assert_eq!(wire.get("status"), Some("published"));
        assert_eq!(wire.get("isFeatured"), Some("true"));
        assert_eq!(wire.get("minViews"), Some("500"));
        assert_eq!(wire.get("dateStart"), Some("2024-01-01"));
        assert_eq!(wire.get("dateEnd"), Some("2024-06-30"));
    }

    #[test]
    fn test_suggestions_request() {
        let wire = build_suggestions_request("  rea ", 5);
        assert_eq!(wire.to_query_string(), "q=rea&limit=5");
        assert_eq!(build_popular_request(8).to_query_string(), "limit=8");
    }
}
