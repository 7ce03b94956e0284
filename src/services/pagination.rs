// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Accumulation of result pages behind a "load more" trigger.

use crate::models::query::SortKey;
use crate::models::search::{ResultItem, SearchResultPage};
use std::cmp::Reverse;

/// Request lifecycle of the result list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageStatus {
    #[default]
    Idle,
    Loading,
    /// Last request failed; accumulated hits are still the ones before it
    Error(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pagination {
    hits: Vec<ResultItem>,
    page_index: u32,
    page_count: u32,
    status: PageStatus,
    sort: SortKey,
}

impl Pagination {
    pub fn new(sort: SortKey) -> Self {
        Self {
            sort,
            ..Self::default()
        }
    }

    pub fn hits(&self) -> &[ResultItem] {
        &self.hits
    }

    pub fn status(&self) -> &PageStatus {
        &self.status
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    /// Whether the backend reported pages after the last one received
    pub fn has_more(&self) -> bool {
        self.page_count > 0 && self.page_index < self.page_count - 1
    }

    /// Drop everything for a new query; the sort preference survives
    pub fn reset(&mut self) {
        *self = Self::new(self.sort);
    }

    pub fn begin(&mut self) {
        self.status = PageStatus::Loading;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = PageStatus::Error(message.into());
    }

    /// Append a page in backend order, then apply the user sort
    pub fn append(&mut self, page: SearchResultPage) {
        if page.page_index == 0 {
            self.hits.clear();
        }
        self.hits.extend(page.hits);
        self.page_index = page.page_index;
        self.page_count = page.page_count;
        self.status = PageStatus::Idle;
        self.apply_sort();
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
        self.apply_sort();
    }

    // `sort_by_key` is stable, so equal keys keep their arrival order
    fn apply_sort(&mut self) {
        match self.sort {
            SortKey::Relevance => {}
            SortKey::Date => self.hits.sort_by_key(|h| Reverse(h.created_at)),
            SortKey::Views => self.hits.sort_by_key(|h| Reverse(h.counts.views)),
            SortKey::Likes => self.hits.sort_by_key(|h| Reverse(h.counts.likes)),
            SortKey::Comments => self.hits.sort_by_key(|h| Reverse(h.counts.comments)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::search::ItemCounts;

    fn item(id: &str, views: u64) -> ResultItem {
        ResultItem {
            id: id.to_string(),
            title: format!("Post {id}"),
            author: "ada".to_string(),
            category: None,
            tags: vec![],
            created_at: None,
            counts: ItemCounts {
                views,
                likes: 0,
                comments: 0,
            },
            highlight: None,
        }
    }

    fn page(index: u32, count: u32, hits: Vec<ResultItem>) -> SearchResultPage {
        SearchResultPage {
            hits,
            page_index: index,
            page_count: count,
            ..SearchResultPage::default()
        }
    }

    fn ids(pagination: &Pagination) -> Vec<&str> {
        pagination.hits().iter().map(|h| h.id.as_str()).collect()
    }

    #[test]
    fn test_has_more_follows_page_count() {
        let mut pagination = Pagination::default();
        assert!(!pagination.has_more());

        pagination.append(page(0, 3, vec![item("a", 1)]));
        assert!(pagination.has_more());

        pagination.append(page(1, 3, vec![item("b", 1)]));
        assert!(pagination.has_more());

        pagination.append(page(2, 3, vec![item("c", 1)]));
        assert!(!pagination.has_more());
        assert_eq!(ids(&pagination), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_result_has_no_more() {
        let mut pagination = Pagination::default();
        pagination.append(page(0, 0, vec![]));
        assert!(!pagination.has_more());
    }

    #[test]
    fn test_first_page_replaces_hits() {
        let mut pagination = Pagination::default();
        pagination.append(page(0, 2, vec![item("a", 1)]));
        pagination.append(page(0, 1, vec![item("z", 1)]));
        assert_eq!(ids(&pagination), vec!["z"]);
    }

    #[test]
    fn test_failure_keeps_hits() {
        let mut pagination = Pagination::default();
        pagination.append(page(0, 2, vec![item("a", 1), item("b", 2)]));
        pagination.begin();
        pagination.fail("connection reset");

        assert_eq!(
            pagination.status(),
            &PageStatus::Error("connection reset".to_string())
        );
        assert_eq!(ids(&pagination), vec!["a", "b"]);
        assert!(pagination.has_more());
    }

    #[test]
    fn test_sort_is_stable_across_appends() {
        let mut pagination = Pagination::new(SortKey::Views);
        pagination.append(page(0, 2, vec![item("a", 5), item("b", 9), item("c", 5)]));
        assert_eq!(ids(&pagination), vec!["b", "a", "c"]);

        pagination.append(page(1, 2, vec![item("d", 5), item("e", 10)]));
        assert_eq!(ids(&pagination), vec!["e", "b", "a", "c", "d"]);

        pagination.set_sort(SortKey::Views);
        pagination.set_sort(SortKey::Views);
        assert_eq!(ids(&pagination), vec!["e", "b", "a", "c", "d"]);
    }

    #[test]
    fn test_reset_keeps_sort() {
        let mut pagination = Pagination::new(SortKey::Likes);
        pagination.append(page(0, 3, vec![item("a", 1)]));
        pagination.reset();

        assert!(pagination.hits().is_empty());
        assert!(!pagination.has_more());
        assert_eq!(pagination.sort(), SortKey::Likes);
        assert_eq!(pagination.status(), &PageStatus::Idle);
    }
}
