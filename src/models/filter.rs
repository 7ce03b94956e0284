// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::error::{SearchError, SearchResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Multi-value filter dimensions that are also reported back as facets
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacetKind {
    Category,
    Tags,
    Author,
}

impl FacetKind {
    /// All kinds in the order they appear in requests and in the facet panel
    pub const ALL: [FacetKind; 3] = [FacetKind::Category, FacetKind::Tags, FacetKind::Author];

    /// Name used both as the repeated query key and as the facet name in responses
    pub fn wire_name(&self) -> &'static str {
        match self {
            FacetKind::Category => "category",
            FacetKind::Tags => "tags",
            FacetKind::Author => "author",
        }
    }
}

impl fmt::Display for FacetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Inclusive publication date window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> SearchResult<Self> {
        if start > end {
            return Err(SearchError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

/// Structured filters applied on top of the free-text query.
///
/// Multi-value dimensions are kept in ordered sets so that two filter sets with the
/// same selections always encode to the same request, whatever the click order was.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterSet {
    pub category: BTreeSet<String>,
    pub tags: BTreeSet<String>,
    pub author: BTreeSet<String>,
    pub status: Option<String>,
    pub is_featured: Option<bool>,
    pub min_views: Option<u64>,
    pub date_range: Option<DateRange>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected values for a facet dimension
    pub fn values(&self, kind: FacetKind) -> &BTreeSet<String> {
        match kind {
            FacetKind::Category => &self.category,
            FacetKind::Tags => &self.tags,
            FacetKind::Author => &self.author,
        }
    }

    fn values_mut(&mut self, kind: FacetKind) -> &mut BTreeSet<String> {
        match kind {
            FacetKind::Category => &mut self.category,
            FacetKind::Tags => &mut self.tags,
            FacetKind::Author => &mut self.author,
        }
    }

    pub fn is_selected(&self, kind: FacetKind, value: &str) -> bool {
        self.values(kind).contains(value.trim())
    }

    /// Add the value if absent, remove it if present.
    /// Returns whether the value is selected afterwards. Blank values are ignored.
    pub fn toggle(&mut self, kind: FacetKind, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }
        let values = self.values_mut(kind);
        if values.remove(value) {
            false
        } else {
            values.insert(value.to_string());
            true
        }
    }

    /// Builder-style selection, used mostly by the CLI and tests
    pub fn with(mut self, kind: FacetKind, value: &str) -> Self {
        if !self.is_selected(kind, value) {
            self.toggle(kind, value);
        }
        self
    }

    pub fn set_status(&mut self, status: Option<&str>) {
        self.status = status
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
    }

    /// True when at least one filter constrains the result set
    pub fn is_active(&self) -> bool {
        !self.category.is_empty()
            || !self.tags.is_empty()
            || !self.author.is_empty()
            || self.status.is_some()
            || self.is_featured.is_some()
            || self.min_views.is_some()
            || self.date_range.is_some()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_twice_restores_empty_category() {
        let mut filters = FilterSet::new();
        assert!(filters.toggle(FacetKind::Category, "technology"));
        assert!(filters.is_selected(FacetKind::Category, "technology"));

        assert!(!filters.toggle(FacetKind::Category, "technology"));
        assert!(filters.category.is_empty());
        assert_eq!(filters, FilterSet::new());
    }

    #[test]
    fn test_toggle_never_duplicates() {
        let filters = FilterSet::new()
            .with(FacetKind::Tags, "rust")
            .with(FacetKind::Tags, "rust")
            .with(FacetKind::Tags, " rust ");
        assert_eq!(filters.tags.len(), 1);
    }

    #[test]
    fn test_toggle_ignores_blank_values() {
        let mut filters = FilterSet::new();
        assert!(!filters.toggle(FacetKind::Author, "   "));
        assert!(!filters.is_active());
    }

    #[test]
    fn test_is_active_for_scalar_filters() {
        let mut filters = FilterSet::new();
        assert!(!filters.is_active());

        filters.min_views = Some(100);
        assert!(filters.is_active());

        filters.clear();
        filters.set_status(Some("published"));
        assert!(filters.is_active());

        filters.set_status(Some("  "));
        assert!(!filters.is_active());
    }

    #[test]
    fn test_date_range_rejects_inverted_bounds() {
        let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();

        assert!(matches!(
            DateRange::new(start, end),
            Err(SearchError::InvalidDateRange { .. })
        ));
        assert!(DateRange::new(end, start).is_ok());
        assert!(DateRange::new(start, start).is_ok());
    }

    #[test]
    fn test_facet_kind_wire_names() {
        assert_eq!(FacetKind::Category.to_string(), "category");
        assert_eq!(FacetKind::Tags.to_string(), "tags");
        assert_eq!(FacetKind::Author.to_string(), "author");
    }
}
