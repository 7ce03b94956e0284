// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Turns backend facet counts into a bounded, render-ready filter panel.

use crate::models::filter::{FacetKind, FilterSet};
use crate::models::search::FacetMap;
use crate::models::settings::FacetLimits;
use serde::Serialize;
use std::cmp::Reverse;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetOption {
    pub value: String,
    pub count: u64,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetGroup {
    pub kind: FacetKind,
    pub options: Vec<FacetOption>,
}

impl FacetGroup {
    pub fn option(&self, value: &str) -> Option<&FacetOption> {
        self.options.iter().find(|o| o.value == value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacetPanel {
    pub groups: Vec<FacetGroup>,
}

impl FacetPanel {
    pub fn group(&self, kind: FacetKind) -> Option<&FacetGroup> {
        self.groups.iter().find(|g| g.kind == kind)
    }
}

pub struct FacetAggregator {
    limits: FacetLimits,
}

impl FacetAggregator {
    pub fn new(limits: FacetLimits) -> Self {
        Self { limits }
    }

    fn limit(&self, kind: FacetKind) -> usize {
        match kind {
            FacetKind::Category => self.limits.category,
            FacetKind::Tags => self.limits.tags,
            FacetKind::Author => self.limits.author,
        }
    }

    /// Build the panel for the latest facet counts.
    ///
    /// Options are ordered by descending count, ties by value, then cut to the group
    /// limit. Selected values that the response no longer lists (or that fell below the
    /// cut) are appended with their known count, or 0, so they stay visible and can be
    /// deselected.
    pub fn aggregate(&self, facets: &FacetMap, selected: &FilterSet) -> FacetPanel {
        let groups = FacetKind::ALL
            .into_iter()
            .map(|kind| self.group(kind, facets, selected))
            .collect();
        FacetPanel { groups }
    }

    fn group(&self, kind: FacetKind, facets: &FacetMap, selected: &FilterSet) -> FacetGroup {
        let counts = facets.get(kind.wire_name());
        let chosen = selected.values(kind);

        let mut options: Vec<FacetOption> = counts
            .into_iter()
            .flatten()
            .map(|(value, count)| FacetOption {
                value: value.clone(),
                count: *count,
                selected: chosen.contains(value),
            })
            .collect();
        options.sort_by(|a, b| (Reverse(a.count), &a.value).cmp(&(Reverse(b.count), &b.value)));
        options.truncate(self.limit(kind));

        for value in chosen {
            if options.iter().any(|o| &o.value == value) {
                continue;
            }
            options.push(FacetOption {
                value: value.clone(),
                count: counts.and_then(|c| c.get(value)).copied().unwrap_or(0),
                selected: true,
            });
        }

        FacetGroup { kind, options }
    }
}

impl Default for FacetAggregator {
    fn default() -> Self {
        Self::new(FacetLimits::default())
    }
}
