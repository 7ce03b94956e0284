// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod analytics;
pub mod backend;
pub mod facets;
pub mod highlight;
pub mod logging;
pub mod pagination;
pub mod query_builder;
pub mod search_client;
