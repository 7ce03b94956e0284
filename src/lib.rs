// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Search, facet and incremental pagination client for the blog API.

pub mod error;
pub mod models;
pub mod services;

/// Crate version extracted from `Cargo.toml` at compile time.
/// The patch segment can be overridden via `BLOG_SEARCH_PATCH_VERSION` (see `build.rs`).
pub const VERSION: &str = env!("BLOG_SEARCH_VERSION");
