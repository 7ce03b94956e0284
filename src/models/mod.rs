// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod analytics;
pub mod filter;
pub mod query;
pub mod search;
pub mod settings;
