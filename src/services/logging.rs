// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Logging setup and redaction of user-typed text.

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
/// `RUST_LOG` wins when set; otherwise `verbose` picks debug or info for this crate.
pub fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "blog_search=debug"
    } else {
        "blog_search=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    // A second init (tests, embedding applications) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Redact a search query for logging.
/// Keeps the first two characters and the length: "re*** (5 chars)"
pub fn redact_query(text: &str) -> String {
    let text = text.trim();
    let len = text.chars().count();
    if len == 0 {
        return "<empty>".to_string();
    }
    let visible: String = text.chars().take(2).collect();
    format!("{}*** ({} chars)", visible, len)
}
