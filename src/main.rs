// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use anyhow::{bail, Context, Result};
use blog_search::models::analytics::EventType;
use blog_search::models::filter::{DateRange, FacetKind, FilterSet};
use blog_search::models::query::SortKey;
use blog_search::models::settings::{ClientSettings, FacetLimits};
use blog_search::services::analytics::AnalyticsEmitter;
use blog_search::services::backend::HttpBackend;
use blog_search::services::facets::FacetPanel;
use blog_search::services::highlight::HighlightedFields;
use blog_search::services::logging::init_tracing;
use blog_search::services::pagination::PageStatus;
use blog_search::services::search_client::{ClientSearchState, SearchClient};
use blog_search::VERSION;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

type Client = SearchClient<HttpBackend, HttpBackend>;

#[derive(Parser)]
#[command(name = "blog-search", version = VERSION, about = "Search the blog from the terminal")]
struct Cli {
    /// Base URL of the blog API
    #[arg(long, env = "BLOG_SEARCH_URL", default_value = "http://127.0.0.1:5000/api")]
    url: String,

    /// Settle delay before a typed query is sent
    #[arg(long, env = "BLOG_SEARCH_DEBOUNCE_MS", default_value_t = 300)]
    debounce_ms: u64,

    #[arg(long, env = "BLOG_SEARCH_TIMEOUT_SECS", default_value_t = 10)]
    timeout_secs: u64,

    #[arg(long, env = "BLOG_SEARCH_PAGE_SIZE", default_value_t = 20)]
    page_size: u32,

    #[arg(long, env = "BLOG_SEARCH_CATEGORY_LIMIT", default_value_t = 10)]
    category_limit: usize,

    #[arg(long, env = "BLOG_SEARCH_TAG_LIMIT", default_value_t = 20)]
    tag_limit: usize,

    #[arg(long, env = "BLOG_SEARCH_AUTHOR_LIMIT", default_value_t = 10)]
    author_limit: usize,

    /// Debug logging for this crate (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.url.clone(),
            debounce: Duration::from_millis(self.debounce_ms),
            request_timeout: Duration::from_secs(self.timeout_secs),
            page_size: self.page_size,
            facet_limits: FacetLimits {
                category: self.category_limit,
                tags: self.tag_limit,
                author: self.author_limit,
            },
        }
    }
}

#[derive(Args, Default)]
struct FilterArgs {
    #[arg(long)]
    category: Vec<String>,
    #[arg(long = "tag")]
    tags: Vec<String>,
    #[arg(long)]
    author: Vec<String>,
    #[arg(long)]
    status: Option<String>,
    #[arg(long)]
    featured: Option<bool>,
    #[arg(long)]
    min_views: Option<u64>,
    /// Earliest publication date (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Latest publication date (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,
}

impl FilterArgs {
    fn to_filter_set(&self) -> Result<FilterSet> {
        let mut filters = FilterSet::new();
        for (kind, values) in [
            (FacetKind::Category, &self.category),
            (FacetKind::Tags, &self.tags),
            (FacetKind::Author, &self.author),
        ] {
            for value in values {
                filters = filters.with(kind, value);
            }
        }
        filters.set_status(self.status.as_deref());
        filters.is_featured = self.featured;
        filters.min_views = self.min_views;
        filters.date_range = match (self.from, self.to) {
            (None, None) => None,
            (Some(start), Some(end)) => Some(DateRange::new(start, end)?),
            _ => bail!("--from and --to must be given together"),
        };
        Ok(filters)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Run one search and print the requested number of pages
    Search {
        #[arg(default_value = "")]
        text: String,
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, default_value_t = 1)]
        pages: u32,
        #[arg(long, default_value_t = SortKey::Relevance)]
        sort: SortKey,
    },
    /// Title suggestions for a prefix
    Suggest {
        text: String,
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
    /// Most searched queries
    Popular {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Send a single analytics event
    Track {
        event_type: String,
        /// Metadata entries as key=value
        #[arg(long = "meta")]
        metadata: Vec<String>,
    },
    /// Type queries line by line; `:more`, `:tag X`, `:category X`, `:author X`,
    /// `:sort KEY`, `:quit`
    Interactive {
        #[arg(long, default_value_t = SortKey::Relevance)]
        sort: SortKey,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = cli.settings();
    let backend =
        Arc::new(HttpBackend::new(&settings).context("Failed to create search backend client")?);
    let emitter = AnalyticsEmitter::new(backend.clone(), settings.request_timeout);
    let client = SearchClient::with_analytics(backend, settings, emitter.clone());

    match cli.command {
        Command::Search {
            text,
            filters,
            pages,
            sort,
        } => run_search(&client, &text, filters.to_filter_set()?, pages, sort).await,
        Command::Suggest { text, limit } => {
            for suggestion in client.suggestions(&text, limit).await? {
                println!("{suggestion}");
            }
            Ok(())
        }
        Command::Popular { limit } => {
            for query in client.popular(limit).await? {
                println!("{query}");
            }
            Ok(())
        }
        Command::Track {
            event_type,
            metadata,
        } => {
            let metadata = parse_metadata(&metadata)?;
            emitter.track(EventType::parse(&event_type), metadata).await?;
            Ok(())
        }
        Command::Interactive { sort } => {
            emitter.page_view("/search");
            run_interactive(&client, sort).await
        }
    }
}

async fn run_search(
    client: &Client,
    text: &str,
    filters: FilterSet,
    pages: u32,
    sort: SortKey,
) -> Result<()> {
    client.set_sort(sort);
    client.on_query_changed(text, filters);
    client.wait_idle().await;

    for _ in 1..pages {
        if !client.load_more() {
            break;
        }
        client.wait_idle().await;
    }

    let state = client.snapshot();
    if let PageStatus::Error(message) = state.status() {
        bail!("Search failed: {message}");
    }
    if state.current_query().is_some_and(|q| !q.is_dispatchable()) {
        bail!("Nothing to search for: give a query or at least one filter");
    }

    print_results(&state);
    print_facets(&client.facet_panel());
    Ok(())
}

async fn run_interactive(client: &Client, sort: SortKey) -> Result<()> {
    client.set_sort(sort);

    let mut updates = client.subscribe();
    let printer = tokio::spawn(async move {
        let mut last_printed = ClientSearchState::default();
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            if state.is_busy() || state == last_printed {
                continue;
            }
            match state.status() {
                PageStatus::Error(message) => eprintln!("error: {message}"),
                _ => print_results(&state),
            }
            last_printed = state;
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if !handle_line(client, line.trim()) {
            break;
        }
    }

    printer.abort();
    Ok(())
}

/// Apply one line of interactive input; false means quit
fn handle_line(client: &Client, line: &str) -> bool {
    let Some(command) = line.strip_prefix(':') else {
        client.on_query_changed(line, client.snapshot().filters());
        return true;
    };

    let (name, arg) = command.split_once(' ').unwrap_or((command, ""));
    match name {
        "quit" | "q" => return false,
        "more" => {
            if !client.load_more() {
                println!("no more results");
            }
        }
        "tag" | "category" | "author" => {
            let kind = match name {
                "tag" => FacetKind::Tags,
                "category" => FacetKind::Category,
                _ => FacetKind::Author,
            };
            if arg.trim().is_empty() {
                eprintln!(":{name} needs a value");
            } else {
                client.toggle_filter(kind, arg);
            }
        }
        "facets" => print_facets(&client.facet_panel()),
        "sort" => match arg.parse::<SortKey>() {
            Ok(sort) => {
                client.set_sort(sort);
                print_results(&client.snapshot());
            }
            Err(e) => eprintln!("{e}"),
        },
        other => eprintln!("unknown command :{other}"),
    }
    true
}

fn parse_metadata(entries: &[String]) -> Result<Map<String, Value>> {
    let mut metadata = Map::new();
    for entry in entries {
        let Some((key, value)) = entry.split_once('=') else {
            bail!("Metadata entry must look like key=value, got: {entry}");
        };
        let value = serde_json::from_str(value).unwrap_or_else(|_| Value::from(value));
        metadata.insert(key.to_string(), value);
    }
    Ok(metadata)
}

fn print_results(state: &ClientSearchState) {
    println!(
        "{} hits in {} ms, showing {}{}",
        state.total_hits(),
        state.processing_time_ms(),
        state.hits().len(),
        if state.has_more() { " (more available)" } else { "" }
    );
    for (i, hit) in state.hits().iter().enumerate() {
        println!(
            "{:>3}. {}  [{}] by {}  views:{} likes:{} comments:{}",
            i + 1,
            hit.highlighted_title().render_with(BOLD, RESET),
            hit.category.as_deref().unwrap_or("-"),
            hit.author,
            hit.counts.views,
            hit.counts.likes,
            hit.counts.comments,
        );
        if let Some(snippet) = hit.highlighted_snippet() {
            println!("     {}", snippet.render_with(BOLD, RESET));
        }
    }
}

fn print_facets(panel: &FacetPanel) {
    for group in &panel.groups {
        if group.options.is_empty() {
            continue;
        }
        let options: Vec<String> = group
            .options
            .iter()
            .map(|o| {
                let marker = if o.selected { "*" } else { "" };
                format!("{marker}{} ({})", o.value, o.count)
            })
            .collect();
        println!("{}: {}", group.kind, options.join(", "));
    }
}
