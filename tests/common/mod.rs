//! Shared test fixtures and a scripted data source.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use woogle::config::Settings;
use woogle::engine::SearchMode;
use woogle::query::SearchState;
use woogle::{Browser, DossierSource, Result, WooError};

// ============================================================================
// FIXTURES
// ============================================================================

/// A raw dossier record as the Woo API sends it.
pub fn raw_dossier(id: &str, title: &str, type_code: &str, year: i32, published: &str) -> Value {
    let topic = if year % 2 == 0 { "Verkeer" } else { "Onderwijs" };
    json!({
        "dc_identifier": id,
        "dc_title": title,
        "dc_description": format!("Beschrijving van {}", title),
        "dc_type": type_code,
        "dc_date_year": year,
        "foi_publishedDate": published,
        "tooiwl_topic": topic,
        "foi_files": [
            {
                "dc_identifier": format!("{}.f1", id),
                "dc_title": format!("Bijlage bij {}", title),
                "foi_fileName": format!("{}.pdf", id),
                "dc_format": "application/pdf",
                "dc_type": "bijlage",
                "foi_nrPages": 2
            }
        ]
    })
}

/// Twelve visible dossiers plus one reference index record.
pub fn catalog_records() -> Vec<Value> {
    let mut records: Vec<Value> = (1..=12)
        .map(|i| {
            let type_code = match i % 3 {
                0 => "2k",
                1 => "2i",
                _ => "2c",
            };
            raw_dossier(
                &format!("nl.gm0268.{}.{}", type_code, i),
                &format!("Dossier nummer {}", i),
                type_code,
                2018 + (i % 4),
                &format!("2023-{:02}-01", i),
            )
        })
        .collect();
    records.push(raw_dossier(
        "nl.gm0268.1e-i.1",
        "Verwijsindex gemeente",
        "1e-i",
        2020,
        "2024-01-01",
    ));
    records
}

pub fn catalog_json() -> Value {
    json!({ "infobox": { "foi_dossiers": catalog_records() } })
}

/// A server search response with `hits` on the page and `total` overall.
pub fn search_json(hits: Vec<Value>, total: u64) -> Value {
    json!({
        "hits": hits,
        "total_hits": total,
        "total_pages": total.div_ceil(10),
        "facets": [
            { "type": { "facet_name": "2k", "value": total } },
            { "year": { "facet_name": "2021", "value": total } }
        ]
    })
}

pub fn settings(mode: SearchMode) -> Settings {
    Settings {
        mode,
        ..Default::default()
    }
}

// ============================================================================
// SCRIPTED SOURCE
// ============================================================================

/// Scripted reply for one call.
#[derive(Clone)]
pub enum Reply {
    Json(Value),
    Delayed(Duration, Value),
    FetchError,
}

impl Reply {
    async fn resolve(&self) -> Result<Value> {
        match self {
            Reply::Json(value) => Ok(value.clone()),
            Reply::Delayed(delay, value) => {
                tokio::time::sleep(*delay).await;
                Ok(value.clone())
            }
            Reply::FetchError => Err(WooError::Fetch("connection refused".to_string())),
        }
    }
}

/// In-memory [`DossierSource`] with call counters.
pub struct FakeSource {
    pub catalog: Reply,
    /// Replies keyed by the search query text; `default_search` otherwise.
    pub searches: HashMap<String, Reply>,
    pub default_search: Reply,
    pub dossiers: HashMap<String, Reply>,
    pub catalog_calls: AtomicUsize,
    pub search_calls: AtomicUsize,
}

impl FakeSource {
    pub fn new() -> Self {
        Self {
            catalog: Reply::Json(catalog_json()),
            searches: HashMap::new(),
            default_search: Reply::Json(search_json(Vec::new(), 0)),
            dossiers: HashMap::new(),
            catalog_calls: AtomicUsize::new(0),
            search_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_catalog(mut self, reply: Reply) -> Self {
        self.catalog = reply;
        self
    }

    pub fn with_search(mut self, query: &str, reply: Reply) -> Self {
        self.searches.insert(query.to_string(), reply);
        self
    }

    pub fn with_dossier(mut self, pid: &str, reply: Reply) -> Self {
        self.dossiers.insert(pid.to_string(), reply);
        self
    }

    pub fn catalog_calls(&self) -> usize {
        self.catalog_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DossierSource for FakeSource {
    async fn fetch_catalog(&self) -> Result<Value> {
        self.catalog_calls.fetch_add(1, Ordering::SeqCst);
        self.catalog.resolve().await
    }

    async fn search(&self, state: &SearchState) -> Result<Value> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .searches
            .get(&state.query)
            .unwrap_or(&self.default_search)
            .clone();
        reply.resolve().await
    }

    async fn fetch_dossier(&self, pid: &str) -> Result<Value> {
        match self.dossiers.get(pid) {
            Some(reply) => reply.resolve().await,
            None => Ok(json!({ "infobox": null })),
        }
    }
}

/// A browser over `source`, keeping a handle on the source for assertions.
pub fn browser(source: FakeSource, mode: SearchMode) -> (Arc<Browser>, Arc<FakeSource>) {
    let source = Arc::new(source);
    let browser = Browser::new(source.clone(), &settings(mode));
    (Arc::new(browser), source)
}
