//! Data-source boundary.

mod woo;

pub use woo::{CatalogLocation, WooClient};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::query::SearchState;

/// Provider of raw Woo API responses.
///
/// Implementations return undecoded JSON; decoding (and its shape errors) happens in
/// [`crate::models::wire`] so every source is held to the same contract.
#[async_trait]
pub trait DossierSource: Send + Sync {
    /// The full catalog, shaped `{ infobox: { foi_dossiers: [...] } }`.
    async fn fetch_catalog(&self) -> Result<Value>;

    /// One server-filtered page, shaped `{ hits, total_hits, total_pages, facets }`.
    async fn search(&self, state: &SearchState) -> Result<Value>;

    /// A single dossier, shaped `{ infobox: {...} }`.
    async fn fetch_dossier(&self, pid: &str) -> Result<Value>;
}
