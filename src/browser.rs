//! Orchestration: URL → search state → (fetch) → evaluation → view model.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::client::DossierSource;
use crate::config::Settings;
use crate::engine::{evaluate, ResultSet, SearchMode};
use crate::error::{Result, WooError};
use crate::models::wire;
use crate::query::{codec, reduce, SearchEvent, SearchState};
use crate::store::ResultStore;
use crate::view::{self, build_detail, DossierDetail, Locale, ViewModel};

/// Outcome of a dossier detail lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DossierView {
    Found(Box<DossierDetail>),
    NotFound { pid: String },
    Unavailable { message: String },
}

/// Drives result pages for one user session.
///
/// The local catalog is shared by every session derived with [`Browser::session`];
/// remote searches only supersede searches of the same session.
pub struct Browser {
    source: Arc<dyn DossierSource>,
    catalog: ResultStore<ResultSet>,
    searches: ResultStore<ResultSet>,
    mode: SearchMode,
    page_size: u32,
    locale: Locale,
    resolver_url: String,
}

impl Browser {
    pub fn new(source: Arc<dyn DossierSource>, settings: &Settings) -> Self {
        Self {
            source,
            catalog: ResultStore::new(),
            searches: ResultStore::new(),
            mode: settings.mode,
            page_size: settings.page_size.max(1),
            locale: settings.locale,
            resolver_url: settings.api_base_url.clone(),
        }
    }

    /// A new session over the same source and catalog cache.
    pub fn session(&self) -> Browser {
        Browser {
            source: self.source.clone(),
            catalog: self.catalog.clone(),
            searches: ResultStore::new(),
            mode: self.mode,
            page_size: self.page_size,
            locale: self.locale,
            resolver_url: self.resolver_url.clone(),
        }
    }

    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Render the result page for a URL query string.
    ///
    /// Returns `None` when a later navigation superseded this one before its data arrived.
    pub async fn navigate(&self, query_string: &str) -> Option<ViewModel> {
        let state = codec::decode(query_string);
        debug!("Navigating to {:?} ({} mode)", codec::encode(&state), self.mode);

        let set = match self.load(&state).await {
            Ok(Some(set)) => set,
            Ok(None) => return None,
            Err(e) => {
                match e {
                    WooError::DataShape(ref msg) => warn!("Discarding malformed results: {}", msg),
                    ref other => warn!("Unable to load results: {}", other),
                }
                return Some(ViewModel::failed(&state, &e, self.locale));
            }
        };

        let outcome = evaluate(&set, &state, self.page_size);
        Some(view::build(&outcome.page, &outcome.facets, &state, self.locale))
    }

    /// Apply an interaction to the page at `query_string`.
    ///
    /// Returns the next query string (foreign parameters preserved) and its view.
    pub async fn dispatch(
        &self,
        query_string: &str,
        event: &SearchEvent,
    ) -> (String, Option<ViewModel>) {
        let next = reduce(&codec::decode(query_string), event);
        let next_qs = codec::merge(query_string, &next);
        let view = self.navigate(&next_qs).await;
        (next_qs, view)
    }

    /// Obtain the result set for `state`, fetching when the mode requires it.
    ///
    /// `Ok(None)` means the fetch was superseded.
    async fn load(&self, state: &SearchState) -> Result<Option<Arc<ResultSet>>> {
        match self.mode {
            SearchMode::Local => {
                if let Some(set) = self.catalog.current().await {
                    return Ok(Some(set));
                }
                let token = self.catalog.begin();
                let raw = self.source.fetch_catalog().await;
                let catalog = wire::decode_catalog(&raw?)?;
                info!("Loaded catalog of {} dossiers", catalog.len());
                // A concurrent load of the same catalog may have won; ours is just as current.
                match self.catalog.commit(token, ResultSet::Catalog(catalog)).await {
                    Ok(set) => Ok(Some(set)),
                    Err(set) => Ok(Some(Arc::new(set))),
                }
            }
            SearchMode::Remote => {
                let token = self.searches.begin();
                let raw = self.source.search(state).await;
                if !self.searches.is_latest(token) {
                    debug!("Search for page {} superseded", state.page);
                    return Ok(None);
                }
                let page = wire::decode_search(&raw?)?;
                Ok(self.searches.commit(token, ResultSet::Remote(page)).await.ok())
            }
        }
    }

    /// Drop the cached catalog so the next navigation fetches it again.
    pub async fn refresh(&self) {
        self.catalog.clear().await;
    }

    /// Look up a single dossier for its detail page.
    pub async fn dossier(&self, pid: &str) -> DossierView {
        let result = match self.source.fetch_dossier(pid).await {
            Ok(raw) => wire::decode_detail(&raw, pid),
            Err(e) => Err(e),
        };

        match result {
            Ok(dossier) => DossierView::Found(Box::new(build_detail(
                &dossier,
                &self.resolver_url,
                self.locale,
            ))),
            Err(WooError::NotFound(pid)) => {
                info!("Dossier {} not found", pid);
                DossierView::NotFound { pid }
            }
            Err(e) => {
                warn!("Unable to load dossier {}: {}", pid, e);
                DossierView::Unavailable {
                    message: e.to_string(),
                }
            }
        }
    }
}
