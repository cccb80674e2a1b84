//! Result evaluation: filtering, ordering, facet aggregation and pagination.
//!
//! Two strategies feed the same pipeline. In local mode the whole catalog is held in
//! memory and every step runs here. In remote mode the server has already filtered,
//! ordered and sliced the results; only the reserved-type exclusion runs locally and
//! facet buckets are taken as reported.

pub mod facets;
pub mod filter;
pub mod paginate;
pub mod sort;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Dossier, RemotePage};
use crate::query::SearchState;

pub use facets::{count_facets, from_buckets, Dimension, FacetCount, FacetSummary, FacetValue};
pub use filter::{filter, filter_json, matching_files};
pub use paginate::{
    controls, paginate, PaginationControls, ResultPage, ServerPaging, DEFAULT_PAGE_SIZE,
};
pub use sort::sort_dossiers;

/// Where filtering happens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Fetch the full catalog once, filter in memory.
    #[default]
    Local,
    /// Send each search to the Woo API.
    Remote,
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(SearchMode::Local),
            "remote" | "server" => Ok(SearchMode::Remote),
            other => Err(format!("unknown search mode '{}'", other)),
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::Local => f.write_str("local"),
            SearchMode::Remote => f.write_str("remote"),
        }
    }
}

/// Data a result page is computed from.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultSet {
    /// The full, unfiltered catalog.
    Catalog(Vec<Dossier>),
    /// A server-filtered page.
    Remote(RemotePage),
}

impl ResultSet {
    pub fn mode(&self) -> SearchMode {
        match self {
            ResultSet::Catalog(_) => SearchMode::Local,
            ResultSet::Remote(_) => SearchMode::Remote,
        }
    }
}

/// The evaluated page and the facet counts of the whole filtered set.
#[derive(Debug, Clone)]
pub struct SearchOutcome<'a> {
    pub page: ResultPage<&'a Dossier>,
    pub facets: FacetSummary,
}

/// Evaluate `state` against a result set.
pub fn evaluate<'a>(
    set: &'a ResultSet,
    state: &SearchState,
    page_size: u32,
) -> SearchOutcome<'a> {
    match set {
        ResultSet::Catalog(catalog) => {
            let filtered = filter(catalog, state);
            let facets = count_facets(&filtered);
            let ordered = sort_dossiers(filtered, &state.sort_order);
            debug!(
                "Local evaluation: {} of {} dossiers match",
                ordered.len(),
                catalog.len()
            );
            SearchOutcome {
                page: paginate(ordered, page_size, state.page),
                facets,
            }
        }
        ResultSet::Remote(remote) => {
            let paging = ServerPaging {
                total_count: remote.total_hits,
                total_pages: remote.total_pages,
                served: remote.hits.len(),
            };
            let hits = filter::without_excluded(&remote.hits);
            let page = paginate::server_page(hits, paging, page_size, state.page);
            debug!(
                "Server page {} of {}: {} hits of {}",
                page.current_page,
                page.total_pages,
                paging.served,
                remote.total_hits
            );
            SearchOutcome {
                page,
                facets: from_buckets(&remote.facets),
            }
        }
    }
}
