//! HTTP client for the Woo resolver API.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use super::DossierSource;
use crate::config::{expand_catalog, Settings};
use crate::error::{Result, WooError};
use crate::models::{wire, Municipality};
use crate::query::{SearchState, MATCH_ALL};

/// Where the local-mode catalog is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogLocation {
    Remote(Url),
    File(PathBuf),
}

impl CatalogLocation {
    pub fn parse(location: &str) -> Result<Self> {
        if location.starts_with("http://") || location.starts_with("https://") {
            Url::parse(location)
                .map(CatalogLocation::Remote)
                .map_err(|e| WooError::Config(format!("invalid catalog URL '{}': {}", location, e)))
        } else {
            Ok(CatalogLocation::File(PathBuf::from(expand_catalog(location))))
        }
    }
}

/// reqwest-backed [`DossierSource`].
#[derive(Clone)]
pub struct WooClient {
    client: Client,
    base_url: Url,
    publisher: String,
    country: String,
    catalog: CatalogLocation,
    relay_upstream: String,
}

impl WooClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&settings.user_agent)
            .timeout(Duration::from_secs(settings.request_timeout))
            .gzip(true)
            .brotli(true)
            .build()?;

        let base_url = Url::parse(&settings.api_base_url).map_err(|e| {
            WooError::Config(format!("invalid API base URL '{}': {}", settings.api_base_url, e))
        })?;

        Ok(Self {
            client,
            base_url,
            publisher: settings.publisher.clone(),
            country: settings.country.clone(),
            catalog: CatalogLocation::parse(&settings.catalog_location())?,
            relay_upstream: settings.relay_upstream.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Query parameters for a server-side search.
    pub fn search_params(&self, state: &SearchState) -> Vec<(&'static str, String)> {
        let query = match state.query.trim() {
            "" => MATCH_ALL.to_string(),
            q => q.to_string(),
        };
        let mut params = vec![("q", query)];
        if let Some(ref code) = state.type_code {
            params.push(("type", code.as_str().to_string()));
        }
        if let Some(year) = state.year {
            params.push(("year", year.to_string()));
        }
        params.push(("order", state.sort_order.as_str().to_string()));
        params.push(("page", state.page.to_string()));
        params.push(("publisher", self.publisher.clone()));
        params.push(("country", self.country.clone()));
        params
    }

    async fn send(&self, url: &Url) -> Result<reqwest::Response> {
        debug!("GET {}", url);
        self.client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| WooError::Fetch(format!("{}: {}", url, e)))
    }

    async fn get(&self, url: &Url) -> Result<reqwest::Response> {
        let resp = self.send(url).await?;
        if !resp.status().is_success() {
            return Err(WooError::Fetch(format!("HTTP {} from {}", resp.status(), url)));
        }
        Ok(resp)
    }

    async fn read_json(resp: reqwest::Response, url: &Url) -> Result<Value> {
        resp.json::<Value>().await.map_err(|e| {
            if e.is_decode() {
                WooError::shape(format!("response from {} is not JSON: {}", url, e))
            } else {
                WooError::Fetch(format!("{}: {}", url, e))
            }
        })
    }

    async fn get_json(&self, url: &Url) -> Result<Value> {
        let resp = self.get(url).await?;
        Self::read_json(resp, url).await
    }

    /// Fetch the relay upstream and return its body unchanged.
    ///
    /// The body must parse as JSON; anything else counts as a failed upstream call.
    pub async fn relay(&self) -> Result<Bytes> {
        let url = Url::parse(&self.relay_upstream)
            .map_err(|e| WooError::Config(format!("invalid relay upstream: {}", e)))?;
        let body = self
            .get(&url)
            .await?
            .bytes()
            .await
            .map_err(|e| WooError::Fetch(format!("{}: {}", url, e)))?;
        serde_json::from_slice::<serde::de::IgnoredAny>(&body)?;
        Ok(body)
    }

    /// Publishers listed by the relay upstream.
    pub async fn municipalities(&self) -> Result<Vec<Municipality>> {
        let body = self.relay().await?;
        let value: Value = serde_json::from_slice(&body)?;
        let list = wire::decode_municipalities(&value)?;
        info!("Loaded {} municipalities", list.len());
        Ok(list)
    }
}

#[async_trait]
impl DossierSource for WooClient {
    async fn fetch_catalog(&self) -> Result<Value> {
        match self.catalog {
            CatalogLocation::Remote(ref url) => {
                info!("Fetching catalog from {}", url);
                self.get_json(url).await
            }
            CatalogLocation::File(ref path) => {
                info!("Reading catalog from {}", path.display());
                let raw = tokio::fs::read_to_string(path).await?;
                Ok(serde_json::from_str(&raw)?)
            }
        }
    }

    async fn search(&self, state: &SearchState) -> Result<Value> {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .extend_pairs(self.search_params(state).iter().map(|(k, v)| (*k, v.as_str())));
        self.get_json(&url).await
    }

    async fn fetch_dossier(&self, pid: &str) -> Result<Value> {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("pid", pid)
            .append_pair("infobox", "true");

        let resp = self.send(&url).await?;
        if resp.status() == StatusCode::NOT_FOUND {
            warn!("Dossier {} not found upstream", pid);
            return Err(WooError::NotFound(pid.to_string()));
        }
        if !resp.status().is_success() {
            return Err(WooError::Fetch(format!("HTTP {} from {}", resp.status(), url)));
        }
        Self::read_json(resp, &url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::codec;

    fn client() -> WooClient {
        WooClient::new(&Settings::default()).unwrap()
    }

    #[test]
    fn test_search_params() {
        let params = client().search_params(&codec::decode("type=2k&year=2021&page=2"));
        let keys: Vec<&str> = params.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            keys,
            vec!["q", "type", "year", "order", "page", "publisher", "country"]
        );
        assert_eq!(params[0].1, "*");
        assert_eq!(params[3].1, "relevance-desc");
        assert_eq!(params[5].1, "gm0268");
    }

    #[test]
    fn test_catalog_location() {
        assert!(matches!(
            CatalogLocation::parse("https://pid.wooverheid.nl/?pid=gm0268&infobox=true").unwrap(),
            CatalogLocation::Remote(_)
        ));
        assert_eq!(
            CatalogLocation::parse("/tmp/catalog.json").unwrap(),
            CatalogLocation::File(PathBuf::from("/tmp/catalog.json"))
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let settings = Settings {
            api_base_url: "not a url".to_string(),
            ..Default::default()
        };
        let err = WooClient::new(&settings).err().unwrap();
        assert!(matches!(err, WooError::Config(_)));
    }

    #[tokio::test]
    async fn test_missing_catalog_file_is_fetch_error() {
        let settings = Settings {
            catalog: Some("/nonexistent/woogle/catalog.json".to_string()),
            ..Default::default()
        };
        let err = WooClient::new(&settings)
            .unwrap()
            .fetch_catalog()
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Fetch);
    }
}
