//! Configuration management for Woogle using the prefer crate.

use serde::{Deserialize, Serialize};

use crate::engine::{SearchMode, DEFAULT_PAGE_SIZE};
use crate::view::Locale;

/// Resolver root of the Woo API.
pub const DEFAULT_API_BASE_URL: &str = "https://pid.wooverheid.nl/";

/// Infobox listing every municipality that publishes Woo dossiers.
pub const DEFAULT_RELAY_UPSTREAM: &str =
    "https://pid.wooverheid.nl/?pid=nl&infobox=true&dim=publisher&category=Gemeente";

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Woo API base URL.
    pub api_base_url: String,
    /// Publisher prefix scoping every query (e.g. `gm0268`).
    pub publisher: String,
    /// Country prefix scoping every query.
    pub country: String,
    /// Catalog location for local mode: URL or path to a JSON file.
    /// None = the publisher infobox on the API.
    pub catalog: Option<String>,
    /// Where filtering happens.
    pub mode: SearchMode,
    /// Dossiers per result page.
    pub page_size: u32,
    /// Language of captions and labels.
    pub locale: Locale,
    /// User agent for HTTP requests.
    pub user_agent: String,
    /// Request timeout in seconds.
    pub request_timeout: u64,
    /// URL relayed by `/api/municipalities`.
    pub relay_upstream: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            publisher: "gm0268".to_string(),
            country: "nl".to_string(),
            catalog: None,
            mode: SearchMode::Local,
            page_size: DEFAULT_PAGE_SIZE,
            locale: Locale::Nl,
            user_agent: format!("Woogle/{} (open government search)", env!("CARGO_PKG_VERSION")),
            request_timeout: 30,
            relay_upstream: DEFAULT_RELAY_UPSTREAM.to_string(),
        }
    }
}

impl Settings {
    /// The catalog location, defaulting to the publisher infobox.
    pub fn catalog_location(&self) -> String {
        match self.catalog {
            Some(ref catalog) => catalog.clone(),
            None => format!(
                "{}?pid={}&infobox=true",
                self.api_base_url, self.publisher
            ),
        }
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Woo API base URL.
    #[serde(default)]
    pub api_base_url: Option<String>,
    /// Publisher prefix.
    #[serde(default)]
    pub publisher: Option<String>,
    /// Country prefix.
    #[serde(default)]
    pub country: Option<String>,
    /// Catalog URL or JSON file path (`~` is expanded).
    #[serde(default)]
    pub catalog: Option<String>,
    /// Search mode.
    /// - "local": fetch the catalog once, filter in memory
    /// - "remote": delegate every query to the API
    #[serde(default)]
    pub mode: Option<String>,
    /// Dossiers per page.
    #[serde(default)]
    pub page_size: Option<u32>,
    /// "nl" or "en".
    #[serde(default)]
    pub locale: Option<String>,
    /// User agent string.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Request timeout in seconds.
    #[serde(default)]
    pub request_timeout: Option<u64>,
    /// Upstream URL of the municipalities relay.
    #[serde(default)]
    pub relay_upstream: Option<String>,
}

impl Config {
    /// Load configuration using prefer crate.
    /// Automatically discovers woogle config files in standard locations.
    pub async fn load() -> Self {
        match prefer::load("woogle").await {
            Ok(pref_config) => {
                let api_base_url: Option<String> = pref_config.get("api_base_url").ok();
                let publisher: Option<String> = pref_config.get("publisher").ok();
                let country: Option<String> = pref_config.get("country").ok();
                let catalog: Option<String> = pref_config.get("catalog").ok();
                let mode: Option<String> = pref_config.get("mode").ok();
                let page_size: Option<u32> = pref_config.get("page_size").ok();
                let locale: Option<String> = pref_config.get("locale").ok();
                let user_agent: Option<String> = pref_config.get("user_agent").ok();
                let request_timeout: Option<u64> = pref_config.get("request_timeout").ok();
                let relay_upstream: Option<String> = pref_config.get("relay_upstream").ok();

                Config {
                    api_base_url,
                    publisher,
                    country,
                    catalog,
                    mode,
                    page_size,
                    locale,
                    user_agent,
                    request_timeout,
                    relay_upstream,
                }
            }
            Err(_) => {
                // No config file found, use defaults
                Self::default()
            }
        }
    }

    /// Apply configuration to settings.
    ///
    /// Unparsable `mode` or `locale` values are reported and the current setting kept.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref url) = self.api_base_url {
            settings.api_base_url = url.clone();
        }
        if let Some(ref publisher) = self.publisher {
            settings.publisher = publisher.clone();
        }
        if let Some(ref country) = self.country {
            settings.country = country.clone();
        }
        if let Some(ref catalog) = self.catalog {
            settings.catalog = Some(expand_catalog(catalog));
        }
        if let Some(ref mode) = self.mode {
            match mode.parse() {
                Ok(mode) => settings.mode = mode,
                Err(e) => tracing::warn!("Ignoring configured mode: {}", e),
            }
        }
        if let Some(page_size) = self.page_size {
            settings.page_size = page_size.max(1);
        }
        if let Some(ref locale) = self.locale {
            match locale.parse() {
                Ok(locale) => settings.locale = locale,
                Err(e) => tracing::warn!("Ignoring configured locale: {}", e),
            }
        }
        if let Some(ref ua) = self.user_agent {
            settings.user_agent = ua.clone();
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = timeout;
        }
        if let Some(ref upstream) = self.relay_upstream {
            settings.relay_upstream = upstream.clone();
        }
    }
}

/// Expand `~` in local catalog paths; URLs are left alone.
pub fn expand_catalog(catalog: &str) -> String {
    if catalog.starts_with("http://") || catalog.starts_with("https://") {
        catalog.to_string()
    } else {
        shellexpand::tilde(catalog).into_owned()
    }
}

/// Load settings from config file and environment.
pub async fn load_settings() -> Settings {
    let config = Config::load().await;
    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings);
    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.mode, SearchMode::Local);
        assert_eq!(settings.page_size, 10);
        assert_eq!(
            settings.catalog_location(),
            "https://pid.wooverheid.nl/?pid=gm0268&infobox=true"
        );
    }

    #[test]
    fn test_apply_to_settings() {
        let config = Config {
            publisher: Some("gm0363".to_string()),
            mode: Some("remote".to_string()),
            locale: Some("en".to_string()),
            page_size: Some(0),
            catalog: Some("https://example.org/catalog.json".to_string()),
            ..Default::default()
        };
        let mut settings = Settings::default();
        config.apply_to_settings(&mut settings);

        assert_eq!(settings.publisher, "gm0363");
        assert_eq!(settings.mode, SearchMode::Remote);
        assert_eq!(settings.locale, Locale::En);
        assert_eq!(settings.page_size, 1);
        assert_eq!(settings.catalog_location(), "https://example.org/catalog.json");
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let config = Config {
            mode: Some("sideways".to_string()),
            locale: Some("fr".to_string()),
            ..Default::default()
        };
        let mut settings = Settings::default();
        config.apply_to_settings(&mut settings);
        assert_eq!(settings.mode, SearchMode::Local);
        assert_eq!(settings.locale, Locale::Nl);
    }

    #[test]
    fn test_expand_catalog() {
        assert_eq!(expand_catalog("https://x/y.json"), "https://x/y.json");
        assert!(!expand_catalog("~/catalog.json").starts_with('~'));
    }
}
