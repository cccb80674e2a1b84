//! Woogle: search and browse disclosed Woo dossiers.
//!
//! A URL query string decodes into a [`query::SearchState`]; the [`engine`] evaluates it
//! against a catalog held in memory or delegates it to the Woo API; [`view`] turns the
//! outcome into a renderable view model. [`browser::Browser`] ties these together and
//! [`server`] exposes them over HTTP next to a CORS relay for the municipalities list.

pub mod browser;
pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod query;
pub mod server;
pub mod store;
pub mod view;

pub use browser::{Browser, DossierView};
pub use client::{DossierSource, WooClient};
pub use config::Settings;
pub use error::{ErrorKind, Result, WooError};
