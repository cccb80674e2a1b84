//! HTTP surface for the Woogle portal.
//!
//! Provides:
//! - `/api/municipalities`: relay of the municipalities infobox with permissive CORS
//! - `/api/search`: result view model for a URL query string
//! - `/api/dossiers/:pid`: dossier detail view model

mod handlers;
mod routes;

pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::browser::Browser;
use crate::client::WooClient;
use crate::config::Settings;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub browser: Arc<Browser>,
    pub client: Arc<WooClient>,
}

impl AppState {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let client = Arc::new(WooClient::new(settings)?);
        let browser = Browser::new(client.clone(), settings);

        Ok(Self {
            browser: Arc::new(browser),
            client,
        })
    }
}

/// Start the web server.
pub async fn serve(settings: &Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(settings)?;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!(
        "Starting server at http://{} ({} mode, publisher {})",
        addr,
        settings.mode,
        settings.publisher
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
