use clap::{Parser, Subcommand};

use woogle::engine::SearchMode;
use woogle::view::Locale;

#[derive(Parser)]
#[command(
    name = "woogle",
    about = "Search and browse disclosed Woo dossiers",
    version
)]
pub struct Cli {
    /// Publisher prefix (overrides config)
    #[arg(long, global = true, env = "WOOGLE_PUBLISHER")]
    pub publisher: Option<String>,

    /// Catalog URL or JSON file for local mode (overrides config)
    #[arg(long, global = true, env = "WOOGLE_CATALOG")]
    pub catalog: Option<String>,

    /// Output language (nl or en)
    #[arg(long, global = true, env = "WOOGLE_LOCALE")]
    pub locale: Option<Locale>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the relay and JSON endpoints
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1", env = "WOOGLE_HOST")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value_t = 3000, env = "WOOGLE_PORT")]
        port: u16,
    },

    /// Print a result page for a URL query string (e.g. "q=parkeren&type=2k")
    Search {
        /// Query string as found in the portal URL
        #[arg(default_value = "")]
        query_string: String,

        /// Filter locally or on the server
        #[arg(long, env = "WOOGLE_MODE")]
        mode: Option<SearchMode>,

        /// Print the view model as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single dossier
    Dossier {
        /// Dossier identifier, e.g. nl.gm0268.2i.2023.12
        pid: String,

        /// Print the view model as JSON
        #[arg(long)]
        json: bool,
    },

    /// List municipalities publishing Woo dossiers
    Municipalities,
}
