mod cli;

use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use woogle::browser::{Browser, DossierView};
use woogle::config::{expand_catalog, load_settings};
use woogle::view::{ResultStatus, ViewModel};
use woogle::WooClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("woogle=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings = load_settings().await;
    if let Some(publisher) = cli.publisher {
        settings.publisher = publisher;
    }
    if let Some(ref catalog) = cli.catalog {
        settings.catalog = Some(expand_catalog(catalog));
    }
    if let Some(locale) = cli.locale {
        settings.locale = locale;
    }

    match cli.command {
        Commands::Serve { host, port } => woogle::server::serve(&settings, &host, port).await,
        Commands::Search {
            query_string,
            mode,
            json,
        } => {
            if let Some(mode) = mode {
                settings.mode = mode;
            }
            let client = WooClient::new(&settings).context("creating API client")?;
            let browser = Browser::new(Arc::new(client), &settings);
            let Some(view) = browser.navigate(&query_string).await else {
                bail!("search was superseded");
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print_results(&view);
            }
            match view.status {
                ResultStatus::Ready => Ok(()),
                ResultStatus::Unavailable { message } | ResultStatus::InvalidData { message } => {
                    bail!(message)
                }
            }
        }
        Commands::Dossier { pid, json } => {
            let client = WooClient::new(&settings).context("creating API client")?;
            let browser = Browser::new(Arc::new(client), &settings);
            let view = browser.dossier(&pid).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            }
            match view {
                DossierView::Found(detail) => {
                    if !json {
                        println!("{}", detail.page_title);
                        println!("  {} | {} | {}", detail.type_name, detail.publisher, detail.year);
                        println!("  {}", detail.links.view);
                        for group in &detail.groups {
                            println!("\n{}", group.label);
                            for file in &group.files {
                                println!("  - {} ({}, {})", file.name, file.format, file.pages);
                            }
                        }
                    }
                    Ok(())
                }
                DossierView::NotFound { pid } => bail!("dossier {} not found", pid),
                DossierView::Unavailable { message } => bail!(message),
            }
        }
        Commands::Municipalities => {
            let client = WooClient::new(&settings).context("creating API client")?;
            for municipality in client.municipalities().await? {
                println!("{:<10} {}", municipality.prefix, municipality.name);
            }
            Ok(())
        }
    }
}

fn print_results(view: &ViewModel) {
    println!("{}", view.caption);
    for item in &view.items {
        println!("\n{} [{}]", item.title, item.type_name);
        println!("  {} | {}", item.id, item.published_date);
        if !item.description.is_empty() {
            println!("  {}", item.description);
        }
        for file in &item.matching_files {
            println!("  > {}", file.name);
        }
    }
    if view.pagination.is_visible() {
        println!(
            "\nPage {} of {}",
            view.pagination.current, view.pagination.total_pages
        );
    }
}
