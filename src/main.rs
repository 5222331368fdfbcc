mod catalog;
mod config;
mod error;
mod export;
mod probe;
mod registry;
mod site;
mod tiles;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::Settings;
use crate::probe::ProbeStatus;
use crate::registry::SiteRegistry;
use crate::site::LayerKind;

#[derive(Parser)]
#[command(
    name = "minesite",
    about = "Site registry for the mine orthoimage map widget"
)]
struct Cli {
    /// Catalog JSON file to load instead of the built-in site table
    #[arg(short, long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered sites
    List {
        /// Print only the site keys
        #[arg(short, long)]
        keys_only: bool,
    },

    /// Show a site record as JSON
    Show {
        /// Site key, as used in ?site=<key>
        key: String,
    },

    /// Print the tile URL covering a site's center
    Tile {
        key: String,

        /// Tile zoom level (defaults to the site's zoom)
        #[arg(short, long, value_parser = zoom_parser())]
        zoom: Option<u32>,
    },

    /// Print where the upload service publishes a site's tiles and overlays
    Urls {
        key: String,

        /// Only print the overlay of this layer type (e.g. nfz-daily)
        #[arg(short, long)]
        layer: Option<LayerKind>,
    },

    /// Export the registry as JSON for the web widget
    Export {
        /// Output JSON file path
        #[arg(short, long, default_value = config::EXPORT_PATH)]
        output: String,
    },

    /// Check that a site's center tile and overlays are reachable
    Probe {
        key: String,

        /// Tile zoom level (defaults to the site's zoom)
        #[arg(short, long, value_parser = zoom_parser())]
        zoom: Option<u32>,
    },
}

fn zoom_parser() -> clap::builder::RangedI64ValueParser<u32> {
    clap::value_parser!(u32).range(0..=i64::from(config::MAX_ZOOM))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_registry(catalog: Option<&PathBuf>, settings: &Settings) -> Result<SiteRegistry> {
    match catalog {
        Some(path) => SiteRegistry::load(path, settings).context("Failed to load catalog"),
        None => SiteRegistry::builtin(settings).context("Built-in catalog is invalid"),
    }
}

fn build_client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .user_agent(config::USER_AGENT)
        .build()?)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let settings = Settings::from_env();
    let registry = load_registry(cli.catalog.as_ref(), &settings)?;

    match cli.command {
        Commands::List { keys_only } => {
            if keys_only {
                for key in registry.list_keys() {
                    println!("{key}");
                }
            } else {
                for site in registry.iter() {
                    println!("{:<16} {:<16} {}", site.key, site.name, site.company);
                }
            }
        }

        Commands::Show { key } => {
            let site = registry.get(&key)?;
            println!("{}", serde_json::to_string_pretty(site)?);
        }

        Commands::Tile { key, zoom } => {
            let site = registry.get(&key)?;
            println!("{}", tiles::center_tile_url(site, zoom));
        }

        Commands::Urls { key, layer } => {
            // Keys unknown to the registry are still valid upload targets.
            if !registry.contains(&key) {
                tracing::warn!("'{key}' is not in the registry");
            }
            match layer {
                Some(kind) => println!("{}", site::kml_url(&settings.cf_base, &key, kind)),
                None => {
                    println!("{:<15} {}", "tile", tiles::cdn_template(&settings.cf_base, &key));
                    for kind in LayerKind::ALL {
                        println!("{kind:<15} {}", site::kml_url(&settings.cf_base, &key, kind));
                    }
                }
            }
        }

        Commands::Export { output } => {
            if registry.is_empty() {
                anyhow::bail!("Refusing to export an empty registry");
            }
            export::export_json(&registry, &output)?;
        }

        Commands::Probe { key, zoom } => {
            let site = registry.get(&key)?;
            let client = build_client()?;
            let results = probe::probe_site(&client, site, zoom).await;
            let failures = results
                .iter()
                .filter(|r| !matches!(r.status, ProbeStatus::Ok(_)))
                .count();
            for r in &results {
                println!("{:<15} {:<12} {}", r.label, r.status.to_string(), r.url);
            }
            if failures > 0 {
                anyhow::bail!("{failures}/{} URLs for '{key}' are unreachable", results.len());
            }
        }
    }

    Ok(())
}
