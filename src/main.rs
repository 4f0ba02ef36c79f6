use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use wanderpin::application::AlbumService;
use wanderpin::domain::entities::{Pin, PinRegistry};
use wanderpin::infrastructure::{
    AppConfig, BlobStore, CliArgs, FlickrSearchClient, ImageFetcher, Journal, PhotoCacheStore,
};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry().with(filter).init();
    }

    Ok(())
}

/// Finds the pin at the requested coordinate or places a new one.
async fn resolve_pin(
    registry: &mut PinRegistry,
    store: &PhotoCacheStore,
    lat: f64,
    lon: f64,
) -> Result<Pin> {
    if let Some(existing) = registry.find_at(lat, lon) {
        return Ok(existing.clone());
    }

    let pin = registry.place(lat, lon)?;
    store.register_pin(&pin).await;
    store.commit().await?;
    info!(pin = %pin.id, coordinate = %pin.coordinate, "Placed new pin");
    Ok(pin)
}

async fn run(args: CliArgs, config: AppConfig) -> Result<()> {
    let cache_dir = config
        .effective_cache_dir()
        .ok_or_else(|| eyre!("could not determine a cache directory"))?;

    let journal = Journal::at_path(cache_dir.join("journal.toml"));
    let blobs = BlobStore::new(cache_dir.join("blobs")).await?;
    let store = Arc::new(PhotoCacheStore::open(journal, blobs).await?);

    let mut registry = PinRegistry::new();
    for pin in store.pins().await {
        registry.restore(pin);
    }

    let pin = resolve_pin(&mut registry, &store, args.lat, args.lon).await?;

    if config.search.api_key.is_empty() {
        warn!("No API key configured; set FLICKR_API_KEY or [search] api_key");
    }

    let search = Arc::new(FlickrSearchClient::new(config.search.clone())?);
    let fetcher = Arc::new(ImageFetcher::new(config.fetch_timeout_secs)?);
    let service = AlbumService::new(
        search,
        fetcher,
        Arc::clone(&store),
        config.max_concurrent_downloads,
    );

    let report = if args.refresh {
        Some(service.refresh(&pin).await?)
    } else {
        service.ensure_photos(&pin).await?
    };

    match report {
        Some(report) => {
            println!(
                "Pin {} at {}: discovered {}, downloaded {}, failed {}",
                pin.id, pin.coordinate, report.discovered, report.downloaded, report.failed
            );
            if report.commit_failures > 0 {
                println!(
                    "Warning: {} persistence commit(s) failed; see log",
                    report.commit_failures
                );
            }
            if report.discovered == 0 {
                println!("No images found for this location.");
            }
        }
        None => {
            println!(
                "Pin {} already holds {} photos (pass --refresh for a new collection)",
                pin.id,
                store.record_count(pin.id).await
            );
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();
    let config = AppConfig::load(&args);

    init_logging(&config)?;

    info!(version = wanderpin::VERSION, "Starting wanderpin");

    run(args, config).await
}
