use clap::Parser;
use dotenvy::dotenv;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use mitten_harvest::{Command, Config};
use mitten_client::overpass::{build_query, parse_elements};
use mitten_client::{DnrClient, OverpassClient};
use mitten_core::{
    load_sources_config, AppError, Category, City, DnrConfig, FetchOutcome, IngestStats,
    NewAttraction, OverpassConfig, Region, RegionSelection,
};
use mitten_store::AttractionStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Setup logging (stderr to keep stdout clean for stats output)
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    // Parse command line arguments
    let config = Config::parse();

    let store = AttractionStore::new(&config.store);

    // Execute command
    match config.command {
        Command::Fetch {
            all,
            region,
            city,
            category,
            sources,
        } => {
            let selection = resolve_selection(all, region, city.as_deref())
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            let overpass_config = OverpassConfig {
                endpoint: config.overpass_url.clone(),
                ..OverpassConfig::default()
            };
            fetch(&store, &overpass_config, selection, category, sources.as_deref()).await?;
        }
        Command::Stats => {
            show_stats(&store).await?;
        }
    }

    Ok(())
}

/// Resolve the mutually exclusive area flags into an area selection
fn resolve_selection(
    all: bool,
    region: Option<Region>,
    city: Option<&str>,
) -> Result<RegionSelection, AppError> {
    if all {
        return Ok(RegionSelection::FullGrid);
    }
    if let Some(region) = region {
        return Ok(RegionSelection::Region(region));
    }
    if let Some(name) = city {
        return match City::find(name) {
            Some(city) => Ok(RegionSelection::Locality(city)),
            None => Err(AppError::UnknownCity(name.to_string())),
        };
    }
    // clap requires exactly one area flag, so this arm is unreachable from
    // the command line
    Err(AppError::Generic("No area selected".to_string()))
}

/// Fetch attractions for the selected area and merge them into the store
async fn fetch(
    store: &AttractionStore,
    overpass_config: &OverpassConfig,
    selection: RegionSelection,
    category: Option<Category>,
    sources_path: Option<&Path>,
) -> anyhow::Result<()> {
    // Resolve the DNR source registry up front; a bad --sources path is an
    // input error and aborts before any fetching
    let sources =
        load_sources_config(sources_path).map_err(|e| anyhow::anyhow!(e.user_message()))?;

    let windows = selection.windows();
    let total = windows.len();
    info!("Starting fetch across {} window(s)", total);

    let overpass =
        OverpassClient::new(overpass_config).map_err(|e| anyhow::anyhow!(e.user_message()))?;
    let mut stats = IngestStats::new();
    let mut candidates: Vec<NewAttraction> = Vec::new();

    // Overpass windows, paced to stay polite to the public endpoint
    for (i, window) in windows.iter().enumerate() {
        let query = build_query(window, category, overpass.query_timeout_secs());
        match overpass.fetch_elements(&query).await {
            Ok(elements) => {
                let parsed = parse_elements(elements, category);
                info!(
                    "[{}/{}] ✓ Window {}: {} candidate(s)",
                    i + 1,
                    total,
                    window.overpass_bounds(),
                    parsed.len()
                );
                stats.record_window(FetchOutcome::Fetched(parsed.len()));
                candidates.extend(parsed);
            }
            Err(e) => {
                error!(
                    "[{}/{}] Skipping window {}: {}",
                    i + 1,
                    total,
                    window.overpass_bounds(),
                    e
                );
                stats.record_window(FetchOutcome::Skipped);
            }
        }
        tokio::time::sleep(overpass_config.chunk_pacing).await;
    }

    // DNR CSV sources, with the category filter applied after parsing
    if !sources.is_empty() {
        let dnr = DnrClient::new(&DnrConfig::default())
            .map_err(|e| anyhow::anyhow!(e.user_message()))?;
        for source in &sources {
            match dnr.load_source(source).await {
                Ok(mut parsed) => {
                    if let Some(filter) = category {
                        parsed.retain(|c| c.category == filter);
                    }
                    info!("✓ DNR {}: {} candidate(s)", source.key, parsed.len());
                    stats.record_source(FetchOutcome::Fetched(parsed.len()));
                    candidates.extend(parsed);
                }
                Err(e) => {
                    error!("Skipping DNR source {}: {}", source.key, e);
                    stats.record_source(FetchOutcome::Skipped);
                }
            }
        }
    }

    info!(
        "Gathered {} candidate(s) from {} window(s) and {} DNR source(s)",
        stats.candidates, stats.windows_fetched, stats.sources_loaded
    );

    // One merge for the whole run so in-batch duplicates collapse too
    let report = store
        .merge(candidates)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    info!(
        "Fetch complete: {} added, {} duplicate(s) skipped, {} total in store",
        report.added, report.duplicates, report.total
    );
    if stats.windows_skipped > 0 || stats.sources_skipped > 0 {
        info!(
            "Skipped along the way: {} window(s), {} DNR source(s)",
            stats.windows_skipped, stats.sources_skipped
        );
    }

    Ok(())
}

/// Show store statistics
async fn show_stats(store: &AttractionStore) -> anyhow::Result<()> {
    let records = store.load().await;

    let mut by_category: BTreeMap<&str, usize> = BTreeMap::new();
    let mut by_source: BTreeMap<&str, usize> = BTreeMap::new();
    for record in &records {
        *by_category.entry(record.category.label()).or_default() += 1;
        *by_source.entry(record.source.label()).or_default() += 1;
    }

    println!("\n📊 Store Statistics\n");
    println!("  Store file:        {}", store.path().display());
    println!("  Total attractions: {}", records.len());
    if !by_category.is_empty() {
        println!("\n  By category:");
        for (label, count) in &by_category {
            println!("    {:<26} {}", label, count);
        }
        println!("\n  By source:");
        for (label, count) in &by_source {
            println!("    {:<26} {}", label, count);
        }
    }
    println!();

    Ok(())
}
