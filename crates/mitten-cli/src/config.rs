use clap::{ArgGroup, Parser, Subcommand};
use mitten_core::config::DEFAULT_OVERPASS_URL;
use mitten_core::{Category, Region};
use std::path::PathBuf;

/// CLI configuration parsed from command line arguments and environment variables
#[derive(Parser, Debug)]
#[command(name = "mitten")]
#[command(
    author,
    version,
    about = "Michigan attractions harvester for OpenStreetMap and DNR open data"
)]
#[command(after_help = "Examples:
  mitten fetch --region upper-peninsula
  mitten fetch --city marquette --category waterfalls
  mitten fetch --all
  mitten stats")]
pub struct Config {
    /// Path to the JSON attraction store
    #[arg(
        long,
        env = "MITTEN_STORE",
        default_value = "michigan_attractions_database.json"
    )]
    pub store: PathBuf,

    /// Overpass interpreter endpoint
    #[arg(long, env = "MITTEN_OVERPASS_URL", default_value = DEFAULT_OVERPASS_URL)]
    pub overpass_url: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch attractions for an area and merge them into the store
    #[command(group(ArgGroup::new("area").required(true).args(["all", "region", "city"])))]
    #[command(after_help = "Examples:
  mitten fetch --region lower-peninsula            # One regional box, single request
  mitten fetch --city traverse-city                # 0.4 degree window around a city
  mitten fetch --all                               # Statewide 3x4 partition sweep
  mitten fetch --region up --category lighthouses  # Targeted query for one category")]
    Fetch {
        /// Sweep the whole state as a 3x4 grid of partitions
        #[arg(long)]
        all: bool,

        /// Fetch one region in a single request (upper-peninsula, lower-peninsula, entire-state)
        #[arg(short, long, value_name = "REGION")]
        region: Option<Region>,

        /// Fetch a window around a known city
        #[arg(short, long, value_name = "CITY")]
        city: Option<String>,

        /// Restrict the harvest to one category
        #[arg(long, value_name = "CATEGORY")]
        category: Option<Category>,

        /// Custom path to a sources.toml listing DNR CSV downloads
        #[arg(long, value_name = "PATH")]
        sources: Option<PathBuf>,
    },
    /// Show store statistics
    Stats,
}
