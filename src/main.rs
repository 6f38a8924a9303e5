use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use property_scout::geo::{NominatimClient, PostcodesClient};
use property_scout::location::{
    LocalStorage, LocationResolver, RecentLocations, SuggestionFetcher, SuggestionUpdate,
};
use property_scout::search::SearchObserver;
use property_scout::{
    Config, LocationSearch, MappedProperty, Resolution, ScoutSession, SearchFilters,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "property-scout", version, about = "Search UK property listings by postcode or place")]
struct Cli {
    /// TOML config file
    #[arg(long, global = true, env = "PROPERTY_SCOUT_CONFIG")]
    config: Option<PathBuf>,

    /// Use built-in fake listings instead of the metered API
    #[arg(long, global = true)]
    mock: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a postcode or place name to coordinates and a label
    Resolve { term: String },
    /// Show place suggestions for partial input
    Suggest { text: String },
    /// Resolve a location and search listings around it
    Search {
        term: String,
        #[command(flatten)]
        filters: FilterArgs,
        /// Write results as JSON to this file
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List (or clear) recently searched locations
    Recent {
        #[arg(long)]
        clear: bool,
    },
    /// Interactive session: one location per line, `!N` re-runs recent entry N
    Session {
        #[command(flatten)]
        filters: FilterArgs,
    },
}

#[derive(Args, Clone, Default)]
struct FilterArgs {
    #[arg(long = "type")]
    property_type: Option<String>,
    #[arg(long)]
    min_price: Option<i64>,
    #[arg(long)]
    max_price: Option<i64>,
    #[arg(long)]
    min_beds: Option<u32>,
    #[arg(long)]
    max_beds: Option<u32>,
    #[arg(long)]
    min_baths: Option<u32>,
    #[arg(long)]
    max_baths: Option<u32>,
    #[arg(long)]
    min_sqft: Option<u32>,
    #[arg(long)]
    max_sqft: Option<u32>,
    /// Radius in miles
    #[arg(long)]
    radius: Option<f64>,
}

impl FilterArgs {
    fn into_filters(self) -> SearchFilters {
        SearchFilters {
            property_type: self.property_type,
            min_price: self.min_price,
            max_price: self.max_price,
            min_bedrooms: self.min_beds,
            max_bedrooms: self.max_beds,
            min_bathrooms: self.min_baths,
            max_bathrooms: self.max_baths,
            min_square_feet: self.min_sqft,
            max_square_feet: self.max_sqft,
            radius: self.radius,
            ..Default::default()
        }
    }
}

/// Logs the bracketing callbacks as a stand-in for a loading indicator
struct ConsoleObserver;

impl SearchObserver for ConsoleObserver {
    fn on_search_start(&self, term: &str) {
        info!("⏳ Searching listings near {}...", term);
    }

    fn on_search_complete(&self, term: &str) {
        info!("Search near {} finished", term);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if cli.mock {
        config.use_mock_data = true;
    }

    match cli.command {
        Command::Resolve { term } => {
            let resolver = LocationResolver::new(
                Arc::new(NominatimClient::new(&config.endpoints)?),
                Arc::new(PostcodesClient::new(&config.endpoints)?),
            );
            match resolver.resolve(&term).await {
                Resolution::Resolved(location) => {
                    println!("{}", location.label);
                    println!("   {:.5}, {:.5}", location.latitude, location.longitude);
                    if let Some(postcode) = &location.postcode {
                        println!("   Postcode: {}", postcode);
                    }
                }
                Resolution::NotFound => println!("Location not found"),
                Resolution::TransientError(e) => println!("Lookup failed: {}", e),
            }
        }
        Command::Suggest { text } => {
            let geocoder = Arc::new(NominatimClient::new(&config.endpoints)?);
            let fetcher = SuggestionFetcher::new(geocoder, config.suggestions.clone());
            if fetcher.on_input(&text).await == SuggestionUpdate::Cleared {
                println!("Type at least {} characters", config.suggestions.min_chars);
            }
            for suggestion in fetcher.suggestions() {
                println!("{}  ({})", suggestion.name, suggestion.display_name);
            }
        }
        Command::Search {
            term,
            filters,
            output,
        } => {
            let mut session = ScoutSession::from_config(&config).await?;
            session.filters = filters.into_filters();
            let result = session.search_location(&term, &ConsoleObserver).await;
            report(&result);

            if let (Some(path), LocationSearch::Searched { outcome, .. }) = (output, &result) {
                let json = serde_json::to_string_pretty(outcome.properties())?;
                tokio::fs::write(&path, json).await?;
                info!("💾 Saved results to {}", path.display());
            }
        }
        Command::Recent { clear } => {
            let storage = LocalStorage::open(config.storage_path()?).await;
            let mut recent = RecentLocations::load(storage);
            if clear {
                recent.clear().await?;
                println!("Recent locations cleared");
            }
            for (i, label) in recent.items().iter().enumerate() {
                println!("{}. {}", i + 1, label);
            }
        }
        Command::Session { filters } => {
            let mut session = ScoutSession::from_config(&config).await?;
            session.filters = filters.into_filters();
            run_interactive(&mut session).await?;
        }
    }

    Ok(())
}

/// `RUST_LOG` directives when set and valid, otherwise `info`
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

async fn run_interactive(session: &mut ScoutSession) -> Result<()> {
    println!("Enter a postcode or place (Ctrl-D to quit).");
    for (i, label) in session.recent().iter().enumerate() {
        println!("  !{} {}", i + 1, label);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let result = match line.strip_prefix('!').and_then(|n| n.parse::<usize>().ok()) {
            Some(n) if n > 0 => match session.search_recent(n - 1, &ConsoleObserver).await {
                Some(result) => result,
                None => {
                    println!("No recent location {}", n);
                    continue;
                }
            },
            _ => session.search_location(line, &ConsoleObserver).await,
        };
        report(&result);
        println!(
            "({} searches left this session)",
            session.orchestrator().remaining_searches()
        );
    }
    Ok(())
}

fn report(result: &LocationSearch) {
    if let Some(message) = result.message() {
        println!("{}", message);
    }
    if let LocationSearch::Searched { location, outcome } = result {
        println!("\n✅ {} listings near {}\n", outcome.properties().len(), location.label);
        for (i, property) in outcome.properties().iter().enumerate() {
            print_property(i + 1, property);
        }
    }
}

fn print_property(n: usize, property: &MappedProperty) {
    println!("{}. {} (£{})", n, property.address, property.price);
    println!(
        "   {} · {} bed{}",
        property.property_type,
        property.bedrooms,
        property
            .bathrooms
            .map(|b| format!(", {} bath", b))
            .unwrap_or_default()
    );
    if let Some(sqft) = property.square_feet {
        println!("   {} sq ft", sqft);
    }
    println!(
        "   Est. rent £{:.0}/month, gross yield {:.1}%",
        property.estimated_monthly_rent, property.estimated_roi
    );
    if let Some(agent) = &property.agent {
        println!("   Agent: {}", agent);
    }
    println!("   ID: {}", property.id);
    println!();
}
