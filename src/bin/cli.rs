//! CrisisConnect CLI
//!
//! Local entry point for searching the volunteer directory with offline
//! fallback.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use crisis_connect::{
    error::Result,
    models::{Config, OpportunityKind, OpportunityRecord, SearchFilters, Urgency},
    services::{
        AggregationService, ConsumerState, FallbackCatalog, LoadOutcome, SubmissionDraft,
        map_pins, pin_position,
    },
};

/// CrisisConnect - volunteer and donation opportunity finder
#[derive(Parser, Debug)]
#[command(
    name = "crisis-connect",
    version,
    about = "Find volunteer and donation opportunities"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone)]
struct FilterArgs {
    /// Free-text keyword
    #[arg(short, long)]
    keyword: Option<String>,

    /// Directory country code
    #[arg(long)]
    country: Option<String>,

    /// Directory area code (repeatable)
    #[arg(long = "area")]
    areas: Vec<String>,

    /// Location substring
    #[arg(short, long)]
    location: Option<String>,

    /// Opportunity type (volunteer, donation)
    #[arg(long = "type")]
    kind: Option<OpportunityKind>,

    /// Urgency (high, medium, low)
    #[arg(long)]
    urgency: Option<Urgency>,

    /// First page to fetch
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    page: i64,
}

impl From<FilterArgs> for SearchFilters {
    fn from(args: FilterArgs) -> Self {
        SearchFilters {
            location: args.location,
            country_code: args.country,
            area_codes: args.areas,
            kind: args.kind,
            urgency: args.urgency,
            keyword: args.keyword,
            page: args.page,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search opportunities, falling back to the sample catalog if needed
    Search {
        #[command(flatten)]
        filters: FilterArgs,

        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,

        /// Print the records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Probe the remote directory
    Status,

    /// Print the fallback catalog
    Catalog {
        /// Print the records as JSON
        #[arg(long)]
        json: bool,
    },

    /// List map pins for a search
    Pins {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Validate a submission draft (JSON) and print its preview
    Draft {
        /// Path to the draft file
        file: PathBuf,
    },

    /// Validate configuration
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn print_record(record: &OpportunityRecord) {
    println!(
        "[{}] {} - {} ({}, {} urgency)",
        record.id, record.title, record.organization, record.location, record.urgency
    );
}

fn print_records(records: &[OpportunityRecord], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(records)?);
    } else {
        records.iter().for_each(print_record);
    }
    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);
    log::debug!("Configuration path: {}", cli.config.display());

    match cli.command {
        Command::Search {
            filters,
            pages,
            json,
        } => {
            let service = Arc::new(AggregationService::from_config(&config)?);
            let state = ConsumerState::new(service);

            state.search(filters.into()).await;
            for _ in 1..pages {
                if state.load_more().await == LoadOutcome::Skipped {
                    log::info!("No more pages");
                    break;
                }
            }

            print_records(&state.records(), json)?;
            log::info!("{}", state.banner());
        }

        Command::Status => {
            let service = AggregationService::from_config(&config)?;
            if service.check_remote_status().await {
                log::info!("✓ Remote directory reachable at {}", config.remote.base_url);
            } else {
                log::warn!(
                    "Remote directory unreachable, searches will use the sample catalog"
                );
            }
        }

        Command::Catalog { json } => {
            let catalog = FallbackCatalog::new(config.catalog.page_size);
            print_records(catalog.records(), json)?;
            log::info!("{} sample opportunities", catalog.records().len());
        }

        Command::Pins { filters } => {
            let service = Arc::new(AggregationService::from_config(&config)?);
            let page = service.fetch(&filters.into(), None).await;
            let pins = map_pins(&page.opportunities);
            for record in &pins {
                let at = pin_position(record);
                println!(
                    "{:>9.4} {:>10.4}  {}",
                    at.latitude, at.longitude, record.title
                );
            }
            log::info!(
                "{} of {} records have coordinates",
                pins.len(),
                page.opportunities.len()
            );
        }

        Command::Draft { file } => {
            let content = std::fs::read_to_string(&file)?;
            let draft: SubmissionDraft = serde_json::from_str(&content)?;
            match draft.preview("draft") {
                Ok(record) => {
                    println!("{}", serde_json::to_string_pretty(&record)?);
                    log::info!("✓ Draft is valid (not submitted anywhere)");
                }
                Err(e) => {
                    log::error!("Draft rejected: {}", e);
                    return Err(e);
                }
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
        }
    }

    Ok(())
}
