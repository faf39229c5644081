use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing_subscriber::EnvFilter;

use parkfind_core::carpark::{Carpark, Position};
use parkfind_core::{geo, load_app_config, AppConfig, Page};
use parkfind_engine::{CarparkStore, QueryError};
use parkfind_feeds::FeedClient;

#[derive(Debug, Parser)]
#[command(name = "parkfind")]
#[command(about = "Find nearby Singapore carparks with live availability")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch all sources once and report the fused entity count.
    Refresh,
    /// List available carparks near a coordinate, ranked by distance.
    Nearby {
        #[arg(long)]
        lat: f64,
        #[arg(long)]
        lon: f64,
        /// Search radius in km; defaults to PARKFIND_DEFAULT_RADIUS_KM.
        #[arg(long)]
        radius_km: Option<f64>,
        /// Cap the ranked result list before paging.
        #[arg(long)]
        limit: Option<usize>,
        /// 1-indexed page to show.
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Show everything known about one facility identifier.
    Lookup { id: String },
    /// Refresh on a fixed interval and keep running until interrupted.
    Watch,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_app_config()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_level))
        .init();

    let cli = Cli::parse();
    let client = FeedClient::new(&config)?;
    let store = CarparkStore::new();

    match cli.command {
        Commands::Refresh => {
            let count = store.refresh(&client).await?;
            println!("fused {count} carparks");
        }
        Commands::Nearby {
            lat,
            lon,
            radius_km,
            limit,
            page,
        } => {
            store.refresh(&client).await?;
            let center = Position::new(lat, lon);
            let radius = radius_km.unwrap_or(config.default_radius_km);
            run_nearby(&store, &config, center, radius, limit, page)?;
        }
        Commands::Lookup { id } => {
            store.refresh(&client).await?;
            match store.lookup_by_id(&id) {
                Ok(carpark) => print_details(&carpark),
                Err(QueryError::NotFound { id }) => println!("no carpark with id {id:?}"),
                Err(err) => return Err(err.into()),
            }
        }
        Commands::Watch => run_watch(config, client, store).await?,
    }

    Ok(())
}

fn run_nearby(
    store: &CarparkStore,
    config: &AppConfig,
    center: Position,
    radius_km: f64,
    limit: Option<usize>,
    page_number: usize,
) -> anyhow::Result<()> {
    anyhow::ensure!(page_number >= 1, "--page is 1-indexed");
    let start = (page_number - 1) * config.page_size;
    let window = Page::new(start, start + config.page_size);

    let (carparks, page) =
        match store.query_nearby_paged(Some(center), Some(radius_km), limit, window) {
            Ok(result) => result,
            Err(QueryError::NoResults) => {
                println!("no carparks with available lots within {radius_km} km");
                return Ok(());
            }
            Err(QueryError::InvalidPage { total, .. }) => {
                println!("page {page_number} is out of range ({total} results)");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

    println!(
        "page {}/{} ({} carparks within {radius_km} km)",
        page.current_page(),
        page.total_pages()?,
        page.total.unwrap_or(0),
    );
    for carpark in &carparks {
        print_row(carpark, center);
    }
    Ok(())
}

fn print_row(carpark: &Carpark, center: Position) {
    // Paged results are always valid entities, but stay defensive about it.
    let address = carpark.address.as_deref().unwrap_or("(no address)");
    let distance_m = carpark
        .position
        .map(|pos| (geo::distance_km(pos, center) * 1000.0).round());
    let total = if carpark.total_lots == 0 {
        "??".to_owned()
    } else {
        carpark.total_lots.to_string()
    };
    match distance_m {
        Some(metres) => println!(
            "{}  {}  lots {}/{}  {}m",
            carpark.id, address, carpark.available_lots, total, metres
        ),
        None => println!(
            "{}  {}  lots {}/{}",
            carpark.id, address, carpark.available_lots, total
        ),
    }
}

fn print_details(carpark: &Carpark) {
    println!("carpark {}", carpark.id);
    if let Some(address) = &carpark.address {
        println!("  address: {address}");
    }
    if let Some(pos) = carpark.position {
        println!("  position: {} {}", pos.latitude, pos.longitude);
    }
    let total = if carpark.total_lots == 0 {
        "??".to_owned()
    } else {
        carpark.total_lots.to_string()
    };
    println!("  lots: {}/{}", carpark.available_lots, total);

    let optional_strings = [
        ("agency", &carpark.agency),
        ("lot type", &carpark.lot_type),
        ("category", &carpark.category),
        ("weekday rate 1", &carpark.weekday_rate_1),
        ("weekday rate 2", &carpark.weekday_rate_2),
        ("saturday rate", &carpark.saturday_rate),
        ("sunday/holiday rate", &carpark.sunday_holiday_rate),
        ("carpark type", &carpark.car_park_type),
        ("parking system", &carpark.parking_system_type),
        ("short-term parking", &carpark.short_term_parking),
        ("free parking", &carpark.free_parking),
    ];
    for (label, value) in optional_strings {
        if let Some(value) = value {
            println!("  {label}: {value}");
        }
    }
    if let Some(night) = carpark.night_parking {
        println!("  night parking: {}", if night { "yes" } else { "no" });
    }
    if let Some(decks) = carpark.decks {
        println!("  decks: {decks}");
    }
    if let Some(height) = carpark.gantry_height {
        println!("  gantry height: {height}m");
    }
    if let Some(basement) = carpark.has_basement {
        println!("  basement: {}", if basement { "yes" } else { "no" });
    }
}

/// Refreshes immediately, then keeps the snapshot fresh on the configured
/// interval until interrupted.
async fn run_watch(
    config: AppConfig,
    client: FeedClient,
    store: CarparkStore,
) -> anyhow::Result<()> {
    let client = Arc::new(client);
    let store = Arc::new(store);

    let count = store.refresh(&client).await?;
    tracing::info!(count, "initial snapshot ready");

    let scheduler = JobScheduler::new().await?;
    let interval = Duration::from_secs(config.refresh_interval_secs);
    let job = Job::new_repeated_async(interval, move |_id, _scheduler| {
        let client = Arc::clone(&client);
        let store = Arc::clone(&store);
        Box::pin(async move {
            if let Err(err) = store.refresh(&client).await {
                // Keep serving the previous snapshot; try again next tick.
                tracing::warn!(error = %err, "scheduled refresh failed");
            }
        })
    })?;
    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!(
        interval_secs = config.refresh_interval_secs,
        "watching; press ctrl-c to stop"
    );
    tokio::signal::ctrl_c().await?;
    Ok(())
}
