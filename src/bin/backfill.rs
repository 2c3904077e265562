//! CLI tool that loads recent NYC motor vehicle collisions into the
//! `crashes` table.
//!
//! ```text
//! cargo run --bin backfill -- --days=365 --limit=50000
//! ```

use runsafe::db::incident_queries::{count_crashes, insert_crash};
use runsafe::db::{create_pool, lookback_cutoff};
use runsafe::services::collision_feed::{CollisionFeedClient, NYC_COLLISIONS_URL};
use std::env;
use std::time::{Duration, Instant};

const DEFAULT_DAYS_BACK: u32 = 365;
const DEFAULT_LIMIT: usize = 50_000;
const FEED_TIMEOUT_SECS: u64 = 120;

fn print_help() {
    eprintln!(
        "\
Usage: backfill [OPTIONS]

Fetch recent collisions from the NYC open-data feed and store them in Postgres.
Requires DATABASE_URL.

Options:
  --days=N         Lookback window in days (default: {})
  --limit=N        Maximum rows to fetch (default: {})
  --url=URL        Feed endpoint (default: {})
  --help           Show this help message",
        DEFAULT_DAYS_BACK, DEFAULT_LIMIT, NYC_COLLISIONS_URL
    );
}

fn arg_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter().find_map(|a| a.strip_prefix(name))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--help") {
        print_help();
        return Ok(());
    }

    let days_back: u32 = match arg_value(&args, "--days=") {
        Some(raw) => raw.parse().map_err(|_| "Invalid --days value")?,
        None => DEFAULT_DAYS_BACK,
    };
    let limit: usize = match arg_value(&args, "--limit=") {
        Some(raw) => raw.parse().map_err(|_| "Invalid --limit value")?,
        None => DEFAULT_LIMIT,
    };
    let url = arg_value(&args, "--url=").unwrap_or(NYC_COLLISIONS_URL);
    let database_url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?;

    let start_time = Instant::now();
    let pool = create_pool(&database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let since = lookback_cutoff(days_back);
    eprintln!("[1/2] Fetching up to {} collisions since {}...", limit, since);
    let feed = CollisionFeedClient::new(url.to_string(), Duration::from_secs(FEED_TIMEOUT_SECS))?;
    let rows = feed.fetch_since(since, limit).await?;
    eprintln!("  {} rows received", rows.len());

    eprintln!("[2/2] Writing to database...");
    let mut inserted = 0usize;
    let mut duplicates = 0usize;
    let mut skipped = 0usize;
    let mut failed = 0usize;

    for row in &rows {
        let Some(record) = row.to_record() else {
            skipped += 1;
            continue;
        };
        match insert_crash(&pool, &record).await {
            Ok(true) => inserted += 1,
            Ok(false) => duplicates += 1,
            Err(e) => {
                failed += 1;
                eprintln!("  Error inserting crash {}: {}", record.collision_id, e);
            }
        }
    }

    let total = count_crashes(&pool).await?;
    eprintln!();
    eprintln!(
        "Done in {:.1}s: {} inserted, {} already present, {} skipped, {} failed ({} crashes stored)",
        start_time.elapsed().as_secs_f64(),
        inserted,
        duplicates,
        skipped,
        failed,
        total
    );

    Ok(())
}
