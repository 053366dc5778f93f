use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

use wca_scraper::config::Config;
use wca_scraper::{logging, pipeline, rankings, registrations};

#[derive(Parser)]
#[command(name = "wca_scraper")]
#[command(about = "Competitor rankings report generator for WCA competitions")]
#[command(version = "0.1.0")]
struct Cli {
    /// Competition ID to report on (overrides config.toml)
    #[arg(long)]
    competition: Option<String>,
    /// Directory the report CSV is written to (overrides config.toml)
    #[arg(long)]
    output_dir: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    logging::init_logging();

    let cli = Cli::parse();
    let mut config = Config::load()?;
    if let Some(competition) = cli.competition {
        config.competition_id = competition;
    }
    if let Some(output_dir) = cli.output_dir {
        config.output_dir = output_dir;
    }

    let started = Instant::now();

    println!("📥 Preparing WCA rankings export...");
    let rankings_path = rankings::ensure_rankings_file(Path::new(&config.cache_dir)).await?;
    let rankings = rankings::group_by_person(rankings::load_rankings(&rankings_path)?);

    println!("🔎 Scraping registrations for {}...", config.competition_id);
    let registrants = registrations::fetch_registrations(&config.competition_id).await?;

    println!("🔧 Building rankings report...");
    let (report, stats) = pipeline::build_report(&registrants, &rankings, &config.main_event)?;

    let output_file = PathBuf::from(&config.output_dir)
        .join(format!("{}_competitor_rankings.csv", config.competition_id));
    report.write_csv(&output_file)?;
    info!("Report written to {}", output_file.display());

    println!("\n📊 Report for {}:", config.competition_id);
    println!("   Registrants: {}", stats.registrants);
    println!("   Matched: {}", stats.matched);
    println!("   Skipped (no WCA ID): {}", stats.skipped_unregistered);
    println!("   Skipped (no ranking history): {}", stats.skipped_no_history);
    println!("   Output file: {}", output_file.display());
    println!("   Elapsed: {:.2}s", started.elapsed().as_secs_f64());

    Ok(())
}
