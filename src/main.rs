use std::error::Error;
use std::fs::File;
use std::io::BufReader;

use ecowatch_aqi::reading::{parse_readings, summarize};
use ecowatch_aqi::DashboardConfig;

const USAGE: &str = "usage: ecowatch_aqi <readings.csv> [config.json]";

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let readings_path = args.next().ok_or(USAGE)?;
    let config = match args.next() {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .init();

    let file = File::open(&readings_path)?;
    let (readings, rejected) = parse_readings(BufReader::new(file))?;
    tracing::info!(
        path = %readings_path,
        accepted = readings.len(),
        rejected = rejected.len(),
        "readings loaded"
    );

    let summary = summarize(&readings, &config);
    tracing::info!(
        scored = summary.rows.len(),
        skipped = summary.skipped,
        "readings scored"
    );
    println!("{summary}");

    Ok(())
}
