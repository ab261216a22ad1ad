/*
cargo run --bin create_id_maps

cargo run --bin create_id_maps -- \
    --sources sources.json \
    --log-dir logs
*/

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::info;

use id_maps::{
    logging::init_logging,
    run,
    source::{default_sources, load_sources},
    HttpFetcher,
};

/// Regenerate the NPC and item id maps from the weirdgloop data files.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// JSON array of sources to use instead of the built-in NPC/item pair
    #[arg(long, value_name = "FILE")]
    sources: Option<PathBuf>,

    /// Directory for the run log
    #[arg(long, value_name = "DIR", default_value = "logs")]
    log_dir: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = init_logging(&cli.log_dir)?;

    let sources = match &cli.sources {
        Some(path) => load_sources(path)?,
        None => default_sources(),
    };
    info!("Started - {} source(s), log at {:?}", sources.len(), log_path);

    let fetcher = HttpFetcher::new()?;
    let reports = run(&sources, &fetcher).await?;

    let total: usize = reports.iter().map(|r| r.entries).sum();
    info!("Finished ✅ {total} entries across {} file(s)", reports.len());
    Ok(())
}
