use std::path::PathBuf;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use crate::{
    extract::{parse_records, unwrap_payload},
    fetch::Fetch,
    output::write_output,
    render::render,
    source::SourceDescriptor,
};

/// Outcome of one source: where it went and how many records made it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub output: PathBuf,
    pub entries: usize,
    pub skipped: usize,
}

/// Fetch, parse, render and write every source, strictly in order.
///
/// The first failure ends the run; sources after it are left untouched.
pub async fn run<F: Fetch>(sources: &[SourceDescriptor], fetcher: &F) -> Result<Vec<SyncReport>> {
    let bar = ProgressBar::new(sources.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?,
    );

    let mut reports = Vec::with_capacity(sources.len());
    for source in sources {
        bar.set_message(source.output.display().to_string());
        let report = sync_source(source, fetcher)
            .await
            .with_context(|| format!("{} -> {}", source.url, source.output.display()))?;
        reports.push(report);
        bar.inc(1);
    }
    bar.finish_and_clear();

    Ok(reports)
}

pub async fn sync_source<F: Fetch>(source: &SourceDescriptor, fetcher: &F) -> Result<SyncReport> {
    info!("Fetching {}", source.url);
    let raw = fetcher.fetch(&source.url).await?;

    let records = parse_records(unwrap_payload(&raw)?)?;
    info!("{}: {} records", source.url, records.len());

    let rendered = render(&records, source)?;
    write_output(&rendered.text, rendered.entries, &source.output)?;
    info!(
        "{}: {} entries, {} skipped",
        source.output.display(),
        rendered.entries,
        rendered.skipped
    );

    Ok(SyncReport {
        output: source.output.clone(),
        entries: rendered.entries,
        skipped: rendered.skipped,
    })
}
