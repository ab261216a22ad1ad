use std::{fs, path::Path};

use anyhow::{Context, Result};
use log::info;

/// Overwrite `path` with `text`. The parent directory has to exist already.
pub fn write_output(text: &str, entries: usize, path: &Path) -> Result<()> {
    fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;

    let msg = confirmation(path, entries);
    info!("{msg}");
    println!("{msg}");
    Ok(())
}

fn confirmation(path: &Path, entries: usize) -> String {
    format!("Conversion completed. {entries} entries written to {}", path.display())
}
