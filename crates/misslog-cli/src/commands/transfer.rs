//! The `misslog export` and `misslog import` commands.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use chrono::Utc;

use misslog_core::snapshot::export_file_name;
use misslog_core::StoreError;

use super::Context;

pub fn export(ctx: &Context, output: Option<PathBuf>) -> Result<()> {
    let store = ctx.open_store();
    let json = store.export_snapshot()?;

    let file_name = export_file_name(Utc::now().date_naive());
    let path = match output {
        Some(p) if p == Path::new("-") => {
            println!("{json}");
            return Ok(());
        }
        Some(p) if p.is_dir() => p.join(file_name),
        Some(p) => p,
        None => PathBuf::from(file_name),
    };

    std::fs::write(&path, json)
        .with_context(|| format!("failed to write export: {}", path.display()))?;
    println!("Exported {} misses to {}", store.len(), path.display());
    Ok(())
}

pub fn import(ctx: &Context, file: PathBuf) -> Result<()> {
    let raw = std::fs::read_to_string(&file)
        .with_context(|| format!("Could not import file: {}", file.display()))?;

    let mut store = ctx.open_store();
    let summary = match store.import_snapshot(&raw) {
        Ok(summary) => summary,
        Err(e @ StoreError::Import(_)) => {
            return Err(anyhow::Error::new(e)
                .context(format!("Could not import file: {}", file.display())));
        }
        Err(e) => return Err(e.into()),
    };

    println!("Imported {} misses", summary.imported);
    if summary.dropped > 0 {
        println!("Skipped {} invalid records", summary.dropped);
    }
    Ok(())
}
