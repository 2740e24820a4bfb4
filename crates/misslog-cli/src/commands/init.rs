//! The `misslog init` command.

use std::path::Path;

use anyhow::Result;

use misslog_core::config::{LOCAL_CONFIG_FILE, SAMPLE_CONFIG};

pub fn execute() -> Result<()> {
    if Path::new(LOCAL_CONFIG_FILE).exists() {
        println!("{LOCAL_CONFIG_FILE} already exists, skipping.");
        return Ok(());
    }

    std::fs::write(LOCAL_CONFIG_FILE, SAMPLE_CONFIG)?;
    println!("Created {LOCAL_CONFIG_FILE}");

    println!("\nNext steps:");
    println!("  1. Edit {LOCAL_CONFIG_FILE} to choose where misses are stored");
    println!("  2. Run: misslog add --topic Renal --concept \"Type IV RTA\" --rule \"Hyperkalemic, acidic urine\"");
    println!("  3. Run: misslog weak-tags");

    Ok(())
}
