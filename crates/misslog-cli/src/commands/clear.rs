//! The `misslog clear` command.

use std::io::{self, BufRead, Write};

use anyhow::Result;

use super::Context;

pub fn execute(ctx: &Context, yes: bool) -> Result<()> {
    let mut store = ctx.open_store();
    if !yes && !store.is_empty() && !confirm(store.len())? {
        println!("Aborted, nothing was deleted.");
        return Ok(());
    }

    let removed = store.len();
    store.clear()?;
    println!("Cleared {removed} misses.");
    Ok(())
}

fn confirm(count: usize) -> Result<bool> {
    print!("Clear all {count} misses? This cannot be undone. [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
