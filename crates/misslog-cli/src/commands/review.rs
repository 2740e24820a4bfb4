//! Read-only review views: `topics`, `tags`, `weak-tags`, and `stats`.

use anyhow::Result;
use comfy_table::{Cell, Table};

use super::Context;

pub fn topics(ctx: &Context) -> Result<()> {
    for topic in ctx.open_store().topics_in_use() {
        println!("{topic}");
    }
    Ok(())
}

pub fn tags(ctx: &Context) -> Result<()> {
    for tag in ctx.open_store().tags_in_use() {
        println!("{tag}");
    }
    Ok(())
}

pub fn weak_tags(ctx: &Context, limit: Option<usize>) -> Result<()> {
    let limit = limit.unwrap_or(ctx.config.weak_tag_limit);
    let ranking = ctx.open_store().weak_tag_ranking(limit);

    if ranking.is_empty() {
        println!("No tags yet. Add tags to your misses to see weak spots.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Tag", "Misses"]);
    for (rank, entry) in ranking.iter().enumerate() {
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(&entry.tag),
            Cell::new(entry.count),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn stats(ctx: &Context) -> Result<()> {
    let store = ctx.open_store();
    let breakdown = store.why_missed_breakdown();

    let mut table = Table::new();
    table.set_header(vec!["Why missed", "Misses", "Share"]);
    for row in &breakdown {
        let share = if store.is_empty() {
            0.0
        } else {
            row.count as f64 / store.len() as f64 * 100.0
        };
        table.add_row(vec![
            Cell::new(row.why_missed),
            Cell::new(row.count),
            Cell::new(format!("{share:.1}%")),
        ]);
    }

    println!("{table}");
    println!(
        "Total: {} misses across {} topics and {} tags",
        store.len(),
        store.topics_in_use().len(),
        store.tags_in_use().len()
    );
    Ok(())
}
