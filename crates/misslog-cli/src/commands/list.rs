//! The `misslog list` command.

use anyhow::{bail, Result};
use comfy_table::{Cell, Table};

use misslog_core::FilterCriteria;

use super::{parse_why, Context};

pub fn execute(
    ctx: &Context,
    topic: Option<String>,
    tag: Option<String>,
    why: Option<String>,
    search: Option<String>,
    format: String,
) -> Result<()> {
    let criteria = FilterCriteria {
        topic,
        tag,
        why_missed: why.as_deref().map(parse_why).transpose()?,
        search,
    };

    let store = ctx.open_store();
    let entries = store.filter(&criteria);

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        "table" => {
            if entries.is_empty() {
                if store.is_empty() {
                    println!("No misses yet. Log one with `misslog add`.");
                } else {
                    println!("No misses match these filters.");
                }
                return Ok(());
            }

            let mut table = Table::new();
            table.set_header(vec![
                "Date",
                "Id",
                "Topic",
                "Concept",
                "Why missed",
                "Rule",
                "Tags",
            ]);

            for entry in &entries {
                let why = match &entry.why_notes {
                    Some(notes) => format!("{}\n{notes}", entry.why_missed),
                    None => entry.why_missed.to_string(),
                };
                table.add_row(vec![
                    Cell::new(entry.created_at.format("%Y-%m-%d")),
                    Cell::new(&entry.id),
                    Cell::new(&entry.topic),
                    Cell::new(&entry.concept),
                    Cell::new(why),
                    Cell::new(&entry.rule),
                    Cell::new(entry.tags.join(", ")),
                ]);
            }

            println!("{table}");
            println!("{} of {} misses", entries.len(), store.len());
        }
        other => bail!("unknown format: {other} (expected table or json)"),
    }

    Ok(())
}
