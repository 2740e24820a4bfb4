//! The `misslog edit` command.

use anyhow::{Context as _, Result};

use misslog_core::{EntryDraft, EntryId};

use super::{Context, EntryFields};

pub fn execute(ctx: &Context, id: String, fields: EntryFields) -> Result<()> {
    let id = EntryId::from(id);
    let mut store = ctx.open_store();

    let current = store
        .get(&id)
        .with_context(|| format!("no miss with id {id}"))?;
    let draft = fields.apply(EntryDraft::from_entry(current))?;

    let entry = store.update(&id, draft)?;
    println!("Updated miss {}", entry.id);
    Ok(())
}
