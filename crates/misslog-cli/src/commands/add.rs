//! The `misslog add` command.

use anyhow::Result;

use misslog_core::EntryDraft;

use super::{Context, EntryFields};

pub fn execute(ctx: &Context, fields: EntryFields) -> Result<()> {
    let draft = EntryDraft {
        why_missed: ctx.config.default_why_missed,
        ..EntryDraft::default()
    };
    let draft = fields.apply(draft)?;

    let mut store = ctx.open_store();
    let entry = store.add(draft)?;

    println!("Logged miss {} ({} :: {})", entry.id, entry.topic, entry.concept);
    Ok(())
}
