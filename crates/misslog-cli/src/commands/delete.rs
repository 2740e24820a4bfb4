//! The `misslog delete` command.

use anyhow::Result;

use misslog_core::EntryId;

use super::Context;

pub fn execute(ctx: &Context, id: String) -> Result<()> {
    let id = EntryId::from(id);
    let mut store = ctx.open_store();

    if store.delete(&id)? {
        println!("Deleted miss {id}");
    } else {
        println!("No miss with id {id}, nothing deleted.");
    }
    Ok(())
}
