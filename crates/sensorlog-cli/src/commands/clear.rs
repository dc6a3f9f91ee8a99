//! Clear command - delete every stored reading.

use std::path::Path;

use anyhow::{Context, Result};

use crate::util::open_store;

/// Execute the clear command. There is no confirmation prompt.
pub fn cmd_clear(db_path: &Path, quiet: bool) -> Result<()> {
    let store = open_store(db_path)?;
    let deleted = store.clear_all().context("Failed to clear database")?;
    if !quiet {
        eprintln!("Deleted {} readings from {}", deleted, db_path.display());
    }
    Ok(())
}
