use crate::bootstrap::{self, Paths};
use anyhow::{Context, Result};

pub fn run(paths: &Paths, json: bool) -> Result<()> {
    let config = bootstrap::load_config(paths)?;
    let catalog = config.catalog().context("Invalid style configuration")?;

    if json {
        println!("{}", serde_json::to_string_pretty(catalog.entries())?);
        return Ok(());
    }

    for style in catalog.entries() {
        println!("{:<16} {}", style.id, style.display_name);
    }
    Ok(())
}
