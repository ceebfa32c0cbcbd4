//! Theme command handlers.

use anyhow::{Context, Result};
use snakedex_core::store::ThemePreference;

use super::open_store;

pub fn show() -> Result<()> {
    let snapshot = open_store()?.snapshot();
    println!(
        "{} ({})",
        snapshot.theme_preference.as_str(),
        snapshot.theme.as_str()
    );
    Ok(())
}

pub fn toggle() -> Result<()> {
    let mode = open_store()?.toggle_theme().context("save theme")?;
    println!("Theme: {}", mode.as_str());
    Ok(())
}

pub fn set(mode: &str) -> Result<()> {
    let preference = ThemePreference::parse(mode);
    let applied = open_store()?
        .set_theme_preference(preference)
        .context("save theme")?;
    println!("Theme: {} ({})", preference.as_str(), applied.as_str());
    Ok(())
}
