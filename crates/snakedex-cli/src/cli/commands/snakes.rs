//! Catalog command handlers.

use std::io::{self, BufRead, IsTerminal, Read, Write};

use anyhow::{Context, Result};
use snakedex_core::config::Config;
use snakedex_types::{ListKind, SnakeRecord};

use super::{guard, session_error};

pub async fn list(config: &Config, json: bool) -> Result<()> {
    let snakes = fetch_all(config).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&snakes)?);
        return Ok(());
    }
    if snakes.is_empty() {
        println!("No snakes found.");
        return Ok(());
    }
    for snake in &snakes {
        println!(
            "{}  {}  {}",
            or_dash(&snake.binomial),
            snake.display_name(),
            if snake.is_venomous { "venomous" } else { "-" }
        );
    }
    Ok(())
}

pub async fn show(config: &Config, binomial: &str, json: bool) -> Result<()> {
    let snakes = fetch_all(config).await?;
    let snake = snakes
        .iter()
        .find(|s| s.binomial.trim() == binomial.trim())
        .with_context(|| format!("No snake with binomial '{binomial}'"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(snake)?);
        return Ok(());
    }

    println!("{}", snake.display_name());
    println!("binomial:      {}", or_dash(&snake.binomial));
    println!(
        "venomous:      {}",
        if snake.is_venomous { "yes" } else { "no" }
    );
    println!(
        "danger level:  {}",
        snake.danger_level.as_ref().map_or("-", |d| d.label())
    );
    println!(
        "status:        {}",
        snake.status.as_ref().map_or("-", |s| s.label())
    );
    println!("size:          {}", or_dash(&snake.size));
    println!("pattern:       {}", or_dash(&snake.pattern));
    println!("image:         {}", or_dash(&snake.image_url));
    for kind in ListKind::ALL {
        println!("{}: {}", kind.label(), or_dash(&snake.list(kind).display()));
    }
    if !snake.description.trim().is_empty() {
        println!("\n{}", snake.description.trim());
    }
    if !snake.venom_effects.trim().is_empty() {
        println!("\nvenom effects: {}", snake.venom_effects.trim());
    }
    Ok(())
}

pub async fn add(config: &Config, file: &str) -> Result<()> {
    let record = read_record(file)?;
    guard(config)?
        .save_snake(None, record)
        .await
        .map_err(|e| session_error(e, "create record"))?;
    println!("Saved.");
    Ok(())
}

pub async fn edit(config: &Config, binomial: &str, file: &str) -> Result<()> {
    let record = read_record(file)?;
    guard(config)?
        .save_snake(Some(binomial.to_string()), record)
        .await
        .map_err(|e| session_error(e, "update record"))?;
    println!("Saved.");
    Ok(())
}

pub async fn delete(config: &Config, binomial: &str, yes: bool) -> Result<()> {
    if !yes && !confirm(binomial)? {
        println!("Cancelled.");
        return Ok(());
    }
    guard(config)?
        .delete_snake(binomial.to_string())
        .await
        .map_err(|e| session_error(e, "delete record"))?;
    println!("Deleted {binomial}.");
    Ok(())
}

async fn fetch_all(config: &Config) -> Result<Vec<SnakeRecord>> {
    guard(config)?
        .list_snakes()
        .await
        .map_err(|e| session_error(e, "fetch records"))
}

/// Reads a record from `path`, or stdin for `-`, and checks required fields.
fn read_record(path: &str) -> Result<SnakeRecord> {
    let raw = if path == "-" {
        let mut buf = String::new();
        io::stdin()
            .lock()
            .read_to_string(&mut buf)
            .context("read record from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path).with_context(|| format!("read {path}"))?
    };

    let record: SnakeRecord =
        serde_json::from_str(&raw).with_context(|| format!("parse record from {path}"))?;

    let missing = record.missing_required();
    if !missing.is_empty() {
        let labels: Vec<_> = missing.iter().map(|f| f.label()).collect();
        anyhow::bail!("Missing required fields: {}", labels.join(", "));
    }
    Ok(record)
}

/// Asks on the terminal. Without a terminal there is nobody to ask.
fn confirm(binomial: &str) -> Result<bool> {
    if !io::stdin().is_terminal() {
        anyhow::bail!("Refusing to delete without --yes when stdin is not a terminal");
    }
    let mut err = io::stderr();
    write!(err, "Delete {binomial}? [y/N] ")?;
    err.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() { "-" } else { value }
}
