//! Auth command handlers.

use anyhow::{Context, Result};
use snakedex_core::config::Config;

use super::{client, open_store};

pub async fn login(config: &Config, email: &str, password: &str) -> Result<()> {
    let store = open_store()?;
    if store.has_session() {
        println!("Already logged in.");
        return Ok(());
    }

    let token = client(config)?.login(email, password).await.context("login failed")?;
    store.set_session_token(&token).context("save session")?;
    println!("Logged in.");
    Ok(())
}

pub fn logout() -> Result<()> {
    let store = open_store()?;
    if store.clear_session().context("clear session")? {
        println!("Logged out.");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}

pub async fn forgot_password(config: &Config, email: &str) -> Result<()> {
    client(config)?
        .forgot_password(email)
        .await
        .context("password reset request failed")?;
    println!("Reset link sent to {email}.");
    Ok(())
}

pub async fn reset_password(
    config: &Config,
    token: &str,
    new_password: &str,
    confirm_password: &str,
) -> Result<()> {
    if new_password != confirm_password {
        anyhow::bail!("Passwords do not match.");
    }
    client(config)?
        .reset_password(token, new_password)
        .await
        .context("reset link is invalid or expired")?;
    println!("Password reset. Run `snakedex login`.");
    Ok(())
}
