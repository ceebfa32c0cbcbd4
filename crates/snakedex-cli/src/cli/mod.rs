//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use snakedex_core::config::{self, Config};
use snakedex_core::logging;

mod commands;

#[derive(Parser)]
#[command(name = "snakedex")]
#[command(version)]
#[command(about = "Snake catalog client")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Route to open in the interactive client, e.g. `/reset-password?token=...`
    #[arg(long, default_value = "/")]
    route: String,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log in and store the session token
    Login {
        #[arg(long)]
        email: String,
        /// Password (falls back to SNAKEDEX_PASSWORD)
        #[arg(long, env = "SNAKEDEX_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Clear the stored session token
    Logout,
    /// Request a password reset email
    ForgotPassword {
        #[arg(long)]
        email: String,
    },
    /// Set a new password using the token from the reset email
    ResetPassword {
        #[arg(long)]
        token: String,
        #[arg(long)]
        new_password: String,
        #[arg(long)]
        confirm_password: String,
    },
    /// Manage catalog records
    Snakes {
        #[command(subcommand)]
        command: SnakeCommands,
    },
    /// Show or change the theme
    Theme {
        #[command(subcommand)]
        command: ThemeCommands,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum SnakeCommands {
    /// Lists all records
    List {
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Shows one record
    Show {
        #[arg(value_name = "BINOMIAL")]
        binomial: String,
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Creates a record from a JSON file
    Add {
        /// JSON file with the record (`-` reads stdin)
        #[arg(long, value_name = "PATH")]
        file: String,
    },
    /// Replaces the record stored under BINOMIAL
    Edit {
        #[arg(value_name = "BINOMIAL")]
        binomial: String,
        /// JSON file with the record (`-` reads stdin)
        #[arg(long, value_name = "PATH")]
        file: String,
    },
    /// Deletes a record
    Delete {
        #[arg(value_name = "BINOMIAL")]
        binomial: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(clap::Subcommand)]
enum ThemeCommands {
    /// Show the stored preference and the applied mode
    Show,
    /// Flip between light and dark
    Toggle,
    /// Set the preference
    Set {
        #[arg(value_parser = ["light", "dark", "auto"])]
        mode: String,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Set the catalog API base URL
    SetUrl {
        #[arg(value_name = "URL")]
        url: String,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = Config::load().context("load config")?;

    // default to the interactive client
    let Some(command) = cli.command else {
        // The TUI owns the terminal, so it logs to a file.
        let _log_guard = logging::init_file(&config::paths::logs_dir(), &config.log_level)?;
        return commands::tui::run(&config, &cli.route).await;
    };

    logging::init_stderr(&config.log_level);

    match command {
        Commands::Login { email, password } => {
            commands::auth::login(&config, &email, &password).await
        }
        Commands::Logout => commands::auth::logout(),
        Commands::ForgotPassword { email } => commands::auth::forgot_password(&config, &email).await,
        Commands::ResetPassword {
            token,
            new_password,
            confirm_password,
        } => commands::auth::reset_password(&config, &token, &new_password, &confirm_password).await,

        Commands::Snakes { command } => match command {
            SnakeCommands::List { json } => commands::snakes::list(&config, json).await,
            SnakeCommands::Show { binomial, json } => {
                commands::snakes::show(&config, &binomial, json).await
            }
            SnakeCommands::Add { file } => commands::snakes::add(&config, &file).await,
            SnakeCommands::Edit { binomial, file } => {
                commands::snakes::edit(&config, &binomial, &file).await
            }
            SnakeCommands::Delete { binomial, yes } => {
                commands::snakes::delete(&config, &binomial, yes).await
            }
        },

        Commands::Theme { command } => match command {
            ThemeCommands::Show => commands::theme::show(),
            ThemeCommands::Toggle => commands::theme::toggle(),
            ThemeCommands::Set { mode } => commands::theme::set(&mode),
        },

        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::SetUrl { url } => commands::config::set_url(&url),
        },
    }
}
