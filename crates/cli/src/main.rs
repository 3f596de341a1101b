use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use folio_kernel::settings::Settings;

/// Folio book records service
#[derive(Debug, Parser)]
#[command(name = "folio", version, about)]
struct Cli {
    /// Directory holding base.toml and <env>.toml; overrides FOLIO_CONFIG_DIR
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Environment overlay to load (local, staging, production); overrides FOLIO_ENV
    #[arg(long, global = true)]
    env: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP service (default)
    Serve,
    /// Apply pending schema migrations and exit
    Migrate,
    /// Print the resolved configuration as JSON
    Config,
}

impl Cli {
    fn settings(&self) -> anyhow::Result<Settings> {
        if self.config_dir.is_none() && self.env.is_none() {
            return Settings::load();
        }

        let config_dir = match &self.config_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()
                .context("unable to resolve current directory")?
                .join("config"),
        };
        let env = self
            .env
            .clone()
            .or_else(|| std::env::var("FOLIO_ENV").ok())
            .unwrap_or_else(|| "local".to_string());

        Settings::load_from(&config_dir, &env)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = cli
        .settings()
        .context("failed to load Folio settings")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        Command::Migrate => {
            folio_telemetry::init(&settings.telemetry)?;
            let applied = folio_app::migrate(&settings).await?;
            tracing::info!(applied, "migrations complete");
        }
        Command::Serve => {
            folio_telemetry::init(&settings.telemetry)?;
            folio_app::serve(settings).await?;
        }
    }

    Ok(())
}
