use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bangumi_score::config::Config;

mod commands;

use commands::ScoreArgs;

#[derive(Parser)]
#[command(
    name = "bangumi-score",
    version,
    about = "Compute the real average user score of a Bilibili bangumi from its reviews",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a bangumi link to its media, season and episode ids
    Resolve {
        /// Episode, season or media link
        url: String,
    },

    /// Show title metadata and play statistics
    Info {
        /// Episode, season or media link
        url: String,

        /// List every episode instead of only the linked one
        #[arg(short, long, default_value = "false")]
        detail: bool,
    },

    /// Fetch all short and long reviews and compute the average score
    Score {
        /// Episode, season or media link; omit to score saved reviews
        url: Option<String>,

        /// Score the saved snapshot instead of fetching
        #[arg(short, long, default_value = "false")]
        load: bool,

        /// Reviews requested per page
        #[arg(long)]
        page_size: Option<u32>,

        /// Directory of the review snapshots
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Do not write the review snapshots
        #[arg(long, default_value = "false")]
        no_save: bool,

        /// Hide progress bars
        #[arg(short, long, default_value = "false")]
        quiet: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::from_env()?,
    };
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }
    config.validate()?;

    // Initialize tracing/logging
    setup_tracing(&config.logging.level, &config.logging.format, cli.verbose)?;

    tracing::debug!("bangumi-score starting");

    match cli.command {
        Commands::Resolve { url } => {
            tracing::info!(url = %url, "Starting resolve command");
            commands::resolve(&config, url).await?;
        }

        Commands::Info { url, detail } => {
            tracing::info!(url = %url, detail = %detail, "Starting info command");
            commands::info(&config, url, detail).await?;
        }

        Commands::Score {
            url,
            load,
            page_size,
            data_dir,
            no_save,
            quiet,
        } => {
            tracing::info!(
                url = ?url,
                load = %load,
                page_size = ?page_size,
                no_save = %no_save,
                "Starting score command"
            );

            let cancel = CancellationToken::new();
            let on_ctrl_c = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("Interrupted, cancelling");
                    on_ctrl_c.cancel();
                }
            });

            let args = ScoreArgs {
                url,
                load,
                page_size,
                data_dir,
                no_save,
                quiet,
            };
            commands::score(&config, args, cancel).await?;
        }
    }

    Ok(())
}

fn setup_tracing(level: &str, format: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("bangumi_score=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("bangumi_score={level},warn")))
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}
