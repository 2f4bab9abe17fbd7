use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

use bangumi_score::bilibili::BiliClient;
use bangumi_score::config::Config;
use bangumi_score::pipeline::{ReviewSet, ScorePipeline};
use bangumi_score::review::ReviewKind;
use bangumi_score::storage::SnapshotStore;

use super::progress::BarProgress;

/// Options of the `score` subcommand
#[derive(Debug, Clone, Default)]
pub struct ScoreArgs {
    pub url: Option<String>,
    pub load: bool,
    pub page_size: Option<u32>,
    pub data_dir: Option<PathBuf>,
    pub no_save: bool,
    pub quiet: bool,
}

pub async fn score(config: &Config, args: ScoreArgs, cancel: CancellationToken) -> Result<()> {
    let mut config = config.clone();
    if let Some(page_size) = args.page_size {
        config.fetch.page_size = page_size;
    }
    if let Some(data_dir) = args.data_dir {
        config.storage.data_dir = data_dir;
    }
    config.validate()?;

    let store = SnapshotStore::new(&config.storage);

    let reviews = match args.url {
        Some(_) if args.load => load_snapshot(&store)?,
        None if args.load || store.exists() => load_snapshot(&store)?,
        None => bail!(
            "No bangumi link given and no saved reviews in {}. \
             Pass a link such as https://www.bilibili.com/bangumi/play/ss33802",
            config.storage.data_dir.display()
        ),
        Some(url) => {
            let client = BiliClient::new(&config.api).context("Failed to create API client")?;
            let pipeline = ScorePipeline::new(&client, &config, cancel);

            let ids = pipeline
                .resolve(&url)
                .await
                .with_context(|| format!("Could not resolve \"{url}\"; please check the link"))?;
            println!("Media {} | Season {}", ids.media_url(), ids.season_url());

            let mut progress = BarProgress::new(args.quiet);
            let reviews = pipeline
                .fetch_reviews(ids.media_id, &mut progress)
                .await
                .context("Failed to fetch reviews")?;

            if !args.no_save {
                reviews.save(&store).context("Failed to save reviews")?;
                tracing::info!(
                    short = %store.path(ReviewKind::Short).display(),
                    long = %store.path(ReviewKind::Long).display(),
                    "Saved review snapshots"
                );
            }
            reviews
        }
    };

    let report = reviews.report().context("Cannot compute score")?;

    println!("\nScore");
    println!("================================");
    for kind in ReviewKind::ALL {
        let summary = report.get(kind);
        println!(
            "  {}: {:.2} ({} reviews)",
            kind.display_name(),
            summary.mean_score,
            summary.total_count
        );
    }
    println!("  Overall: {:.2}", report.overall);

    Ok(())
}

fn load_snapshot(store: &SnapshotStore) -> Result<ReviewSet> {
    let reviews = ReviewSet::load(store).with_context(|| {
        format!(
            "Failed to read saved reviews ({}, {}); run with a bangumi link first",
            store.path(ReviewKind::Short).display(),
            store.path(ReviewKind::Long).display()
        )
    })?;
    tracing::info!(
        short = reviews.short.len(),
        long = reviews.long.len(),
        "Loaded review snapshots"
    );
    Ok(reviews)
}
