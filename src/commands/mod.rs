pub mod info;
pub mod progress;
pub mod resolve;
pub mod score;

use anyhow::{Context, Result};

use bangumi_score::bilibili::{BiliClient, ResolvedIds, Resolver};
use bangumi_score::config::Config;

// Re-export command functions for convenience
pub use info::info;
pub use resolve::resolve;
pub use score::{score, ScoreArgs};

/// Build the API client and resolve `url`, with guidance on failure
pub(crate) async fn resolve_url(config: &Config, url: &str) -> Result<(BiliClient, ResolvedIds)> {
    let client = BiliClient::new(&config.api).context("Failed to create API client")?;

    let ids = Resolver::new(&client, config.api.retry())
        .resolve_text(url)
        .await
        .with_context(|| format!("Could not resolve \"{url}\"; please check the link"))?;

    Ok((client, ids))
}
