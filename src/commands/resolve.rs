use anyhow::Result;

use bangumi_score::config::Config;

pub async fn resolve(config: &Config, url: String) -> Result<()> {
    let (_, ids) = super::resolve_url(config, &url).await?;

    println!("Resolved identifiers");
    println!("================================");
    println!("  Media:   {:<12} {}", ids.media_id, ids.media_url());
    println!("  Season:  {:<12} {}", ids.season_id, ids.season_url());
    println!("  Episode: {:<12} {}", ids.episode_id, ids.episode_url());

    Ok(())
}
