use anyhow::{Context, Result};

use bangumi_score::bilibili::{collect_info, IdKind};
use bangumi_score::config::Config;
use bangumi_score::utils::{format_count, format_duration_ms, format_timestamp};

pub async fn info(config: &Config, url: String, detail: bool) -> Result<()> {
    let (client, ids) = super::resolve_url(config, &url).await?;

    let info = collect_info(&client, &ids, detail, &config.api.retry())
        .await
        .context("Failed to fetch title info")?;

    println!("{}", info.title());
    println!("================================");
    if !info.media.type_name.is_empty() {
        println!("  Type: {}", info.media.type_name);
    }
    println!("  Episodes: {}", info.episode_count());
    if let Some(new_ep) = info.media.new_ep.as_ref().or(info.season.new_ep.as_ref()) {
        if !new_ep.index_show.is_empty() {
            println!("  Status: {}", new_ep.index_show);
        }
    }
    match info.media.rating {
        Some(rating) => println!(
            "  Rating: {:.1} ({} ratings)",
            rating.score,
            format_count(rating.count)
        ),
        None => println!("  Rating: not enough ratings yet"),
    }
    println!("  Media:  {}", ids.media_url());
    println!("  Season: {}", ids.season_url());

    if let Some(stat) = info.season_stat {
        println!("\nSeason stats");
        println!("  Views:          {}", format_count(stat.views));
        println!("  Coins:          {}", format_count(stat.coins));
        println!("  Danmakus:       {}", format_count(stat.danmakus));
        println!("  Follows:        {}", format_count(stat.follow));
        println!("  Series follows: {}", format_count(stat.series_follow));
    }

    for report in &info.episodes {
        let ep = &report.episode;
        println!("\nEpisode {}: {} {}", report.index, ep.title, ep.long_title);
        println!("  URL: {}", IdKind::Episode.canonical_url(ep.id));
        if !ep.bvid.is_empty() {
            println!("  BV: {} (av{})", ep.bvid, ep.aid);
        }
        println!("  Published: {}", format_timestamp(ep.pub_time));
        println!("  Duration: {}", format_duration_ms(ep.duration));
        match report.stat {
            Some(stat) => println!(
                "  Views {} | Likes {} | Coins {} | Danmakus {} | Replies {}",
                format_count(stat.view),
                format_count(stat.like),
                format_count(stat.coin),
                format_count(stat.dm),
                format_count(stat.reply)
            ),
            None => println!("  Stats unavailable"),
        }
    }

    Ok(())
}
