//! bangumi-score - Bilibili bangumi review crawler
//!
//! Resolves a bangumi link to its media, season and episode ids, drains every
//! short and long review of the title and computes the real average user score.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`bilibili`] - URL matching, id resolution and the API client
//! - [`review`] - Review pagination, aggregation and scoring
//! - [`pipeline`] - Sequential resolve, fetch and score run
//! - [`storage`] - JSON snapshots of fetched reviews
//! - [`error`] - Unified error type
//! - [`utils`] - Retry policy, domain errors and formatting helpers
//!
//! # Example
//!
//! ```no_run
//! use bangumi_score::bilibili::BiliClient;
//! use bangumi_score::config::Config;
//! use bangumi_score::pipeline::ScorePipeline;
//! use bangumi_score::review::LogProgress;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let client = BiliClient::new(&config.api)?;
//!     let pipeline = ScorePipeline::new(&client, &config, CancellationToken::new());
//!
//!     let (_, _, report) = pipeline
//!         .run("https://www.bilibili.com/bangumi/play/ss33802", &mut LogProgress::default())
//!         .await?;
//!     println!("overall: {:.2}", report.overall);
//!     Ok(())
//! }
//! ```

pub mod bilibili;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod review;
pub mod storage;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::bilibili::{BangumiApi, BiliClient, IdentifierTriple, ResolvedIds, Resolver};
    pub use crate::config::Config;
    pub use crate::error::{BangumiErrorTrait, Error, ErrorCategory, Result};
    pub use crate::pipeline::{ReviewSet, ScorePipeline};
    pub use crate::review::{Comment, CommentAggregator, ReviewKind, ScoreReport};
    pub use crate::storage::SnapshotStore;
}

// Direct re-exports for convenience
pub use review::{Comment, ReviewKind};
