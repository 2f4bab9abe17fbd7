//! Bilibili bangumi API access
//!
//! - [`url`] - id extraction from bangumi links
//! - [`resolve`] - media/season/episode resolution cascade
//! - [`api`] - the remote API contract
//! - [`client`] - reqwest implementation with rate limiting
//! - [`info`] - title metadata and stats report

pub mod api;
pub mod client;
pub mod headers;
pub mod info;
pub mod model;
pub mod resolve;
pub mod url;

pub use api::BangumiApi;
pub use client::BiliClient;
pub use info::{collect_info, BangumiInfo, EpisodeReport};
pub use resolve::{IdentifierTriple, ResolvedIds, Resolver, Step};
pub use url::{extract_id, match_kind, IdKind, UrlMatch};
