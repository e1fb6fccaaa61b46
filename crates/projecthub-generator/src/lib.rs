//! Project Hub Generator Library
//!
//! Localized sitemap generation for the project hub.
//!
//! # Modules
//!
//! - [`collector`] - Reads the projects and tags collections
//! - [`github`] - Latest commit lookups
//! - [`lastmod`] - Lastmod precedence and timestamp normalization
//! - [`sitemap`] - Entry building, locale expansion and XML rendering
//! - [`robots`] - robots.txt generation
//! - [`links`] - Outbound link helpers
//! - [`build`] - Build orchestration

pub mod build;
pub mod collector;
pub mod github;
pub mod lastmod;
pub mod links;
pub mod robots;
pub mod sitemap;

pub use build::{BuildStats, Builder, SiteDocuments};
pub use collector::{ContentCollector, SiteContent};
pub use github::{CommitLookup, ExternalTimestamps, GithubClient, LatestUpdate};
pub use lastmod::{normalize_timestamp, resolve_lastmod};
pub use robots::RobotsGenerator;
pub use sitemap::{SitemapEntry, SitemapGenerator, build_entries, expand};
