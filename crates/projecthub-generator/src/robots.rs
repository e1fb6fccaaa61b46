//! Robots.txt generation.
//!
//! Generates the robots.txt file pointing crawlers at the sitemap.

use projecthub_core::{Config, CoreError, config::RobotsConfig};
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Robots generation errors.
#[derive(Debug, Error)]
pub enum RobotsError {
    /// Invalid site configuration.
    #[error("configuration error: {0}")]
    Config(#[from] CoreError),

    /// Sitemap URL could not be resolved.
    #[error("cannot resolve sitemap URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Result type for robots generation.
pub type Result<T> = std::result::Result<T, RobotsError>;

/// Robots.txt generator.
#[derive(Debug, Clone)]
pub struct RobotsGenerator {
    robots: RobotsConfig,
    sitemap_url: Url,
}

impl RobotsGenerator {
    /// Create a new robots generator.
    pub fn new(config: &Config) -> Result<Self> {
        let sitemap_url = config.site_origin()?.join("sitemap.xml")?;
        Ok(Self {
            robots: config.robots.clone(),
            sitemap_url,
        })
    }

    /// Absolute URL of the sitemap.
    pub fn sitemap_url(&self) -> &Url {
        &self.sitemap_url
    }

    /// Generate robots.txt, or `None` when disabled.
    pub fn generate(&self) -> Option<String> {
        if !self.robots.enabled {
            return None;
        }

        debug!(sitemap = %self.sitemap_url, "generating robots.txt");

        let mut body = String::from("User-agent: *\n");

        for path in &self.robots.disallow {
            body.push_str(&format!("Disallow: {path}\n"));
        }

        for path in &self.robots.allow {
            body.push_str(&format!("Allow: {path}\n"));
        }

        body.push_str(&format!("\nSitemap: {}\n", self.sitemap_url));
        Some(body)
    }
}
