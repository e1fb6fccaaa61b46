//! Build orchestration.
//!
//! Collects content, looks up commit dates, and renders `sitemap.xml` and
//! `robots.txt`.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::Instant,
};

use projecthub_core::Config;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    collector::{CollectorError, ContentCollector, SiteContent},
    github::{CommitLookup, ExternalTimestamps, fetch_latest_updates},
    robots::{RobotsError, RobotsGenerator},
    sitemap::{SitemapError, SitemapGenerator, build_entries},
};

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Collector error.
    #[error("collector error: {0}")]
    Collector(#[from] CollectorError),

    /// Sitemap generation error.
    #[error("sitemap error: {0}")]
    Sitemap(#[from] SitemapError),

    /// Robots generation error.
    #[error("robots error: {0}")]
    Robots(#[from] RobotsError),
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Build statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Number of `<url>` elements in the sitemap.
    pub entries: usize,

    /// Number of public projects listed.
    pub projects: usize,

    /// Number of private projects left out.
    pub private_projects: usize,

    /// Number of tags listed.
    pub tags: usize,

    /// Number of entries carrying a lastmod.
    pub lastmods: usize,

    /// Number of commit dates found.
    pub external_timestamps: usize,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

/// Rendered documents of one build.
#[derive(Debug, Clone)]
pub struct SiteDocuments {
    /// sitemap.xml body.
    pub sitemap: String,

    /// robots.txt body, when enabled.
    pub robots: Option<String>,

    /// Statistics of the render.
    pub stats: BuildStats,
}

/// Site builder that orchestrates the build process.
pub struct Builder {
    config: Config,
    content_dir: PathBuf,
    output_dir: PathBuf,
    lookup: Option<Arc<dyn CommitLookup>>,
}

impl std::fmt::Debug for Builder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builder")
            .field("content_dir", &self.content_dir)
            .field("output_dir", &self.output_dir)
            .field("lookup", &self.lookup.is_some())
            .finish_non_exhaustive()
    }
}

impl Builder {
    /// Create a new builder.
    #[must_use]
    pub fn new(
        config: Config,
        content_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config,
            content_dir: content_dir.into(),
            output_dir: output_dir.into(),
            lookup: None,
        }
    }

    /// Look up commit dates with `lookup`. Without one, only authored dates are used.
    #[must_use]
    pub fn with_lookup(mut self, lookup: Arc<dyn CommitLookup>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    /// Output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Execute the full build and write the documents.
    pub async fn build(&self) -> Result<BuildStats> {
        info!(
            content = %self.content_dir.display(),
            output = %self.output_dir.display(),
            "starting build"
        );

        let content = ContentCollector::new(&self.content_dir).collect()?;
        let documents = self.render(&content).await?;
        self.write_documents(&documents)?;

        Ok(documents.stats)
    }

    /// Render the documents for already collected content.
    pub async fn render(&self, content: &SiteContent) -> Result<SiteDocuments> {
        let start = Instant::now();

        let external = match &self.lookup {
            Some(lookup) => fetch_latest_updates(lookup.as_ref(), &content.projects).await,
            None => {
                debug!("no commit lookup configured");
                ExternalTimestamps::new()
            }
        };

        let entries = build_entries(&content.projects, &content.tags, &external);
        let sitemap = SitemapGenerator::from_config(&self.config)?.generate(&entries);
        let robots = RobotsGenerator::new(&self.config)?.generate();

        let projects = content.public_projects().count();
        let stats = BuildStats {
            entries: entries.len(),
            projects,
            private_projects: content.projects.len() - projects,
            tags: content.tags.len(),
            lastmods: entries.iter().filter(|e| e.lastmod.is_some()).count(),
            external_timestamps: external.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            entries = stats.entries,
            projects = stats.projects,
            tags = stats.tags,
            lastmods = stats.lastmods,
            duration_ms = stats.duration_ms,
            "rendered sitemap"
        );

        Ok(SiteDocuments {
            sitemap,
            robots,
            stats,
        })
    }

    /// Write the documents into the output directory.
    fn write_documents(&self, documents: &SiteDocuments) -> Result<()> {
        fs::create_dir_all(&self.output_dir)?;

        let sitemap_path = self.output_dir.join("sitemap.xml");
        fs::write(&sitemap_path, &documents.sitemap)?;
        debug!(path = %sitemap_path.display(), "wrote sitemap");

        if let Some(robots) = &documents.robots {
            let robots_path = self.output_dir.join("robots.txt");
            fs::write(&robots_path, robots)?;
            debug!(path = %robots_path.display(), "wrote robots.txt");
        }

        Ok(())
    }
}
