//! Sitemap generation.
//!
//! Builds the list of site paths, expands each into one URL per locale and
//! renders an XML sitemap with `xhtml:link` hreflang alternates.

use std::{collections::HashSet, io::Write};

use projecthub_core::{Config, CoreError, LocaleSet, Project, Tag};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::{github::ExternalTimestamps, lastmod::resolve_lastmod};

/// Sitemap protocol namespace.
pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Namespace of the `xhtml:link` alternate elements.
pub const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";

/// hreflang value of the fallback alternate.
pub const X_DEFAULT: &str = "x-default";

/// Pages that exist regardless of content, in sitemap order.
pub const STATIC_PATHS: [&str; 4] = ["/", "/projects", "/tags", "/search"];

/// Sitemap generation errors.
#[derive(Debug, Error)]
pub enum SitemapError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid site configuration.
    #[error("configuration error: {0}")]
    Config(#[from] CoreError),
}

/// Result type for sitemap operations.
pub type Result<T> = std::result::Result<T, SitemapError>;

/// A locale-agnostic site path with its optional lastmod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    /// Site-relative path starting with `/`.
    pub path: String,

    /// Normalized ISO-8601 timestamp.
    pub lastmod: Option<String>,
}

impl SitemapEntry {
    /// An entry without lastmod.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            lastmod: None,
        }
    }

    /// Set the lastmod.
    #[must_use]
    pub fn with_lastmod(mut self, lastmod: Option<String>) -> Self {
        self.lastmod = lastmod;
        self
    }
}

/// Alternate language link for a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlternateLink {
    /// Language code (e.g., "en", "de") or `x-default`.
    pub hreflang: String,

    /// URL for this language version.
    pub href: Url,
}

/// All absolute URLs of one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedUrls {
    /// Default-locale URL, used as `<loc>`.
    pub canonical: Url,

    /// One URL per locale, in locale-set order.
    pub alternates: Vec<AlternateLink>,

    /// Fallback URL for unlisted locales; always the canonical URL.
    pub x_default: Url,
}

/// Build the sitemap entries for the static pages, public projects and tags.
///
/// Order is static pages, then projects, then tags, each in collection
/// order. A path seen twice keeps its first entry.
pub fn build_entries(
    projects: &[Project],
    tags: &[Tag],
    external: &ExternalTimestamps,
) -> Vec<SitemapEntry> {
    let mut entries = Vec::with_capacity(STATIC_PATHS.len() + projects.len() + tags.len());
    let mut seen = HashSet::new();

    for path in STATIC_PATHS {
        push_unique(&mut entries, &mut seen, SitemapEntry::new(path));
    }

    for project in projects {
        if !project.is_public() {
            debug!(slug = %project.slug, "skipping private project");
            continue;
        }
        let external = external.get(&project.slug).map(String::as_str);
        let entry =
            SitemapEntry::new(project.path()).with_lastmod(resolve_lastmod(project, external));
        push_unique(&mut entries, &mut seen, entry);
    }

    for tag in tags {
        push_unique(&mut entries, &mut seen, SitemapEntry::new(tag.path()));
    }

    entries
}

fn push_unique(entries: &mut Vec<SitemapEntry>, seen: &mut HashSet<String>, entry: SitemapEntry) {
    if seen.insert(entry.path.clone()) {
        entries.push(entry);
    } else {
        warn!(path = %entry.path, "duplicate sitemap path, keeping the first entry");
    }
}

/// Compute the per-locale URLs of `entry`.
///
/// A locale whose path cannot be resolved is left out of the alternates. The
/// canonical URL falls back to the raw path, then to the origin itself, so an
/// entry is never lost.
pub fn expand(entry: &SitemapEntry, locales: &LocaleSet, origin: &Url) -> LocalizedUrls {
    let alternates: Vec<AlternateLink> = locales
        .iter()
        .filter_map(|locale| {
            let path = locales.localize_path(&entry.path, locale);
            match origin.join(&path) {
                Ok(href) => Some(AlternateLink {
                    hreflang: locale.to_string(),
                    href,
                }),
                Err(e) => {
                    warn!(path = %path, locale, error = %e, "cannot resolve localized path");
                    None
                }
            }
        })
        .collect();

    let canonical = alternates
        .iter()
        .find(|alt| alt.hreflang == locales.default_locale())
        .map(|alt| alt.href.clone())
        .or_else(|| origin.join(&entry.path).ok())
        .unwrap_or_else(|| {
            warn!(path = %entry.path, "falling back to the site origin as location");
            origin.clone()
        });

    LocalizedUrls {
        x_default: canonical.clone(),
        canonical,
        alternates,
    }
}

/// Sitemap generator.
#[derive(Debug, Clone)]
pub struct SitemapGenerator {
    locales: LocaleSet,
    origin: Url,
}

impl SitemapGenerator {
    /// Create a new sitemap generator.
    #[must_use]
    pub fn new(locales: LocaleSet, origin: Url) -> Self {
        Self { locales, origin }
    }

    /// Create a generator from the site configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.locale_set()?, config.site_origin()?))
    }

    /// Generate sitemap XML from entries.
    pub fn generate(&self, entries: &[SitemapEntry]) -> String {
        debug!(count = entries.len(), "generating sitemap");

        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(
            r#"<urlset xmlns="{SITEMAP_NS}" xmlns:xhtml="{XHTML_NS}">"#
        ));

        for entry in entries {
            let urls = expand(entry, &self.locales, &self.origin);
            xml.push_str(&url_to_xml(entry, &urls));
        }

        xml.push_str("</urlset>");
        xml
    }

    /// Write sitemap to a writer.
    pub fn write_to<W: Write>(&self, entries: &[SitemapEntry], writer: &mut W) -> Result<()> {
        let xml = self.generate(entries);
        writer.write_all(xml.as_bytes())?;
        Ok(())
    }
}

/// Render one `<url>` element.
fn url_to_xml(entry: &SitemapEntry, urls: &LocalizedUrls) -> String {
    let mut xml = String::from("<url>");

    xml.push_str(&format!("<loc>{}</loc>", escape_xml(urls.canonical.as_str())));

    if let Some(lastmod) = &entry.lastmod {
        xml.push_str(&format!("<lastmod>{lastmod}</lastmod>"));
    }

    let x_default = (X_DEFAULT, &urls.x_default);
    for (hreflang, href) in urls
        .alternates
        .iter()
        .map(|alt| (alt.hreflang.as_str(), &alt.href))
        .chain(std::iter::once(x_default))
    {
        xml.push_str(&format!(
            r#"<xhtml:link rel="alternate" hreflang="{}" href="{}"/>"#,
            escape_xml(hreflang),
            escape_xml(href.as_str())
        ));
    }

    xml.push_str("</url>");
    xml
}

/// Escape special XML characters.
///
/// Percent-encoded sequences are left alone; only XML metacharacters change.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
