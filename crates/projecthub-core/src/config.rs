//! Site configuration management.

use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    error::{CoreError, Result},
    i18n::LocaleSet,
};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    pub site: SiteConfig,

    /// Build settings.
    #[serde(default)]
    pub build: BuildConfig,

    /// GitHub commit lookup settings.
    #[serde(default)]
    pub github: GithubConfig,

    /// robots.txt settings.
    #[serde(default)]
    pub robots: RobotsConfig,

    /// Response header settings for served documents.
    #[serde(default)]
    pub http: HttpConfig,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site title.
    pub title: String,

    /// Absolute origin every emitted URL is resolved against
    /// (e.g., "https://example.com").
    pub base_url: String,

    /// Supported locales, in the order alternates are emitted.
    #[serde(default = "default_locales")]
    pub locales: Vec<String>,

    /// Locale served without a path prefix.
    #[serde(default = "default_locale")]
    pub default_locale: String,
}

/// Build configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Directory holding the `projects` and `tags` collections.
    #[serde(default = "default_content_dir")]
    pub content_dir: String,

    /// Output directory for generated files.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

/// GitHub API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Whether to look up latest commit dates at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// REST API base URL.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Environment variables checked, in order, for an API token.
    #[serde(default = "default_token_env")]
    pub token_env: Vec<String>,
}

/// robots.txt configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotsConfig {
    /// Whether to generate robots.txt.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Allowed path prefixes.
    #[serde(default = "default_allow")]
    pub allow: Vec<String>,

    /// Disallowed path prefixes.
    #[serde(default)]
    pub disallow: Vec<String>,
}

/// HTTP response configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// `Cache-Control` max-age for sitemap.xml and robots.txt.
    #[serde(default = "default_max_age_secs")]
    pub max_age_secs: u64,
}

// Default value functions
fn default_locales() -> Vec<String> {
    vec!["en".to_string()]
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_content_dir() -> String {
    "content".to_string()
}

fn default_output_dir() -> String {
    "dist".to_string()
}

fn default_true() -> bool {
    true
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_user_agent() -> String {
    "projecthub-build".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_token_env() -> Vec<String> {
    vec!["GITHUB_TOKEN".to_string(), "GH_TOKEN".to_string()]
}

fn default_allow() -> Vec<String> {
    vec!["/".to_string()]
}

fn default_max_age_secs() -> u64 {
    3600
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content_dir: default_content_dir(),
            output_dir: default_output_dir(),
        }
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_base: default_api_base(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            token_env: default_token_env(),
        }
    }
}

impl Default for RobotsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allow: default_allow(),
            disallow: Vec::new(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            max_age_secs: default_max_age_secs(),
        }
    }
}

impl Config {
    /// Create a configuration with defaults for everything but the site section.
    pub fn new(site: SiteConfig) -> Self {
        Self {
            site,
            build: BuildConfig::default(),
            github: GithubConfig::default(),
            robots: RobotsConfig::default(),
            http: HttpConfig::default(),
        }
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration layered with `PROJECTHUB__SECTION__KEY` environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("PROJECTHUB").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.site.title.is_empty() {
            return Err(CoreError::config("site.title cannot be empty"));
        }

        let origin = self.site_origin()?;
        if origin.path() != "/" {
            tracing::warn!(
                base_url = %self.site.base_url,
                "site.base_url has a path; site paths resolve against its origin"
            );
        }

        self.locale_set()
            .map_err(|e| CoreError::config_with_source("invalid [site] locales", e))?;

        if self.github.enabled {
            Url::parse(&self.github.api_base).map_err(|e| {
                CoreError::config_with_source(
                    format!("github.api_base is not a valid URL: {}", self.github.api_base),
                    e,
                )
            })?;

            if self.github.timeout_secs == 0 {
                return Err(CoreError::config("github.timeout_secs must be at least 1"));
            }
        }

        Ok(())
    }

    /// The site origin as a parsed absolute URL.
    pub fn site_origin(&self) -> Result<Url> {
        if self.site.base_url.is_empty() {
            return Err(CoreError::config("site.base_url cannot be empty"));
        }

        let url = Url::parse(&self.site.base_url).map_err(|e| {
            CoreError::config_with_source(
                format!("site.base_url is not an absolute URL: {}", self.site.base_url),
                e,
            )
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(CoreError::config(format!(
                "site.base_url must use http or https: {}",
                self.site.base_url
            )));
        }

        Ok(url)
    }

    /// The configured locales.
    pub fn locale_set(&self) -> Result<LocaleSet> {
        LocaleSet::new(
            self.site.locales.iter().cloned(),
            self.site.default_locale.clone(),
        )
    }
}
