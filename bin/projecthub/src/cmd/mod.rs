//! CLI command implementations.

use std::{path::Path, sync::Arc};

use color_eyre::eyre::{Result, WrapErr};
use projecthub_core::Config;
use projecthub_generator::{CommitLookup, GithubClient};

pub mod build;
pub mod check;
pub mod serve;

/// Load the configuration, applying a base URL override from the command line.
pub fn load_config(config_path: &Path, base_url: Option<&str>) -> Result<Config> {
    let mut config =
        Config::load_with_env(config_path).wrap_err("Failed to load configuration")?;

    if let Some(url) = base_url {
        tracing::info!(base_url = url, "Overriding site base_url from CLI");
        config.site.base_url = url.to_string();
        config
            .validate()
            .wrap_err("Invalid --base-url override")?;
    }

    tracing::debug!(?config, "Loaded configuration");
    Ok(config)
}

/// First non-blank value among the environment variables `names`.
pub fn github_token(names: &[String]) -> Option<String> {
    names.iter().find_map(|name| {
        std::env::var(name)
            .ok()
            .filter(|value| !value.trim().is_empty())
    })
}

/// The commit lookup for this run, or `None` when lookups are off.
pub fn commit_lookup(config: &Config, offline: bool) -> Result<Option<Arc<dyn CommitLookup>>> {
    if offline || !config.github.enabled {
        tracing::info!("GitHub lookups disabled, using authored dates only");
        return Ok(None);
    }

    let token = github_token(&config.github.token_env);
    if token.is_none() {
        tracing::info!("No GitHub token found, using unauthenticated requests");
    }

    let client =
        GithubClient::new(&config.github, token).wrap_err("Failed to create GitHub client")?;
    Ok(Some(Arc::new(client)))
}
