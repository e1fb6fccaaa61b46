//! Serve command - render once and serve the documents over HTTP

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use color_eyre::eyre::{Result, WrapErr};
use projecthub_generator::{Builder, ContentCollector};
use tokio::net::TcpListener;

use super::{build::print_build_stats, commit_lookup, load_config};
use crate::server::{SiteState, create_router};

/// Run the serve command.
///
/// All lookups complete before the listener is bound, so the first request
/// already sees the final documents.
pub async fn run(config_path: &Path, port: u16, offline: bool) -> Result<()> {
    tracing::info!(?config_path, port, offline, "Starting server");

    let config = load_config(config_path, None)?;
    let output_dir = PathBuf::from(&config.build.output_dir);
    let content_dir = PathBuf::from(&config.build.content_dir);

    let content = ContentCollector::new(&content_dir)
        .collect()
        .wrap_err("Failed to collect content")?;

    let mut builder = Builder::new(config.clone(), &content_dir, &output_dir);
    if let Some(lookup) = commit_lookup(&config, offline)? {
        builder = builder.with_lookup(lookup);
    }

    let documents = builder
        .render(&content)
        .await
        .wrap_err("Failed to render documents")?;
    print_build_stats(&documents.stats, &output_dir);

    let state = Arc::new(SiteState::new(
        documents.sitemap,
        documents.robots,
        config.http.max_age_secs,
    ));
    let app = create_router(&output_dir, state);
    let addr = format!("127.0.0.1:{port}");

    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("Failed to bind to {addr}"))?;

    println!();
    println!("  Serving http://{addr}/sitemap.xml");
    println!("  Press Ctrl+C to stop");
    println!();

    axum::serve(listener, app).await.wrap_err("Server error")?;

    Ok(())
}
