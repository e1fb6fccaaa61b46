//! Build command - writes sitemap.xml and robots.txt

use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use color_eyre::eyre::{Result, WrapErr};
use projecthub_generator::{BuildStats, Builder};

use super::{commit_lookup, load_config};

/// Run the build command.
///
/// `output` and `base_url` override the configured values; `offline` skips
/// GitHub lookups.
pub async fn run(
    config_path: &Path,
    output: Option<&Path>,
    base_url: Option<&str>,
    offline: bool,
) -> Result<()> {
    let start = Instant::now();
    tracing::info!(?config_path, ?output, ?base_url, offline, "Starting build");

    let config = load_config(config_path, base_url)?;

    let output_dir = output.map_or_else(|| PathBuf::from(&config.build.output_dir), Path::to_path_buf);
    let content_dir = PathBuf::from(&config.build.content_dir);

    let mut builder = Builder::new(config.clone(), content_dir, &output_dir);
    if let Some(lookup) = commit_lookup(&config, offline)? {
        builder = builder.with_lookup(lookup);
    }

    let stats = builder.build().await.wrap_err("Build failed")?;
    let duration = start.elapsed();

    print_build_stats(&stats, &output_dir);
    println!("  Duration:   {:.2}s", duration.as_secs_f64());
    println!();

    tracing::info!(?stats, ?duration, "Build completed successfully");

    Ok(())
}

/// Print build statistics.
pub fn print_build_stats(stats: &BuildStats, output_dir: &Path) {
    println!();
    println!("  Build completed successfully!");
    println!();
    println!("  URLs:       {}", stats.entries);
    println!(
        "  Projects:   {} ({} private skipped)",
        stats.projects, stats.private_projects
    );
    println!("  Tags:       {}", stats.tags);
    println!(
        "  Lastmod:    {} ({} from GitHub)",
        stats.lastmods, stats.external_timestamps
    );
    println!("  Output:     {}", output_dir.display());
}
