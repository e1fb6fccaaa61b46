//! End-to-end tests for the sitemap build.
//!
//! These tests lay out a content directory on disk and verify the generated
//! documents.

use std::{
    collections::HashMap,
    fs,
    path::Path,
    sync::Arc,
    time::Duration,
};

use async_trait::async_trait;
use projecthub_core::{Config, config::SiteConfig};
use projecthub_generator::{Builder, CommitLookup, LatestUpdate};
use tokio::sync::Barrier;

fn write(dir: &Path, relative: &str, content: &str) {
    let path = dir.join(relative);
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, content).expect("write");
}

fn config() -> Config {
    let mut config = Config::new(SiteConfig {
        title: "Example".to_string(),
        base_url: "https://example.com".to_string(),
        locales: vec!["en".to_string(), "de".to_string()],
        default_locale: "en".to_string(),
    });
    config.github.enabled = false;
    config
}

/// Extract the `<url>` element whose `<loc>` is `loc`.
fn url_element<'a>(xml: &'a str, loc: &str) -> Option<&'a str> {
    let needle = format!("<url><loc>{loc}</loc>");
    let start = xml.find(&needle)?;
    let end = xml[start..].find("</url>")? + start + "</url>".len();
    Some(&xml[start..end])
}

/// Lookup answering from a fixed table.
struct TableLookup(HashMap<&'static str, LatestUpdate>);

#[async_trait]
impl CommitLookup for TableLookup {
    async fn latest_update(&self, repo: &str, _branch: &str) -> LatestUpdate {
        self.0.get(repo).cloned().unwrap_or(LatestUpdate::Unavailable)
    }
}

/// Lookup that only answers once `n` lookups are in flight at the same time.
struct RendezvousLookup(Barrier);

#[async_trait]
impl CommitLookup for RendezvousLookup {
    async fn latest_update(&self, _repo: &str, _branch: &str) -> LatestUpdate {
        self.0.wait().await;
        LatestUpdate::Found("2024-06-01T00:00:00Z".to_string())
    }
}

#[tokio::test]
async fn test_example_site_without_external_dates() {
    let dir = tempfile::tempdir().expect("tempdir");
    let content = dir.path().join("content");
    let output = dir.path().join("dist");
    write(
        &content,
        "projects/a.md",
        "---\nid: a\ntitle: A\nsummary: A\nvisibility: public\ndates:\n  created: 2023-01-01\n---\n",
    );
    write(
        &content,
        "projects/b.md",
        "---\nid: b\ntitle: B\nsummary: B\nvisibility: private\n---\n",
    );
    write(&content, "tags/rust.yaml", "id: rust\nlabel: Rust\n");

    let stats = Builder::new(config(), &content, &output)
        .build()
        .await
        .expect("build");

    assert_eq!(stats.entries, 6);
    assert_eq!(stats.projects, 1);
    assert_eq!(stats.private_projects, 1);
    assert_eq!(stats.lastmods, 1);
    assert_eq!(stats.external_timestamps, 0);

    let xml = fs::read_to_string(output.join("sitemap.xml")).expect("sitemap");
    for loc in [
        "https://example.com/",
        "https://example.com/projects",
        "https://example.com/tags",
        "https://example.com/search",
        "https://example.com/projects/a",
        "https://example.com/tags/rust",
    ] {
        assert!(url_element(&xml, loc).is_some(), "missing {loc}");
    }
    assert!(!xml.contains("/projects/b"));

    let a = url_element(&xml, "https://example.com/projects/a").expect("a");
    assert!(a.contains("<lastmod>2023-01-01T00:00:00.000Z</lastmod>"));
    assert!(a.contains(
        r#"<xhtml:link rel="alternate" hreflang="en" href="https://example.com/projects/a"/>"#
    ));
    assert!(a.contains(
        r#"<xhtml:link rel="alternate" hreflang="de" href="https://example.com/de/projects/a"/>"#
    ));
    assert!(a.contains(
        r#"<xhtml:link rel="alternate" hreflang="x-default" href="https://example.com/projects/a"/>"#
    ));

    let rust = url_element(&xml, "https://example.com/tags/rust").expect("rust");
    assert!(!rust.contains("<lastmod>"));

    let robots = fs::read_to_string(output.join("robots.txt")).expect("robots");
    assert!(robots.ends_with("Sitemap: https://example.com/sitemap.xml\n"));
}

#[tokio::test]
async fn test_failed_lookup_does_not_affect_others() {
    let dir = tempfile::tempdir().expect("tempdir");
    let content = dir.path().join("content");
    write(
        &content,
        "projects/fetched.md",
        "---\nid: fetched\ntitle: F\nsummary: F\ndates:\n  updated: 2020-01-01\nexternal:\n  github:\n    repo: octo/fetched\n---\n",
    );
    write(
        &content,
        "projects/offline.md",
        "---\nid: offline\ntitle: O\nsummary: O\ndates:\n  completed: 2021-05-05\nexternal:\n  github:\n    repo: octo/offline\n---\n",
    );

    let lookup = TableLookup(HashMap::from([(
        "octo/fetched",
        LatestUpdate::Found("2024-04-04T04:04:04Z".to_string()),
    )]));

    let output = dir.path().join("dist");
    let stats = Builder::new(config(), &content, &output)
        .with_lookup(Arc::new(lookup))
        .build()
        .await
        .expect("build");

    assert_eq!(stats.entries, 6);
    assert_eq!(stats.external_timestamps, 1);

    let xml = fs::read_to_string(output.join("sitemap.xml")).expect("sitemap");
    let fetched = url_element(&xml, "https://example.com/projects/fetched").expect("fetched");
    assert!(fetched.contains("<lastmod>2024-04-04T04:04:04.000Z</lastmod>"));
    let offline = url_element(&xml, "https://example.com/projects/offline").expect("offline");
    assert!(offline.contains("<lastmod>2021-05-05T00:00:00.000Z</lastmod>"));
    assert!(url_element(&xml, "https://example.com/search").is_some());
}

#[tokio::test]
async fn test_lookups_run_concurrently() {
    let dir = tempfile::tempdir().expect("tempdir");
    let content = dir.path().join("content");
    for slug in ["one", "two", "three"] {
        write(
            &content,
            &format!("projects/{slug}.md"),
            &format!(
                "---\nid: {slug}\ntitle: T\nsummary: S\nexternal:\n  github:\n    repo: octo/{slug}\n---\n"
            ),
        );
    }

    let builder = Builder::new(config(), &content, dir.path().join("dist"))
        .with_lookup(Arc::new(RendezvousLookup(Barrier::new(3))));

    let stats = tokio::time::timeout(Duration::from_secs(10), builder.build())
        .await
        .expect("lookups were not issued concurrently")
        .expect("build");

    assert_eq!(stats.external_timestamps, 3);
    assert_eq!(stats.lastmods, 3);
}

#[tokio::test]
async fn test_rebuild_is_reproducible() {
    let dir = tempfile::tempdir().expect("tempdir");
    let content = dir.path().join("content");
    for id in ["go", "rust", "zig"] {
        write(&content, &format!("tags/{id}.yml"), &format!("id: {id}\nlabel: {id}\n"));
    }

    let output = dir.path().join("dist");
    let builder = Builder::new(config(), &content, &output);
    builder.build().await.expect("first build");
    let first = fs::read_to_string(output.join("sitemap.xml")).expect("sitemap");
    builder.build().await.expect("second build");
    let second = fs::read_to_string(output.join("sitemap.xml")).expect("sitemap");

    assert_eq!(first, second);
    let go = first.find("/tags/go").expect("go");
    let zig = first.find("/tags/zig").expect("zig");
    assert!(go < zig);
}

#[tokio::test]
async fn test_robots_disabled() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = config();
    config.robots.enabled = false;

    let output = dir.path().join("dist");
    Builder::new(config, dir.path().join("content"), &output)
        .build()
        .await
        .expect("build");

    assert!(output.join("sitemap.xml").exists());
    assert!(!output.join("robots.txt").exists());
}
